use interlink_core::host::types::identifiers::PortId;
use interlink_core::primitives::prelude::*;
use interlink_core::router::module::Module;
use interlink_core::router::types::module::ModuleId;

use crate::testapp::ibc::applications::mock::{mock_module_id, mock_port_id, MockModule};

#[derive(Debug, Default)]
pub struct MockRouter {
    pub router: BTreeMap<ModuleId, Box<dyn Module>>,

    /// Maps ports to the module that owns it
    pub port_to_module: BTreeMap<PortId, ModuleId>,
}

impl MockRouter {
    /// A router binding the `mock` port to `module`.
    pub fn new_with_mock(module: MockModule) -> Self {
        let mut router = Self::default();

        router.scope_port_to_module(mock_port_id(), mock_module_id());
        router
            .add_route(mock_module_id(), module)
            .expect("Never fails");

        router
    }

    pub fn add_route(
        &mut self,
        module_id: ModuleId,
        module: impl Module + 'static,
    ) -> Result<(), String> {
        match self.router.insert(module_id, Box::new(module)) {
            None => Ok(()),
            Some(_) => Err("Duplicate module_id".to_owned()),
        }
    }

    /// Binds `port_id` to `module_id`, replacing any previous owner.
    pub fn scope_port_to_module(&mut self, port_id: PortId, module_id: ModuleId) {
        self.port_to_module.insert(port_id, module_id);
    }
}
