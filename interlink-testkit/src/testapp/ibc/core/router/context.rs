use interlink_core::host::types::identifiers::PortId;
use interlink_core::router::module::Module;
use interlink_core::router::router::Router;
use interlink_core::router::types::module::ModuleId;

use super::types::MockRouter;

impl Router for MockRouter {
    fn get_route(&self, module_id: &ModuleId) -> Option<&dyn Module> {
        match self.router.get(module_id) {
            Some(module) => Some(module.as_ref()),
            None => None,
        }
    }

    fn get_route_mut(&mut self, module_id: &ModuleId) -> Option<&mut dyn Module> {
        // spelled out so the boxed trait object coerces to the borrow's lifetime
        match self.router.get_mut(module_id) {
            Some(module) => Some(module.as_mut()),
            None => None,
        }
    }

    fn lookup_module(&self, port_id: &PortId) -> Option<ModuleId> {
        self.port_to_module.get(port_id).cloned()
    }
}
