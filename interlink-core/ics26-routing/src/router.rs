//! Defines the `Router`, which binds modules to ports

use interlink_core_host_types::identifiers::PortId;
use interlink_core_router_types::module::ModuleId;

use crate::module::Module;

/// Binds application modules to ports.
pub trait Router {
    /// Returns a reference to a `Module` registered against the specified
    /// `ModuleId`
    fn get_route(&self, module_id: &ModuleId) -> Option<&dyn Module>;

    /// Returns a mutable reference to a `Module` registered against the
    /// specified `ModuleId`
    fn get_route_mut(&mut self, module_id: &ModuleId) -> Option<&mut dyn Module>;

    /// Return the module_id associated with a given port_id
    fn lookup_module(&self, port_id: &PortId) -> Option<ModuleId>;
}
