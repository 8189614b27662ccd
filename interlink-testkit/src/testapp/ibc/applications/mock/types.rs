use alloc::sync::Arc;

use interlink_core::channel::types::acknowledgement::Acknowledgement;
use interlink_core::channel::types::capability::ChannelCapability;
use interlink_core::channel::types::packet::Packet;
use interlink_core::channel::types::Version;
use interlink_core::host::types::identifiers::{ChannelId, PortId, Sequence};
use interlink_core::primitives::prelude::*;
use interlink_core::router::types::module::ModuleId;
use parking_lot::{Mutex, MutexGuard};

pub const MOCK_MODULE_ID: &str = "mock";

pub const MOCK_PORT_ID: &str = "mock";

pub const MOCK_APP_VERSION: &str = "mock-1";

/// Packets carrying this payload are answered with an error acknowledgement.
pub const REJECTED_PACKET_DATA: &[u8] = b"reject";

pub fn mock_module_id() -> ModuleId {
    ModuleId::new(MOCK_MODULE_ID.to_string())
}

pub fn mock_port_id() -> PortId {
    PortId::new(MOCK_PORT_ID.to_string()).expect("Never fails")
}

pub fn mock_app_version() -> Version {
    Version::new(MOCK_APP_VERSION.to_string())
}

/// What the packet lifecycle delivered to a [`MockModule`].
#[derive(Debug, Default)]
pub struct MockModuleState {
    /// Channel capabilities handed over on channel open, by channel.
    pub capabilities: BTreeMap<(PortId, ChannelId), ChannelCapability>,
    pub received: Vec<Packet>,
    pub acknowledged: Vec<(Sequence, Acknowledgement)>,
    pub timed_out: Vec<Sequence>,
    pub closed: Vec<(PortId, ChannelId)>,
}

/// The mock application. Clones share their state, so a test keeps a handle
/// on the module it registers with a router.
#[derive(Clone, Debug, Default)]
pub struct MockModule {
    state: Arc<Mutex<MockModuleState>>,
}

impl MockModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, MockModuleState> {
        self.state.lock()
    }
}
