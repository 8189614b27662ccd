use displaydoc::Display;
use interlink_core_host_types::identifiers::PortId;
use interlink_primitives::prelude::*;

/// Error type for the router module.
#[derive(Debug, Display)]
pub enum RouterError {
    /// malformed message that could not be decoded: `{reason}`
    MalformedMessageBytes { reason: String },
    /// unknown type URL `{url}`
    UnknownMessageTypeUrl { url: String },
    /// no module bound to port `{port_id}`
    UnknownPort { port_id: PortId },
    /// missing module `{module_id}`
    MissingModule { module_id: String },
    /// port `{port_id}` is already bound
    PortAlreadyBound { port_id: PortId },
}

#[cfg(feature = "std")]
impl std::error::Error for RouterError {}
