//! Defines the context error type

use derive_more::From;
use displaydoc::Display;
use interlink_core_channel_types::error::{CapabilityError, ChannelError, PacketError};
use interlink_core_client_types::error::ClientError;
use interlink_core_connection_types::error::ConnectionError;
use interlink_core_router_types::error::RouterError;
use interlink_primitives::prelude::*;

/// Top-level error returned by every validation and execution entrypoint.
#[derive(Debug, Display, From)]
pub enum ContextError {
    /// client error: {0}
    ClientError(ClientError),
    /// connection error: {0}
    ConnectionError(ConnectionError),
    /// channel error: {0}
    ChannelError(ChannelError),
    /// packet error: {0}
    PacketError(PacketError),
    /// capability error: {0}
    CapabilityError(CapabilityError),
    /// routing error: {0}
    RouterError(RouterError),
}

impl From<ContextError> for ClientError {
    fn from(context_error: ContextError) -> Self {
        match context_error {
            ContextError::ClientError(e) => e,
            _ => ClientError::Other {
                description: context_error.to_string(),
            },
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ClientError(e) => Some(e),
            Self::ConnectionError(e) => Some(e),
            Self::ChannelError(e) => Some(e),
            Self::PacketError(e) => Some(e),
            Self::CapabilityError(e) => Some(e),
            Self::RouterError(e) => Some(e),
        }
    }
}
