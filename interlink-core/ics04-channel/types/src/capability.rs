//! Channel capabilities: unforgeable handles binding an application module to
//! the (port, channel) pair it opened.
//!
//! A [`ChannelCapability`] can only be minted by a [`CapabilityRegistry`],
//! and each (port, channel) pair is minted exactly once. Handles cannot be
//! cloned; the owning module keeps the one it received and presents it by
//! reference when it sends packets.

use core::sync::atomic::{AtomicU64, Ordering};

use interlink_core_host_types::identifiers::{ChannelId, PortId};
use interlink_core_router_types::module::ModuleId;
use interlink_primitives::prelude::*;

use crate::error::CapabilityError;

/// Ownership handle for one channel end.
#[derive(Debug, PartialEq, Eq)]
pub struct ChannelCapability {
    port_id: PortId,
    channel_id: ChannelId,
    owner: ModuleId,
    nonce: u64,
}

/// Nonces are drawn from one process-wide counter, so no two registries
/// ever mint the same handle.
static NEXT_NONCE: AtomicU64 = AtomicU64::new(0);

impl ChannelCapability {
    fn mint(port_id: PortId, channel_id: ChannelId, owner: ModuleId) -> Self {
        Self {
            port_id,
            channel_id,
            owner,
            nonce: NEXT_NONCE.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn port_id(&self) -> &PortId {
        &self.port_id
    }

    pub fn channel_id(&self) -> &ChannelId {
        &self.channel_id
    }

    pub fn owner(&self) -> &ModuleId {
        &self.owner
    }
}

/// Host-owned record of every capability minted so far.
#[derive(Clone, Debug, Default)]
pub struct CapabilityRegistry {
    claimed: BTreeMap<(PortId, ChannelId), (ModuleId, u64)>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints the capability for `(port_id, channel_id)` on behalf of `owner`.
    pub fn claim(
        &mut self,
        port_id: PortId,
        channel_id: ChannelId,
        owner: ModuleId,
    ) -> Result<ChannelCapability, CapabilityError> {
        let key = (port_id, channel_id);
        if self.claimed.contains_key(&key) {
            let (port_id, channel_id) = key;
            return Err(CapabilityError::AlreadyClaimed {
                port_id,
                channel_id,
            });
        }

        let (port_id, channel_id) = key;
        let capability = ChannelCapability::mint(port_id.clone(), channel_id.clone(), owner.clone());
        self.claimed
            .insert((port_id, channel_id), (owner, capability.nonce));

        Ok(capability)
    }

    /// Succeeds iff `capability` is the handle minted for its channel.
    pub fn authenticate(&self, capability: &ChannelCapability) -> Result<(), CapabilityError> {
        match self
            .claimed
            .get(&(capability.port_id.clone(), capability.channel_id.clone()))
        {
            Some((owner, nonce)) if owner == &capability.owner && *nonce == capability.nonce => {
                Ok(())
            }
            _ => Err(CapabilityError::Unauthorized {
                port_id: capability.port_id.clone(),
                channel_id: capability.channel_id.clone(),
            }),
        }
    }

    /// Returns the module owning the channel.
    pub fn owner(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<&ModuleId, CapabilityError> {
        self.claimed
            .get(&(port_id.clone(), channel_id.clone()))
            .map(|(owner, _)| owner)
            .ok_or_else(|| CapabilityError::NotFound {
                port_id: port_id.clone(),
                channel_id: channel_id.clone(),
            })
    }

    /// Checks that `module_id` owns the channel.
    pub fn verify_owner(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        module_id: &ModuleId,
    ) -> Result<(), CapabilityError> {
        if self.owner(port_id, channel_id)? != module_id {
            return Err(CapabilityError::Unauthorized {
                port_id: port_id.clone(),
                channel_id: channel_id.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer() -> ModuleId {
        ModuleId::new("transfer".to_string())
    }

    #[test]
    fn test_claim_once() {
        let mut registry = CapabilityRegistry::new();
        let cap = registry
            .claim(PortId::transfer(), ChannelId::new(0), transfer())
            .unwrap();
        registry.authenticate(&cap).unwrap();
        assert_eq!(cap.owner(), &transfer());

        assert!(matches!(
            registry.claim(PortId::transfer(), ChannelId::new(0), transfer()),
            Err(CapabilityError::AlreadyClaimed { .. })
        ));
    }

    #[test]
    fn test_foreign_registry_handle_rejected() {
        let mut ours = CapabilityRegistry::new();
        let mut theirs = CapabilityRegistry::new();

        // both registries mint their first handle for the same channel and owner
        let cap = theirs
            .claim(PortId::transfer(), ChannelId::new(0), transfer())
            .unwrap();
        let own = ours
            .claim(PortId::transfer(), ChannelId::new(0), transfer())
            .unwrap();

        ours.authenticate(&own).unwrap();
        assert!(matches!(
            ours.authenticate(&cap),
            Err(CapabilityError::Unauthorized { .. })
        ));
        assert!(matches!(
            theirs.authenticate(&own),
            Err(CapabilityError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_verify_owner() {
        let mut registry = CapabilityRegistry::new();
        let _cap = registry
            .claim(PortId::transfer(), ChannelId::new(0), transfer())
            .unwrap();
        let other = ModuleId::new("ica".to_string());

        registry
            .verify_owner(&PortId::transfer(), &ChannelId::new(0), &transfer())
            .unwrap();
        assert_eq!(
            registry.verify_owner(&PortId::transfer(), &ChannelId::new(0), &other),
            Err(CapabilityError::Unauthorized {
                port_id: PortId::transfer(),
                channel_id: ChannelId::new(0),
            })
        );
        assert!(matches!(
            registry.owner(&PortId::transfer(), &ChannelId::new(1)),
            Err(CapabilityError::NotFound { .. })
        ));
    }
}
