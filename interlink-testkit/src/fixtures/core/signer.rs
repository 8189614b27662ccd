use interlink_core::primitives::prelude::*;
use interlink_core::primitives::Signer;

/// The account relaying every message in tests.
pub fn dummy_account_id() -> Signer {
    Signer::new("relayer00000000000000000000000000000000000000".to_string())
}
