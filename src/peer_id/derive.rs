use super::{PeerId, PeerIdError};
use crate::{
    config::{DerivationScheme, IdentityConfig},
    crypto::{self, PublicKey},
    multihash::{Hash, Multihash},
};

use anyhow::anyhow;
use tokio::task;
use tracing::debug;

/// sha3-256 multihash over the given bytes.
pub fn digest_address(addr: &[u8]) -> Multihash {
    Multihash::wrap(Hash::SHA3256, &crypto::sha3_256_hash(addr))
        .expect("impossible, sha3-256 digest fits one byte length")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityDeriver {
    config: IdentityConfig,
}

impl IdentityDeriver {
    pub fn new(config: IdentityConfig) -> Self {
        IdentityDeriver { config }
    }

    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    pub fn derive(&self, pubkey: &PublicKey) -> Multihash {
        let id = match self.config.scheme {
            DerivationScheme::AddressDigest => digest_address(&pubkey.address()),
            DerivationScheme::KeyDigest => digest_address(&pubkey.to_raw_bytes()),
        };
        debug!("derive {} from {}", id, pubkey);

        id
    }

    /// Run derivation on the blocking pool. Calls are independent of each
    /// other and may complete in any order.
    pub async fn derive_async(&self, pubkey: PublicKey) -> Result<Multihash, PeerIdError> {
        let deriver = *self;

        task::spawn_blocking(move || deriver.derive(&pubkey))
            .await
            .map_err(|err| PeerIdError::UnexpectedError(anyhow!("derive task {}", err)))
    }

    pub fn peer_id(&self, pubkey: PublicKey) -> PeerId {
        PeerId {
            id: self.derive(&pubkey),
            privkey: None,
            pubkey: Some(pubkey),
        }
    }

    pub fn peer_id_from_privkey(&self, privkey: crypto::PrivateKey) -> PeerId {
        let pubkey = privkey.pubkey();

        PeerId {
            id: self.derive(&pubkey),
            privkey: Some(privkey),
            pubkey: Some(pubkey),
        }
    }
}
