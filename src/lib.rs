pub mod config;
pub mod crypto;
pub mod multihash;
pub mod peer_id;

pub use config::{DerivationScheme, IdentityConfig};
pub use peer_id::{
    ConsistencyError, IdentityDeriver, KeyMismatchError, PeerId, PeerIdError, PeerIdJson,
};
