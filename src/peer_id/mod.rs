mod derive;
mod json;

pub use derive::{digest_address, IdentityDeriver};
pub use json::PeerIdJson;

use crate::{
    crypto::{
        self,
        marshal::{self, UnmarshalError},
        PrivateKey, PublicKey,
    },
    multihash::{DecodeError, Multihash},
};

use anyhow::Error;
use tokio::task;
use tracing::debug;

use std::{
    convert::TryFrom,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

// Multihash prefix of sha2-256 digests in base58
const LEGACY_BASE58_PREFIX: &str = "Qm";
const DISPLAY_LENGTH: usize = 6;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConsistencyError {
    #[error("id and private key do not match")]
    IdNotMatchPrivateKey,

    #[error("id and public key do not match")]
    IdNotMatchPublicKey,

    #[error("private key and public key do not match")]
    PrivateKeyNotMatchPublicKey,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum KeyMismatchError {
    #[error("no private key")]
    NoPrivateKey,

    #[error("public key isn't derived from private key")]
    PublicKeyNotMatch,
}

#[derive(thiserror::Error, Debug)]
pub enum PeerIdError {
    #[error("invalid input {0}")]
    InvalidInput(Error),

    #[error("malformed key {0}")]
    MalformedKey(#[from] UnmarshalError),

    #[error("decode {0}")]
    Decoding(#[from] DecodeError),

    #[error("inconsistent peer id {0}")]
    Consistency(#[from] ConsistencyError),

    #[error("key mismatch {0}")]
    KeyMismatch(#[from] KeyMismatchError),

    #[error("unexpected error {0}")]
    UnexpectedError(Error),
}

/// Identity of a peer, optionally carrying the key pair it was derived from.
///
/// Equality and hashing only look at the identity bytes.
#[derive(Clone)]
pub struct PeerId {
    pub(crate) id: Multihash,
    pub(crate) privkey: Option<PrivateKey>,
    pub(crate) pubkey: Option<PublicKey>,
}

impl PeerId {
    pub fn generate() -> Self {
        let (privkey, _) = crypto::generate_keypair();

        Self::from_privkey(privkey)
    }

    pub async fn generate_async() -> Result<Self, PeerIdError> {
        task::spawn_blocking(Self::generate)
            .await
            .map_err(|err| PeerIdError::UnexpectedError(anyhow::anyhow!("generate task {}", err)))
    }

    pub fn from_privkey(privkey: PrivateKey) -> Self {
        IdentityDeriver::default().peer_id_from_privkey(privkey)
    }

    pub fn from_pubkey(pubkey: PublicKey) -> Self {
        IdentityDeriver::default().peer_id(pubkey)
    }

    pub fn from_privkey_bytes(bytes: &[u8]) -> Result<Self, PeerIdError> {
        let privkey = marshal::unmarshal_privkey(bytes)?;

        Ok(Self::from_privkey(privkey))
    }

    pub fn from_pubkey_bytes(bytes: &[u8]) -> Result<Self, PeerIdError> {
        let pubkey = marshal::unmarshal_pubkey(bytes)?;

        Ok(Self::from_pubkey(pubkey))
    }

    /// Caller supplied address equivalent, hashed with sha3-256 directly.
    pub fn from_raw_address(bytes: &[u8]) -> Self {
        let id = digest_address(bytes);
        debug!("peer id {} from raw address", id);

        PeerId {
            id,
            privkey: None,
            pubkey: None,
        }
    }

    pub fn from_multihash(id: Multihash) -> Self {
        PeerId {
            id,
            privkey: None,
            pubkey: None,
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, PeerIdError> {
        Ok(Self::from_multihash(Multihash::from_bytes(bytes)?))
    }

    pub fn from_hex(s: &str) -> Result<Self, PeerIdError> {
        Ok(Self::from_multihash(Multihash::from_hex(s)?))
    }

    pub fn from_base58(s: &str) -> Result<Self, PeerIdError> {
        Ok(Self::from_multihash(Multihash::from_base58(s)?))
    }

    pub fn from_json(record: PeerIdJson) -> Result<Self, PeerIdError> {
        record.into_peer_id(&IdentityDeriver::default())
    }

    pub async fn from_json_async(record: PeerIdJson) -> Result<Self, PeerIdError> {
        record
            .into_peer_id_async(&IdentityDeriver::default())
            .await
    }

    pub fn from_json_str(s: &str) -> Result<Self, PeerIdError> {
        Self::from_json(PeerIdJson::parse(s)?)
    }

    /// Assemble from parts, rejecting a public key that doesn't belong to
    /// the private key. The id itself isn't checked against the keys.
    pub fn from_parts(
        id: Multihash,
        privkey: Option<PrivateKey>,
        pubkey: Option<PublicKey>,
    ) -> Result<Self, PeerIdError> {
        if let (Some(privkey), Some(pubkey)) = (privkey.as_ref(), pubkey.as_ref()) {
            if &privkey.pubkey() != pubkey {
                return Err(KeyMismatchError::PublicKeyNotMatch.into());
            }
        }

        Ok(PeerId {
            id,
            privkey,
            pubkey,
        })
    }

    pub fn with_privkey(self, privkey: PrivateKey) -> Self {
        PeerId {
            privkey: Some(privkey),
            ..self
        }
    }

    pub fn with_pubkey(self, pubkey: PublicKey) -> Self {
        PeerId {
            pubkey: Some(pubkey),
            ..self
        }
    }

    pub fn id(&self) -> &Multihash {
        &self.id
    }

    pub fn privkey(&self) -> Option<&PrivateKey> {
        self.privkey.as_ref()
    }

    /// Attached public key, or the one derived from the private key.
    pub fn pubkey(&self) -> Option<PublicKey> {
        self.pubkey
            .or_else(|| self.privkey.as_ref().map(PrivateKey::pubkey))
    }

    pub fn marshal_privkey(&self) -> Option<Vec<u8>> {
        self.privkey.as_ref().map(marshal::marshal_privkey)
    }

    pub fn marshal_pubkey(&self) -> Option<Vec<u8>> {
        self.pubkey().map(|pubkey| marshal::marshal_pubkey(&pubkey))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.id.as_bytes()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.id.as_bytes().to_vec()
    }

    pub fn to_hex(&self) -> String {
        self.id.to_hex()
    }

    pub fn to_base58(&self) -> String {
        self.id.to_base58()
    }

    pub fn to_display_string(&self) -> String {
        let encoded = self.to_base58();
        let trimmed = encoded
            .strip_prefix(LEGACY_BASE58_PREFIX)
            .unwrap_or(&encoded);

        format!(
            "<peer.ID {}>",
            trimmed.chars().take(DISPLAY_LENGTH).collect::<String>()
        )
    }

    pub fn to_json(&self) -> PeerIdJson {
        PeerIdJson::from(self)
    }

    pub fn validate(&self) -> Result<(), PeerIdError> {
        let privkey = self.privkey.as_ref().ok_or(KeyMismatchError::NoPrivateKey)?;

        if let Some(pubkey) = self.pubkey.as_ref() {
            if &privkey.pubkey() != pubkey {
                return Err(KeyMismatchError::PublicKeyNotMatch.into());
            }
        }

        Ok(())
    }

    pub fn into_inner(self) -> Multihash {
        self.id
    }
}

impl PartialEq for PeerId {
    fn eq(&self, other: &PeerId) -> bool {
        self.id == other.id
    }
}

impl Eq for PeerId {}

impl PartialEq<[u8]> for PeerId {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl PartialEq<Vec<u8>> for PeerId {
    fn eq(&self, other: &Vec<u8>) -> bool {
        self.as_bytes() == other.as_slice()
    }
}

impl Hash for PeerId {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        self.id.hash(hasher)
    }
}

impl AsRef<[u8]> for PeerId {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl TryFrom<&[u8]> for PeerId {
    type Error = PeerIdError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes.to_vec())
    }
}

impl FromStr for PeerId {
    type Err = PeerIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl PublicKey {
    pub fn peer_id(&self) -> PeerId {
        PeerId::from_pubkey(*self)
    }
}
