pub mod marshal;

use anyhow::Error;
use lazy_static::lazy_static;
use rand::RngCore;
use secp256k1::Secp256k1;

use std::fmt;

pub const PRIVATE_KEY_LENGTH: usize = 32;
pub const PUBLIC_KEY_LENGTH: usize = 33;
pub const RAW_PUBLIC_KEY_LENGTH: usize = 64;
pub const ADDRESS_LENGTH: usize = 20;

lazy_static! {
    static ref SECP256K1: Secp256k1<secp256k1::All> = Secp256k1::new();
}

#[derive(thiserror::Error, Debug)]
pub enum CryptoError {
    #[error("invalid private key {0}")]
    InvalidPrivateKey(Error),

    #[error("invalid public key {0}")]
    InvalidPublicKey(Error),

    #[error("invalid signature {0}")]
    InvalidSignature(Error),

    #[error("unexpected error {0}")]
    UnexpectedError(Error),
}

impl From<secp256k1::Error> for CryptoError {
    fn from(err: secp256k1::Error) -> Self {
        use secp256k1::Error::*;

        match err {
            InvalidSecretKey => Self::InvalidPrivateKey(err.into()),
            InvalidPublicKey => Self::InvalidPublicKey(err.into()),
            IncorrectSignature | InvalidSignature => Self::InvalidSignature(err.into()),
            _ => Self::UnexpectedError(err.into()),
        }
    }
}

pub struct Signature([u8; 64]);

impl Signature {
    pub fn from_slice(data: &[u8]) -> Result<Self, CryptoError> {
        let sig = secp256k1::Signature::from_compact(data)?;

        Ok(Signature(sig.serialize_compact()))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PrivateKey(secp256k1::SecretKey);

impl PrivateKey {
    pub fn from_slice(data: &[u8]) -> Result<Self, CryptoError> {
        Ok(PrivateKey(secp256k1::SecretKey::from_slice(data)?))
    }

    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        let mut bytes = [0u8; PRIVATE_KEY_LENGTH];
        bytes.copy_from_slice(&self.0[..]);

        bytes
    }

    /// Sign a 32 bytes message hash, usually produced by `keccak256_hash`.
    pub fn sign(&self, msg: &[u8]) -> Result<Signature, CryptoError> {
        let msg = secp256k1::Message::from_slice(msg)?;
        let sig = SECP256K1.sign(&msg, &self.0);

        Ok(Signature(sig.serialize_compact()))
    }

    pub fn pubkey(&self) -> PublicKey {
        PublicKey(secp256k1::PublicKey::from_secret_key(&SECP256K1, &self.0))
    }
}

// Never print secret material
impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({})", self.pubkey())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(secp256k1::PublicKey);

impl PublicKey {
    /// Accept both compressed (33 bytes) and uncompressed (65 bytes) points.
    pub fn from_slice(data: &[u8]) -> Result<Self, CryptoError> {
        Ok(PublicKey(secp256k1::PublicKey::from_slice(data)?))
    }

    /// Compressed point
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.0.serialize()
    }

    /// Uncompressed point without the leading 0x04 tag byte.
    pub fn to_raw_bytes(&self) -> [u8; RAW_PUBLIC_KEY_LENGTH] {
        let uncompressed = self.0.serialize_uncompressed();
        let mut raw = [0u8; RAW_PUBLIC_KEY_LENGTH];
        raw.copy_from_slice(&uncompressed[1..]);

        raw
    }

    /// Ethereum style address, last 20 bytes of keccak256 over the raw point.
    pub fn address(&self) -> [u8; ADDRESS_LENGTH] {
        let hash = keccak256_hash(&self.to_raw_bytes());
        let mut addr = [0u8; ADDRESS_LENGTH];
        addr.copy_from_slice(&hash[hash.len() - ADDRESS_LENGTH..]);

        addr
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.to_bytes()[..]))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}

pub fn generate_keypair() -> (PrivateKey, PublicKey) {
    let mut rng = rand::thread_rng();
    let mut seed = [0u8; PRIVATE_KEY_LENGTH];

    // Out of range scalars are rare, just draw again
    loop {
        rng.fill_bytes(&mut seed);

        if let Ok(privkey) = PrivateKey::from_slice(&seed) {
            let pubkey = privkey.pubkey();
            return (privkey, pubkey);
        }
    }
}

pub fn keccak256_hash(obj: &[u8]) -> [u8; 32] {
    use tiny_keccak::Hasher;

    let mut hasher = tiny_keccak::Keccak::v256();
    let mut output = [0u8; 32];

    hasher.update(obj);
    hasher.finalize(&mut output);

    output
}

pub fn sha3_256_hash(obj: &[u8]) -> [u8; 32] {
    use tiny_keccak::Hasher;

    let mut hasher = tiny_keccak::Sha3::v256();
    let mut output = [0u8; 32];

    hasher.update(obj);
    hasher.finalize(&mut output);

    output
}
