//! Key envelope shared with other libp2p implementations.
//!
//! Keys travel as a protobuf message carrying a key type and the key data.
//! For secp256k1 the public key data is the 33 bytes compressed point and
//! the private key data is the 32 bytes scalar.

use super::{CryptoError, PrivateKey, PublicKey};

use derive_more::Display;
use prost::Message;

#[derive(thiserror::Error, Debug)]
pub enum UnmarshalError {
    #[error("key decode error: {0}")]
    KeyDecodeError(#[from] prost::DecodeError),

    #[error("unknown key type {0}")]
    UnknownKeyType(i32),

    #[error("unsupport key type {0}")]
    UnsupportedKeyType(KeyType),

    #[error("invalid key data {0}")]
    InvalidKeyData(#[from] CryptoError),
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, prost::Enumeration)]
pub enum KeyType {
    #[display(fmt = "rsa")]
    RSA = 0,

    #[display(fmt = "ed25519")]
    ED25519 = 1,

    #[display(fmt = "secp256k1")]
    Secp256k1 = 2,

    #[display(fmt = "ecdsa")]
    ECDSA = 3,
}

#[derive(Clone, PartialEq, Eq, Message)]
struct PublicKeyEnvelope {
    #[prost(enumeration = "KeyType", tag = "1")]
    pub key_type: i32,

    #[prost(bytes, tag = "2")]
    pub data: Vec<u8>,
}

#[derive(Clone, PartialEq, Eq, Message)]
struct PrivateKeyEnvelope {
    #[prost(enumeration = "KeyType", tag = "1")]
    pub key_type: i32,

    #[prost(bytes, tag = "2")]
    pub data: Vec<u8>,
}

fn check_key_type(key_type: i32) -> Result<(), UnmarshalError> {
    match KeyType::from_i32(key_type) {
        Some(KeyType::Secp256k1) => Ok(()),
        Some(other) => Err(UnmarshalError::UnsupportedKeyType(other)),
        None => Err(UnmarshalError::UnknownKeyType(key_type)),
    }
}

fn encode<M: Message>(envelope: M) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(envelope.encoded_len());
    envelope
        .encode(&mut encoded)
        .expect("impossible, vec grows on demand");

    encoded
}

pub fn marshal_pubkey(pubkey: &PublicKey) -> Vec<u8> {
    encode(PublicKeyEnvelope {
        key_type: KeyType::Secp256k1 as i32,
        data: pubkey.to_bytes().to_vec(),
    })
}

pub fn marshal_privkey(privkey: &PrivateKey) -> Vec<u8> {
    encode(PrivateKeyEnvelope {
        key_type: KeyType::Secp256k1 as i32,
        data: privkey.to_bytes().to_vec(),
    })
}

pub fn unmarshal_pubkey(bytes: &[u8]) -> Result<PublicKey, UnmarshalError> {
    let envelope = PublicKeyEnvelope::decode(bytes)?;
    check_key_type(envelope.key_type)?;

    Ok(PublicKey::from_slice(&envelope.data)?)
}

pub fn unmarshal_privkey(bytes: &[u8]) -> Result<PrivateKey, UnmarshalError> {
    let envelope = PrivateKeyEnvelope::decode(bytes)?;
    check_key_type(envelope.key_type)?;

    Ok(PrivateKey::from_slice(&envelope.data)?)
}
