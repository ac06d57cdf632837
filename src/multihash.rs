//! Self describing digest, `[code][digest length][digest]`.
//!
//! Both header fields are a single byte, so only hash functions whose
//! multihash code fits a one byte varint are accepted.

pub use parity_multihash::Hash;

use anyhow::{anyhow, Error};

use std::{convert::TryFrom, fmt, str::FromStr};

pub const MAX_DIGEST_LENGTH: usize = u8::MAX as usize;
// Codes at or above 0x80 need a second varint byte
const MAX_SINGLE_BYTE_CODE: u16 = 0x7f;
const HEADER_LENGTH: usize = 2;

#[derive(thiserror::Error, Debug)]
pub enum EncodeError {
    #[error("digest take {real}, larger than {max}")]
    DigestTooLarge { max: usize, real: usize },

    #[error("unsupported hash function {0:?}, code {1:#x} doesn't fit one byte")]
    UnsupportedHash(Hash, u16),
}

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("input take {real}, shorter than {min}")]
    TooShort { min: usize, real: usize },

    #[error("unknown hash function code {0:#x}")]
    UnknownCode(u8),

    #[error("digest length declared {declared}, but got {real}")]
    InconsistentLength { declared: usize, real: usize },

    #[error("invalid hex {0}")]
    InvalidHex(Error),

    #[error("invalid base58 {0}")]
    InvalidBase58(Error),
}

fn single_byte_code(hash: Hash) -> Result<u8, EncodeError> {
    let code = hash.code();

    if code > MAX_SINGLE_BYTE_CODE {
        return Err(EncodeError::UnsupportedHash(hash, code));
    }

    Ok(code as u8)
}

fn hash_from_code(code: u8) -> Result<Hash, DecodeError> {
    if u16::from(code) > MAX_SINGLE_BYTE_CODE {
        return Err(DecodeError::UnknownCode(code));
    }

    Hash::from_code(u16::from(code)).ok_or(DecodeError::UnknownCode(code))
}

pub fn encode(hash: Hash, digest: &[u8]) -> Result<Vec<u8>, EncodeError> {
    if digest.len() > MAX_DIGEST_LENGTH {
        return Err(EncodeError::DigestTooLarge {
            max: MAX_DIGEST_LENGTH,
            real: digest.len(),
        });
    }

    let code = single_byte_code(hash)?;

    let mut bytes = Vec::with_capacity(HEADER_LENGTH + digest.len());
    bytes.push(code);
    bytes.push(digest.len() as u8);
    bytes.extend_from_slice(digest);

    Ok(bytes)
}

pub fn decode(bytes: &[u8]) -> Result<(Hash, &[u8]), DecodeError> {
    if bytes.len() < HEADER_LENGTH {
        return Err(DecodeError::TooShort {
            min: HEADER_LENGTH,
            real: bytes.len(),
        });
    }

    let hash = hash_from_code(bytes[0])?;
    let declared = bytes[1] as usize;
    let digest = &bytes[HEADER_LENGTH..];

    if digest.len() != declared {
        return Err(DecodeError::InconsistentLength {
            declared,
            real: digest.len(),
        });
    }

    Ok((hash, digest))
}

pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

pub fn from_hex(s: &str) -> Result<Vec<u8>, DecodeError> {
    hex::decode(s).map_err(|err| DecodeError::InvalidHex(err.into()))
}

pub fn to_base58(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

pub fn from_base58(s: &str) -> Result<Vec<u8>, DecodeError> {
    bs58::decode(s)
        .into_vec()
        .map_err(|err| DecodeError::InvalidBase58(anyhow!("{}", err)))
}

/// Validated multihash bytes
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Multihash(Vec<u8>);

impl Multihash {
    pub fn wrap(hash: Hash, digest: &[u8]) -> Result<Self, EncodeError> {
        Ok(Multihash(encode(hash, digest)?))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, DecodeError> {
        decode(&bytes)?;

        Ok(Multihash(bytes))
    }

    pub fn from_hex(s: &str) -> Result<Self, DecodeError> {
        Self::from_bytes(from_hex(s)?)
    }

    pub fn from_base58(s: &str) -> Result<Self, DecodeError> {
        Self::from_bytes(from_base58(s)?)
    }

    pub fn algorithm(&self) -> Hash {
        hash_from_code(self.0[0]).expect("impossible, code checked on construction")
    }

    pub fn digest(&self) -> &[u8] {
        &self.0[HEADER_LENGTH..]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }

    pub fn to_base58(&self) -> String {
        to_base58(&self.0)
    }
}

impl AsRef<[u8]> for Multihash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<Vec<u8>> for Multihash {
    type Error = DecodeError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl FromStr for Multihash {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl fmt::Display for Multihash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl fmt::Debug for Multihash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Multihash")
            .field("algorithm", &self.algorithm())
            .field("digest", &to_hex(self.digest()))
            .finish()
    }
}
