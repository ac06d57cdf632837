use serde::Deserialize;

/// How a public key is turned into the sha3-256 input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivationScheme {
    /// sha3-256 over the 20 bytes keccak256 address of the raw public key.
    AddressDigest,

    /// sha3-256 over the 64 bytes raw public key, no address step.
    KeyDigest,
}

impl Default for DerivationScheme {
    fn default() -> Self {
        DerivationScheme::AddressDigest
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub scheme: DerivationScheme,
}

impl IdentityConfig {
    pub fn with_scheme(scheme: DerivationScheme) -> Self {
        IdentityConfig { scheme }
    }
}
