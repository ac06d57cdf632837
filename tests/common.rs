#![allow(dead_code)]

use peer_identity::crypto::{PrivateKey, PublicKey};

#[derive(thiserror::Error, Debug)]
pub enum CommonError {
    #[error("expect error, got ok")]
    ExpectError,
}

pub fn init_tracing() {
    // Tests in one binary share the global subscriber
    let _ = tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .finish(),
    );
}

pub fn random_keypair() -> (PrivateKey, PublicKey) {
    let privkey = (0..32).map(|_| rand::random::<u8>()).collect::<Vec<_>>();
    let privkey =
        PrivateKey::from_slice(privkey.as_slice()).expect("impossible, random private key fail");

    let pubkey = privkey.pubkey();

    (privkey, pubkey)
}

/// Private key `1`, its public key is the curve generator.
pub fn generator_keypair() -> (PrivateKey, PublicKey) {
    let mut scalar = [0u8; 32];
    scalar[31] = 1;

    let privkey = PrivateKey::from_slice(&scalar).expect("impossible, one is a valid scalar");
    let pubkey = privkey.pubkey();

    (privkey, pubkey)
}
