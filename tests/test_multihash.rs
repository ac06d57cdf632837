use anyhow::Error;
use peer_identity::multihash::{self, DecodeError, EncodeError, Hash, Multihash};

const SHA3_256_CODE: u8 = 0x16;
const SHA2_256_CODE: u8 = 0x12;

#[test]
fn should_prefix_digest_with_code_and_length() -> Result<(), Error> {
    let digest = [7u8; 32];
    let encoded = multihash::encode(Hash::SHA3256, &digest)?;

    assert_eq!(encoded.len(), 34);
    assert_eq!(encoded[0], SHA3_256_CODE);
    assert_eq!(encoded[1], 32);
    assert_eq!(&encoded[2..], &digest[..]);

    let (hash, decoded) = multihash::decode(&encoded)?;
    assert_eq!(hash, Hash::SHA3256);
    assert_eq!(decoded, &digest[..]);

    Ok(())
}

#[test]
fn should_match_parity_multihash_layout() -> Result<(), Error> {
    let input = b"hello peer";
    let digest = peer_identity::crypto::sha3_256_hash(input);

    let ours = multihash::encode(Hash::SHA3256, &digest)?;
    let theirs = parity_multihash::encode(Hash::SHA3256, input)?;

    assert_eq!(ours.as_slice(), theirs.as_bytes());

    Ok(())
}

#[test]
fn should_accept_empty_and_max_length_digest() -> Result<(), Error> {
    let empty = multihash::encode(Hash::SHA2256, &[])?;
    assert_eq!(empty, vec![SHA2_256_CODE, 0]);

    let max = vec![1u8; multihash::MAX_DIGEST_LENGTH];
    let encoded = multihash::encode(Hash::SHA2256, &max)?;
    assert_eq!(encoded[1], 255);
    assert_eq!(multihash::decode(&encoded)?.1, max.as_slice());

    Ok(())
}

#[test]
fn should_reject_digest_longer_than_one_byte_length() {
    let digest = vec![0u8; 256];

    match multihash::encode(Hash::SHA3256, &digest) {
        Err(EncodeError::DigestTooLarge { max: 255, real: 256 }) => (),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn should_reject_hash_code_wider_than_one_byte() {
    // blake2b-256 is 0xb220, a two bytes varint
    match multihash::encode(Hash::Blake2b256, &[0u8; 32]) {
        Err(EncodeError::UnsupportedHash(Hash::Blake2b256, _)) => (),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn should_reject_short_buffer() {
    match multihash::decode(&[SHA3_256_CODE]) {
        Err(DecodeError::TooShort { min: 2, real: 1 }) => (),
        other => panic!("unexpected {:?}", other),
    }

    // 18 bytes total, header declares 32 bytes digest
    let mut truncated = vec![SHA3_256_CODE, 32];
    truncated.extend_from_slice(&[0u8; 16]);

    match multihash::decode(&truncated) {
        Err(DecodeError::InconsistentLength {
            declared: 32,
            real: 16,
        }) => (),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn should_reject_trailing_bytes() {
    let mut encoded = vec![SHA3_256_CODE, 2, 1, 2];
    encoded.push(3);

    assert!(matches!(
        multihash::decode(&encoded),
        Err(DecodeError::InconsistentLength { declared: 2, real: 3 })
    ));
}

#[test]
fn should_reject_unknown_code() {
    assert!(matches!(
        multihash::decode(&[0x7e, 1, 0]),
        Err(DecodeError::UnknownCode(0x7e))
    ));
    assert!(matches!(
        multihash::decode(&[0xb2, 1, 0]),
        Err(DecodeError::UnknownCode(0xb2))
    ));
}

#[test]
fn should_round_trip_hex_case_insensitive() -> Result<(), Error> {
    let encoded = multihash::encode(Hash::SHA3256, &[0xab; 32])?;
    let hex = multihash::to_hex(&encoded);

    assert_eq!(hex, hex.to_lowercase());
    assert!(hex.starts_with("1620abab"));
    assert_eq!(multihash::from_hex(&hex)?, encoded);
    assert_eq!(multihash::from_hex(&hex.to_uppercase())?, encoded);

    assert!(matches!(
        multihash::from_hex("16zz"),
        Err(DecodeError::InvalidHex(_))
    ));

    Ok(())
}

#[test]
fn should_round_trip_base58_over_whole_multihash() -> Result<(), Error> {
    let encoded = multihash::encode(Hash::SHA2256, &[0u8; 32])?;
    let b58 = multihash::to_base58(&encoded);

    // sha2-256 multihashes always start with Qm
    assert!(b58.starts_with("Qm"));
    assert_eq!(multihash::from_base58(&b58)?, encoded);

    // 0, O, I and l aren't in the bitcoin alphabet
    assert!(matches!(
        multihash::from_base58("Qm0OIl"),
        Err(DecodeError::InvalidBase58(_))
    ));

    Ok(())
}

#[test]
fn should_validate_multihash_value() -> Result<(), Error> {
    let mhash = Multihash::wrap(Hash::SHA3256, &[9u8; 32])?;

    assert_eq!(mhash.algorithm(), Hash::SHA3256);
    assert_eq!(mhash.digest(), &[9u8; 32][..]);
    assert_eq!(mhash.to_string(), mhash.to_base58());
    assert_eq!(mhash.to_base58().parse::<Multihash>()?, mhash);
    assert_eq!(Multihash::from_hex(&mhash.to_hex())?, mhash);
    assert_eq!(Multihash::from_bytes(mhash.clone().into_bytes())?, mhash);

    assert!(Multihash::from_bytes(vec![SHA3_256_CODE, 3, 1]).is_err());

    Ok(())
}
