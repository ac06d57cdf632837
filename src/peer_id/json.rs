//! JSON record used to persist and exchange a peer id with its keys.
//!
//! ```json
//! {"id": "<base58>", "privKey": "<base64>", "pubKey": "<base64>"}
//! ```

use super::{derive::IdentityDeriver, ConsistencyError, PeerId, PeerIdError};
use crate::{
    crypto::{
        marshal::{self, UnmarshalError},
        PrivateKey, PublicKey,
    },
    multihash::Multihash,
};

use anyhow::Error;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerIdJson {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priv_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_key: Option<String>,
}

struct DecodedRecord {
    id: Multihash,
    privkey: Option<PrivateKey>,
    pubkey: Option<PublicKey>,
}

fn decode_key<K>(
    field: &str,
    encoded: Option<&String>,
    unmarshal: fn(&[u8]) -> Result<K, UnmarshalError>,
) -> Result<Option<K>, PeerIdError> {
    let encoded = match encoded {
        Some(encoded) => encoded,
        None => return Ok(None),
    };

    let bytes = BASE64
        .decode(encoded)
        .map_err(|err| PeerIdError::InvalidInput(Error::new(err).context(field.to_owned())))?;

    Ok(Some(unmarshal(&bytes)?))
}

impl PeerIdJson {
    pub fn parse(s: &str) -> Result<Self, PeerIdError> {
        serde_json::from_str(s).map_err(|err| PeerIdError::InvalidInput(err.into()))
    }

    pub fn to_json_string(&self) -> Result<String, PeerIdError> {
        serde_json::to_string(self).map_err(|err| PeerIdError::UnexpectedError(err.into()))
    }

    fn decode(&self) -> Result<DecodedRecord, PeerIdError> {
        let id = Multihash::from_base58(&self.id)?;
        let privkey = decode_key("privKey", self.priv_key.as_ref(), marshal::unmarshal_privkey)?;
        let pubkey = decode_key("pubKey", self.pub_key.as_ref(), marshal::unmarshal_pubkey)?;

        Ok(DecodedRecord {
            id,
            privkey,
            pubkey,
        })
    }

    /// Rebuild a peer id, requiring every supplied key to agree with `id`
    /// and with each other.
    pub fn into_peer_id(self, deriver: &IdentityDeriver) -> Result<PeerId, PeerIdError> {
        let record = self.decode()?;

        let privkey_id = record.privkey.map(|sk| deriver.derive(&sk.pubkey()));
        let pubkey_id = record.pubkey.map(|pk| deriver.derive(&pk));

        check_consistency(record, privkey_id, pubkey_id)
    }

    /// Same as `into_peer_id`, both derivations run concurrently and are
    /// awaited before comparison.
    pub async fn into_peer_id_async(
        self,
        deriver: &IdentityDeriver,
    ) -> Result<PeerId, PeerIdError> {
        let record = self.decode()?;

        let derive_privkey_id = maybe_derive(deriver, record.privkey.map(|sk| sk.pubkey()));
        let derive_pubkey_id = maybe_derive(deriver, record.pubkey);
        let (privkey_id, pubkey_id) =
            futures::future::try_join(derive_privkey_id, derive_pubkey_id).await?;

        check_consistency(record, privkey_id, pubkey_id)
    }
}

async fn maybe_derive(
    deriver: &IdentityDeriver,
    pubkey: Option<PublicKey>,
) -> Result<Option<Multihash>, PeerIdError> {
    match pubkey {
        Some(pubkey) => Ok(Some(deriver.derive_async(pubkey).await?)),
        None => Ok(None),
    }
}

fn check_consistency(
    record: DecodedRecord,
    privkey_id: Option<Multihash>,
    pubkey_id: Option<Multihash>,
) -> Result<PeerId, PeerIdError> {
    use ConsistencyError::*;

    let DecodedRecord {
        id,
        privkey,
        pubkey,
    } = record;

    let mismatch = |err: ConsistencyError| {
        warn!("reject peer id json {}: {}", id, err);
        Err(PeerIdError::Consistency(err))
    };

    // Key pair first, otherwise an unrelated pair surfaces as an id mismatch
    if let (Some(privkey), Some(pubkey)) = (privkey.as_ref(), pubkey.as_ref()) {
        if &privkey.pubkey() != pubkey {
            return mismatch(PrivateKeyNotMatchPublicKey);
        }
    }

    if let Some(privkey_id) = privkey_id {
        if privkey_id != id {
            return mismatch(IdNotMatchPrivateKey);
        }
    }

    if let Some(pubkey_id) = pubkey_id {
        if pubkey_id != id {
            return mismatch(IdNotMatchPublicKey);
        }
    }

    debug!("peer id {} from json", id);

    Ok(PeerId {
        id,
        privkey,
        pubkey,
    })
}

impl From<&PeerId> for PeerIdJson {
    fn from(peer_id: &PeerId) -> Self {
        PeerIdJson {
            id: peer_id.to_base58(),
            priv_key: peer_id.marshal_privkey().map(|bytes| BASE64.encode(bytes)),
            pub_key: peer_id.marshal_pubkey().map(|bytes| BASE64.encode(bytes)),
        }
    }
}

impl Serialize for PeerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PeerIdJson::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PeerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = PeerIdJson::deserialize(deserializer)?;

        record
            .into_peer_id(&IdentityDeriver::default())
            .map_err(de::Error::custom)
    }
}
