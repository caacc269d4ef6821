use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};

/// Byte encoding for object payloads. Reader and writer must agree on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ObjectCodec {
    #[default]
    Bincode,
    Json,
}

impl ObjectCodec {
    pub fn encode<T: Serialize + ?Sized>(self, value: &T) -> anyhow::Result<Vec<u8>> {
        match self {
            ObjectCodec::Bincode => bincode::serialize(value).context("bincode encode failed"),
            ObjectCodec::Json => serde_json::to_vec(value).context("json encode failed"),
        }
    }

    pub fn decode<T: DeserializeOwned>(self, bytes: &[u8]) -> anyhow::Result<T> {
        match self {
            ObjectCodec::Bincode => bincode::deserialize(bytes).context("bincode decode failed"),
            ObjectCodec::Json => serde_json::from_slice(bytes).context("json decode failed"),
        }
    }
}
