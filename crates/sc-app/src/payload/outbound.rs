use std::fmt;
use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use sc_core::ports::PayloadProducer;
use sc_core::MimeType;
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::ObjectCodec;

type ObjectEncoder = Box<dyn Fn() -> anyhow::Result<Vec<u8>> + Send + Sync>;

enum PayloadSource {
    Bytes(Vec<u8>),
    /// Stream-copied from a file on disk.
    File(PathBuf),
    /// Encoded at write time, so an encoding failure rolls the transaction back.
    Object(ObjectEncoder),
}

impl fmt::Debug for PayloadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadSource::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            PayloadSource::File(path) => f.debug_tuple("File").field(path).finish(),
            PayloadSource::Object(_) => f.write_str("Object"),
        }
    }
}

/// One payload of a clipboard set together with its mime label.
#[derive(Debug)]
pub struct OutboundPayload {
    mime: MimeType,
    source: PayloadSource,
}

impl OutboundPayload {
    pub fn bytes(mime: MimeType, data: impl Into<Vec<u8>>) -> Self {
        Self {
            mime,
            source: PayloadSource::Bytes(data.into()),
        }
    }

    pub fn file(mime: MimeType, path: impl Into<PathBuf>) -> Self {
        Self {
            mime,
            source: PayloadSource::File(path.into()),
        }
    }

    pub fn object<T>(mime: MimeType, value: T, codec: ObjectCodec) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        Self {
            mime,
            source: PayloadSource::Object(Box::new(move || codec.encode(&value))),
        }
    }
}

#[async_trait]
impl PayloadProducer for OutboundPayload {
    fn mime_type(&self) -> &MimeType {
        &self.mime
    }

    async fn write_to(&self, sink: &mut (dyn AsyncWrite + Send + Unpin)) -> anyhow::Result<()> {
        match &self.source {
            PayloadSource::Bytes(bytes) => sink.write_all(bytes).await?,
            PayloadSource::File(path) => {
                let mut file = tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("Failed to open payload file: {}", path.display()))?;
                tokio::io::copy(&mut file, sink)
                    .await
                    .with_context(|| format!("Failed to copy payload file: {}", path.display()))?;
            }
            PayloadSource::Object(encode) => {
                let bytes = encode()?;
                sink.write_all(&bytes).await?;
            }
        }
        sink.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bytes_payload_writes_verbatim() {
        let payload = OutboundPayload::bytes(MimeType::text_plain(), "hello");
        let mut sink: Vec<u8> = Vec::new();
        payload.write_to(&mut sink).await.unwrap();
        assert_eq!(sink, b"hello");
    }

    #[tokio::test]
    async fn missing_file_payload_fails() {
        let payload = OutboundPayload::file(MimeType::octet_stream(), "/definitely/not/here");
        let mut sink: Vec<u8> = Vec::new();
        assert!(payload.write_to(&mut sink).await.is_err());
    }

    #[tokio::test]
    async fn object_payload_uses_codec() {
        let payload = OutboundPayload::object(
            MimeType::custom("vnd.test.numbers"),
            vec![1u32, 2, 3],
            ObjectCodec::Json,
        );
        let mut sink: Vec<u8> = Vec::new();
        payload.write_to(&mut sink).await.unwrap();
        assert_eq!(sink, b"[1,2,3]");
    }
}
