//! Payload producers and consumers.
//!
//! A closed set of variants behind the [`PayloadProducer`] / [`PayloadConsumer`]
//! ports: raw bytes, file stream-copy, and serde object encoding.
//!
//! [`PayloadProducer`]: sc_core::ports::PayloadProducer
//! [`PayloadConsumer`]: sc_core::ports::PayloadConsumer

mod codec;
mod inbound;
mod outbound;

pub use codec::ObjectCodec;
pub use inbound::{BytesCollector, DirectoryTarget, FileTarget, ObjectCollector};
pub use outbound::OutboundPayload;
