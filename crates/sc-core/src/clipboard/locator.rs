//! Locator codec.
//!
//! A locator is the only handle a client ever holds on a stored item. Wire form:
//! `item/<percent-encoded-mime>/<token>`. Encoding is structural only; no I/O.

use std::fmt;
use std::str::FromStr;

use crate::clipboard::MimeType;
use crate::error::ClipError;
use crate::ids::ItemToken;

pub const ITEM_SEGMENT: &str = "item";
pub const SEPARATOR: char = '/';

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    mime: MimeType,
    token: ItemToken,
}

impl Locator {
    pub fn new(mime: MimeType, token: ItemToken) -> Self {
        Self { mime, token }
    }

    pub fn mime(&self) -> &MimeType {
        &self.mime
    }

    pub fn token(&self) -> &ItemToken {
        &self.token
    }

    pub fn into_parts(self) -> (MimeType, ItemToken) {
        (self.mime, self.token)
    }

    pub fn encode(&self) -> String {
        encode(&self.mime, &self.token)
    }

    pub fn decode(value: &str) -> Result<Self, ClipError> {
        decode(value)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Locator {
    type Err = ClipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

pub fn encode(mime: &MimeType, token: &ItemToken) -> String {
    format!(
        "{ITEM_SEGMENT}{SEPARATOR}{}{SEPARATOR}{}",
        escape_segment(mime.as_str()),
        token
    )
}

/// Strict decode: exactly three segments, literal `item` first, non-empty mime and token.
pub fn decode(value: &str) -> Result<Locator, ClipError> {
    let segments: Vec<&str> = value.split(SEPARATOR).collect();
    let [head, mime, token] = segments.as_slice() else {
        return Err(ClipError::malformed(value));
    };
    if *head != ITEM_SEGMENT || mime.is_empty() || token.is_empty() {
        return Err(ClipError::malformed(value));
    }
    let mime = unescape_segment(mime).ok_or_else(|| ClipError::malformed(value))?;
    if mime.is_empty() {
        return Err(ClipError::malformed(value));
    }
    let token = ItemToken::parse(token).map_err(|_| ClipError::malformed(value))?;
    Ok(Locator::new(MimeType(mime), token))
}

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-' | b'!' | b'.' | b'~' | b'\'' | b'(' | b')' | b'*')
}

/// Percent-escape every byte outside the unreserved set, upper-case hex.
pub fn escape_segment(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for &byte in value.as_bytes() {
        if is_unreserved(byte) {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push_str(&hex::encode_upper([byte]));
        }
    }
    out
}

/// Reverse of [`escape_segment`]. `None` on a truncated escape, bad hex or non UTF-8 output.
pub fn unescape_segment(value: &str) -> Option<String> {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let pair = bytes.get(i + 1..i + 3)?;
            let decoded = hex::decode(pair).ok()?;
            out.extend_from_slice(&decoded);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_text_plain_with_escaped_slash() {
        let token = ItemToken::from("tok");
        assert_eq!(
            encode(&MimeType::text_plain(), &token),
            "item/text%2Fplain/tok"
        );
    }

    #[test]
    fn round_trips_mime_and_token() {
        let cases = [
            "text/plain",
            "application/vnd.ms-excel; charset=utf-8",
            "vnd.superclip.cursor.item/vnd.clipboard.data",
            "a b%c/d",
            "图片/png",
        ];
        for mime in cases {
            let token = ItemToken::new();
            let locator = Locator::new(MimeType::from(mime), token.clone());
            let decoded = decode(&locator.encode()).unwrap();
            assert_eq!(decoded.mime().as_str(), mime);
            assert_eq!(decoded.token(), &token);
        }
    }

    #[test]
    fn rejects_wrong_segment_count() {
        for bad in ["item/text", "item/text/tok/extra", "item", "", "/item/text/tok"] {
            assert!(matches!(decode(bad), Err(ClipError::Malformed(_))), "{bad:?}");
        }
    }

    #[test]
    fn rejects_wrong_head_or_empty_segments() {
        for bad in ["check/text/tok", "item//tok", "item/text/", "ITEM/text/tok"] {
            assert!(matches!(decode(bad), Err(ClipError::Malformed(_))), "{bad:?}");
        }
    }

    #[test]
    fn rejects_broken_escapes() {
        for bad in ["item/text%2/tok", "item/text%zz/tok", "item/%FF/tok"] {
            assert!(matches!(decode(bad), Err(ClipError::Malformed(_))), "{bad:?}");
        }
    }

    #[test]
    fn rejects_dot_tokens() {
        assert!(decode("item/text/..").is_err());
        assert!(decode("item/text/.").is_err());
    }

    #[test]
    fn display_and_from_str_agree() {
        let locator = Locator::new(MimeType::from("a/a"), ItemToken::from("t1"));
        let parsed: Locator = locator.to_string().parse().unwrap();
        assert_eq!(parsed, locator);
    }
}
