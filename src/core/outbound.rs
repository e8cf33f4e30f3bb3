//! Units of outbound protocol data

use serde::{Deserialize, Serialize};

/// A single unit sent to the terminal session for one encoded input event.
///
/// Text is transport-encoded as UTF-8; bytes are sent as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutboundUnit {
    /// Literal text
    Text(String),
    /// Raw control or escape bytes
    Bytes(Vec<u8>),
}

impl OutboundUnit {
    /// Literal text unit
    pub fn text(text: impl Into<String>) -> Self {
        OutboundUnit::Text(text.into())
    }

    /// Raw byte unit
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        OutboundUnit::Bytes(bytes.into())
    }

    /// Wire representation of this unit
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            OutboundUnit::Text(text) => text.as_bytes(),
            OutboundUnit::Bytes(bytes) => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            OutboundUnit::Text(text) => text.into_bytes(),
            OutboundUnit::Bytes(bytes) => bytes,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, OutboundUnit::Text(_))
    }
}

/// Render bytes as a printable string with C0 controls escaped, e.g. `\e[A`
pub fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        for c in chunk.valid().chars() {
            match c {
                '\x1b' => out.push_str("\\e"),
                '\r' => out.push_str("\\r"),
                '\n' => out.push_str("\\n"),
                '\t' => out.push_str("\\t"),
                '\\' => out.push_str("\\\\"),
                c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
                c => out.push(c),
            }
        }
        for byte in chunk.invalid() {
            out.push_str(&format!("\\x{:02x}", byte));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_bytes() {
        assert_eq!(OutboundUnit::text("é").as_bytes(), "é".as_bytes());
        assert_eq!(OutboundUnit::bytes(vec![0x1b, b'[', b'A']).as_bytes(), b"\x1b[A");
        assert_eq!(OutboundUnit::text("ab").into_bytes(), b"ab".to_vec());
        assert!(OutboundUnit::text("a").is_text());
        assert!(!OutboundUnit::bytes(vec![0x7f]).is_text());
    }

    #[test]
    fn test_escape_bytes() {
        assert_eq!(escape_bytes(b"\x1b[A"), "\\e[A");
        assert_eq!(escape_bytes(b"\x7f"), "\\x7f");
        assert_eq!(escape_bytes(&[0x1b, b'[', b'M', 0xff]), "\\e[M\\xff");
        assert_eq!(escape_bytes("héllo\n".as_bytes()), "héllo\\n");
    }
}
