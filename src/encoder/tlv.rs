use serde::Serialize;
use thiserror::Error;

/// Largest value a 2-digit decimal length prefix can announce.
pub const MAX_VALUE_LEN: usize = 99;

/// Encodes one field as `id` + two-digit byte length + value.
///
/// No validation happens here: the caller keeps `value` under 100 bytes,
/// truncating the fields that allow it. A longer value produces a
/// three-digit length prefix and therefore a malformed stream.
pub fn format_field(id: &str, value: &str) -> String {
    format!("{}{:02}{}", id, value.len(), value)
}

/// One decoded field of a TLV stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TlvField {
    pub id: String,
    pub value: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TlvError {
    #[error("truncated stream at byte {offset}")]
    Truncated { offset: usize },
    #[error("non-numeric length prefix for field {id:?}")]
    BadLength { id: String },
    #[error("length prefix of field {id:?} splits a multi-byte character")]
    SplitCharacter { id: String },
}

/// Walks a TLV stream left to right, without descending into composite
/// values. Composite fields (merchant account information, additional
/// data) can be decoded by parsing their value again.
pub fn parse_fields(stream: &str) -> Result<Vec<TlvField>, TlvError> {
    let mut fields = Vec::new();
    let mut pos = 0;
    while pos < stream.len() {
        let header = stream
            .get(pos..pos + 4)
            .ok_or(TlvError::Truncated { offset: pos })?;
        let id = &header[..2];
        if !header[2..4].bytes().all(|b| b.is_ascii_digit()) {
            return Err(TlvError::BadLength { id: id.to_string() });
        }
        let len: usize = header[2..4]
            .parse()
            .map_err(|_| TlvError::BadLength { id: id.to_string() })?;
        let start = pos + 4;
        let end = start + len;
        if end > stream.len() {
            return Err(TlvError::Truncated { offset: pos });
        }
        let value = stream.get(start..end).ok_or_else(|| TlvError::SplitCharacter {
            id: id.to_string(),
        })?;
        fields.push(TlvField {
            id: id.to_string(),
            value: value.to_string(),
        });
        pos = end;
    }
    Ok(fields)
}
