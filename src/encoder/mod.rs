pub mod brcode;
pub mod crc16;
pub mod tlv;

pub use brcode::{checksum_matches, encode, try_encode, EncodeError};
pub use crc16::crc16_ccitt;
pub use tlv::{format_field, parse_fields, TlvError, TlvField};
