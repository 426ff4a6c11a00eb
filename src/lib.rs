//! Static PIX payment payload encoder ("copia e cola" / EMV BR Code),
//! with the CRC16/CCITT-FALSE trailer wallet apps verify on scan.

pub mod config;
pub mod encoder;
pub mod models;
pub mod utils;

pub use encoder::{checksum_matches, encode, try_encode, EncodeError};
pub use models::PixCharge;
pub use utils::amount::{Amount, AmountError};
