//! Mode S protocol layer: checksum, field extraction and the
//! format/length acceptance table.

pub mod crc;
pub mod fields;
mod types;
mod validate;

pub use types::{DecodedMessage, DownlinkFormat};
pub use validate::{validate, Validation};
