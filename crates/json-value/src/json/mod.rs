//! JSON wire codec (RFC 8259).

mod decoder;
mod encoder;
mod error;

pub use decoder::JsonDecoder;
pub use encoder::{JsonEncoder, WriteOptions};
pub use error::JsonError;
