//! Text-safe packing for record trees stored in raw memory segments:
//! bincode, gzip, then standard base64.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("bincode: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("gzip: {0}")]
    Compression(#[from] std::io::Error),

    #[error("base64: {0}")]
    Text(#[from] base64::DecodeError),
}

pub fn pack<T: Serialize>(value: &T) -> Result<String, CodecError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());

    bincode::serialize_into(&mut encoder, value)?;
    encoder.flush()?;

    Ok(STANDARD.encode(encoder.finish()?))
}

pub fn unpack<T: DeserializeOwned>(packed: &str) -> Result<T, CodecError> {
    let compressed = STANDARD.decode(packed)?;

    Ok(bincode::deserialize_from(GzDecoder::new(compressed.as_slice()))?)
}
