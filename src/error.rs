use crate::serialize::CodecError;
use screeps::RoomName;
use thiserror::Error;

/// Fatal tick errors. Any of these abandons the tick before records are
/// committed, leaving the previous tick's state authoritative.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("record store failure: {0}")]
    Store(String),

    #[error("record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("segment codec failure: {0}")]
    Codec(#[from] CodecError),

    #[error("site {room} has no controller")]
    MissingController { room: RoomName },
}
