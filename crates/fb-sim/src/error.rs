use fb_bridge::BridgeError;
use fb_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

pub type SimResult<T> = Result<T, SimError>;
