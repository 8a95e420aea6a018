pub type RasterFxResult<T> = Result<T, RasterFxError>;

#[derive(thiserror::Error, Debug)]
pub enum RasterFxError {
    #[error("decode error: {0}")]
    Decode(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("pixel ({x}, {y}) is out of bounds for {width}x{height} buffer")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("unsupported effect '{0}'")]
    UnsupportedEffect(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RasterFxError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn unsupported(kind: impl Into<String>) -> Self {
        Self::UnsupportedEffect(kind.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether the failure was caused by the caller's input rather than by processing.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Decode(_) | Self::UnsupportedEffect(_) | Self::Validation(_) | Self::Serde(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
