pub type LineResult<T> = Result<T, LineError>;

#[derive(thiserror::Error, Debug)]
pub enum LineError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("cad service error: {0}")]
    Service(String),

    #[error("viewport error: {0}")]
    Viewport(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LineError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    pub fn viewport(msg: impl Into<String>) -> Self {
        Self::Viewport(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Only configuration failures abort a run.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
