pub type VoidwireResult<T> = Result<T, VoidwireError>;

#[derive(thiserror::Error, Debug)]
pub enum VoidwireError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("asset error: {0}")]
    Assets(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VoidwireError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn assets(msg: impl Into<String>) -> Self {
        Self::Assets(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
