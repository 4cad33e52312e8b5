pub type RadarResult<T> = Result<T, RadarError>;

/// Pipeline errors. Transport unavailability is deliberately NOT represented
/// here: a missing remote image is an expected outcome and surfaces as an
/// absent value, never as an error.
#[derive(thiserror::Error, Debug)]
pub enum RadarError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("composite error: {0}")]
    Composite(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("task error: {0}")]
    Task(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RadarError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn composite(msg: impl Into<String>) -> Self {
        Self::Composite(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn task(msg: impl Into<String>) -> Self {
        Self::Task(msg.into())
    }
}
