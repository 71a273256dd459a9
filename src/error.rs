/// Convenience result type used across the scene engine.
pub type SceneResult<T> = Result<T, SceneError>;

/// Errors raised while building, rendering or encoding a scene.
///
/// A highlight target that cannot be found is not an error: region lookup
/// returns `Option` and the scene skips the step.
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// No registered scene carries the requested name.
    #[error("unknown scene '{name}' (known scenes: {known})")]
    UnknownScene { name: String, known: String },

    /// A style value is out of range (negative stroke, zero font size, bad hex).
    #[error("invalid style: {0}")]
    InvalidStyle(String),

    /// An element could not be laid out.
    #[error("layout error: {0}")]
    Layout(String),

    /// A play or wait call was rejected by the timeline.
    #[error("timeline error: {0}")]
    Timeline(String),

    /// Frame evaluation or frame export failed.
    #[error("render error: {0}")]
    Render(String),

    /// The external encoder failed.
    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SceneError {
    pub fn invalid_style(msg: impl Into<String>) -> Self {
        Self::InvalidStyle(msg.into())
    }

    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    pub fn timeline(msg: impl Into<String>) -> Self {
        Self::Timeline(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SceneError::UnknownScene {
            name: "Nope".into(),
            known: "AsyncProcessingExplanation".into(),
        };
        assert!(err.to_string().contains("unknown scene 'Nope'"));
        assert!(err.to_string().contains("AsyncProcessingExplanation"));

        let err = SceneError::invalid_style("font size must be positive");
        assert_eq!(err.to_string(), "invalid style: font size must be positive");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SceneError = io.into();
        assert!(matches!(err, SceneError::Io(_)));
    }
}
