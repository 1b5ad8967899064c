use thiserror::Error;

pub type WireframeResult<T> = Result<T, WireframeError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WireframeError {
    #[error("No JSON object found in the model response")]
    MalformedResponse { raw: String },

    #[error("Invalid JSON at byte {offset} (line {line}, column {column}): {message}")]
    InvalidJson {
        offset: usize,
        line: usize,
        column: usize,
        message: String,
        raw: String,
    },

    #[error("Schema violation at '{path}': {reason}")]
    SchemaViolation {
        path: String,
        reason: String,
        raw: String,
    },

    #[error("Generation failed: {message}")]
    GenerationFailure {
        message: String,
        raw: Option<String>,
    },

    #[error("A generation request is already running for this session")]
    Busy,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export failed: {0}")]
    Export(String),
}

impl WireframeError {
    /// The text that caused the failure, when there is one worth showing.
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            WireframeError::MalformedResponse { raw }
            | WireframeError::InvalidJson { raw, .. }
            | WireframeError::SchemaViolation { raw, .. } => Some(raw.as_str()),
            WireframeError::GenerationFailure { raw, .. } => raw.as_deref(),
            WireframeError::Busy | WireframeError::Config(_) | WireframeError::Export(_) => None,
        }
    }

    /// One-line message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            WireframeError::MalformedResponse { .. } => {
                "The model did not return a layout. Try refining the description.".to_string()
            }
            WireframeError::InvalidJson { .. } | WireframeError::SchemaViolation { .. } => {
                format!("The model returned an unusable layout: {}", self)
            }
            WireframeError::GenerationFailure { message, .. } => {
                format!("Could not generate a wireframe: {}", message)
            }
            WireframeError::Busy => "Please wait for the current generation to finish.".to_string(),
            WireframeError::Config(msg) => format!("Invalid configuration: {}", msg),
            WireframeError::Export(msg) => format!("Could not save the wireframe: {}", msg),
        }
    }

    pub(crate) fn schema(path: impl Into<String>, reason: impl Into<String>, raw: &str) -> Self {
        WireframeError::SchemaViolation {
            path: path.into(),
            reason: reason.into(),
            raw: raw.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for WireframeError {
    fn from(err: serde_yaml::Error) -> Self {
        WireframeError::Config(err.to_string())
    }
}
