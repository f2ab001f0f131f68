use thiserror::Error;

pub type Result<T> = std::result::Result<T, SynthError>;

#[derive(Debug, Error)]
pub enum SynthError {
    /// Every lookup strategy for a cue came back empty
    #[error("Could not find {kind} matching \"{cue}\" on the surface")]
    ResolutionExhausted { cue: String, kind: String },

    /// Node.js helper failed to spawn
    #[error("Failed to spawn {script} (is Node.js installed?): {source}")]
    SubprocessSpawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// Pipe-level failure talking to the browser helper
    #[error("Browser session I/O: {0}")]
    SessionIO(String),

    /// Browser helper answered with ok=false or a malformed payload
    #[error("Browser command '{command}' failed: {error}")]
    SessionProtocol { command: String, error: String },

    /// DOM extraction returned something unusable
    #[error("Extraction fault: {0}")]
    Extraction(String),

    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Generated {kind} is empty")]
    GenerationEmpty { kind: String },

    #[error("Generated {kind} missing: {}", missing.join(", "))]
    GenerationInvalid { kind: String, missing: Vec<String> },

    /// Failure reported by a text-generation backend
    #[error("Generation backend error: {0}")]
    Backend(String),

    /// Transport or backend failure from the text-generation service
    #[error("{kind} generation failed: {message}")]
    GenerationTransport { kind: String, message: String },

    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Unknown artifact kind '{0}' (expected page|test|feature|steps)")]
    UnknownArtifactKind(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SynthError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        SynthError::Io {
            path: path.into(),
            source,
        }
    }
}
