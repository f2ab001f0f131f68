use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use sha1::{Digest, Sha1};
use tracing::debug;

use crate::error::{Result, SynthError};
use crate::synth::artifact::{Artifact, ArtifactKind, GenerationRequest};
use crate::synth::generator::TextGenerator;

const HASH_LEN: usize = 16;

/// Turns a generation request into a validated artifact.
///
/// One call to the generator per `synthesize`; failures are surfaced as-is,
/// never retried.
#[derive(Clone)]
pub struct Synthesizer {
    generator: Arc<dyn TextGenerator>,
}

impl std::fmt::Debug for Synthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synthesizer").finish_non_exhaustive()
    }
}

impl Synthesizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn synthesize(&self, kind: ArtifactKind, request: &GenerationRequest) -> Result<Artifact> {
        let instruction = build_instruction(kind, request)?;

        let raw = self
            .generator
            .generate(&instruction)
            .await
            .map_err(|e| SynthError::GenerationTransport {
                kind: kind.label().to_string(),
                message: e.to_string(),
            })?;

        let content = strip_code_fences(&raw);
        validate(kind, &content)?;

        let hash = content_hash(&content);
        debug!(%kind, %hash, bytes = content.len(), "artifact synthesized");

        Ok(Artifact {
            kind,
            content,
            path: PathBuf::new(),
            created_at: Utc::now(),
            hash,
        })
    }
}

/// Render the fixed instruction template for `kind` around the JSON request.
pub fn build_instruction(kind: ArtifactKind, request: &GenerationRequest) -> Result<String> {
    let input = serde_json::to_string(request).map_err(|e| SynthError::JsonSerialize {
        context: "GenerationRequest".into(),
        source: e,
    })?;

    Ok(format!(
        "Generate {kind} with these requirements:
- Use Page Object Model patterns
- Follow naming conventions (btn, input, dropdown)
- Include proper error handling and logging
- Add comprehensive assertions and validations
- Use existing BasePage and PageObjectManager patterns

Input: {input}
Generate ONLY the complete {kind} content.",
        kind = kind.label(),
        input = input,
    ))
}

/// Drop every code-fence line (```` ``` ```` with or without a language tag), then trim.
pub fn strip_code_fences(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Structural self-check: non-empty and carrying every required marker.
pub fn validate(kind: ArtifactKind, content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(SynthError::GenerationEmpty {
            kind: kind.label().to_string(),
        });
    }

    let missing: Vec<String> = kind
        .required_markers()
        .iter()
        .filter(|marker| !content.contains(*marker))
        .map(|marker| marker.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(SynthError::GenerationInvalid {
            kind: kind.label().to_string(),
            missing,
        });
    }

    Ok(())
}

/// First 16 hex chars of the SHA-1 of `content`.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(content.as_bytes());
    let mut hex = format!("{:x}", hasher.finalize());
    hex.truncate(HASH_LEN);
    hex
}
