use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SynthError;
use crate::screen::screen_model::Workflow;

// ============================================================================
// Artifact kinds
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    PageObject,
    Test,
    Feature,
    Steps,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::PageObject,
        ArtifactKind::Test,
        ArtifactKind::Feature,
        ArtifactKind::Steps,
    ];

    /// Human-readable type name used in the generation instruction.
    pub fn label(self) -> &'static str {
        match self {
            ArtifactKind::PageObject => "Page Object class",
            ArtifactKind::Test => "Playwright test file",
            ArtifactKind::Feature => "Gherkin feature file",
            ArtifactKind::Steps => "Cucumber step definitions",
        }
    }

    /// Substrings the generated content must contain.
    pub fn required_markers(self) -> &'static [&'static str] {
        match self {
            ArtifactKind::PageObject => &["class", "constructor"],
            ArtifactKind::Test => &["import", "test("],
            ArtifactKind::Feature => &["Feature:", "Scenario"],
            ArtifactKind::Steps => &["Given", "When", "Then"],
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ArtifactKind {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "page" | "page-object" | "pageobject" => Ok(ArtifactKind::PageObject),
            "test" => Ok(ArtifactKind::Test),
            "feature" => Ok(ArtifactKind::Feature),
            "steps" | "step" => Ok(ArtifactKind::Steps),
            _ => Err(SynthError::UnknownArtifactKind(s.to_string())),
        }
    }
}

// ============================================================================
// Generation request
// ============================================================================

/// Named inputs for one generation call. Serialized to JSON verbatim into the
/// instruction; unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_story: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_logic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflows: Option<Vec<Workflow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenarios: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_content: Option<String>,
}

// ============================================================================
// Artifacts
// ============================================================================

/// Generated, validated text content.
///
/// `hash` is for traceability only; generation is not deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub content: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub hash: String,
}

impl Artifact {
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// ISO-8601 creation timestamp.
    pub fn timestamp(&self) -> String {
        self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

// ============================================================================
// Target layout
// ============================================================================

/// Where one artifact kind lands: `<dir>/<name><suffix>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactTarget {
    pub dir: String,
    pub suffix: String,
    /// Lowercase the page name before building the file name
    #[serde(default)]
    pub lowercase: bool,
}

impl ArtifactTarget {
    fn new(dir: &str, suffix: &str, lowercase: bool) -> Self {
        Self {
            dir: dir.to_string(),
            suffix: suffix.to_string(),
            lowercase,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactLayout {
    pub page_object: ArtifactTarget,
    pub test: ArtifactTarget,
    pub feature: ArtifactTarget,
    pub steps: ArtifactTarget,
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        Self {
            page_object: ArtifactTarget::new("pageObjects", ".js", false),
            test: ArtifactTarget::new("tests", ".spec.js", true),
            feature: ArtifactTarget::new("Features", ".feature", true),
            steps: ArtifactTarget::new("Features/step_definitions", ".step.js", true),
        }
    }
}

impl ArtifactLayout {
    pub fn target(&self, kind: ArtifactKind) -> &ArtifactTarget {
        match kind {
            ArtifactKind::PageObject => &self.page_object,
            ArtifactKind::Test => &self.test,
            ArtifactKind::Feature => &self.feature,
            ArtifactKind::Steps => &self.steps,
        }
    }

    pub fn path_for(&self, kind: ArtifactKind, page_name: &str) -> PathBuf {
        let target = self.target(kind);
        let name = if target.lowercase {
            page_name.to_lowercase()
        } else {
            page_name.to_string()
        };
        PathBuf::from(&target.dir).join(format!("{}{}", name, target.suffix))
    }
}
