use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::registry::store::ArtifactStore;
use crate::screen::screen_model::PageAnalysis;

/// Where prior page artifacts live and which ones to ignore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_dir")]
    pub dir: String,

    #[serde(default = "default_extension")]
    pub extension: String,

    /// Names containing any of these are not indexed
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            extension: default_extension(),
            exclude: default_exclude(),
        }
    }
}

fn default_dir() -> String { "pageObjects".to_string() }
fn default_extension() -> String { "js".to_string() }
fn default_exclude() -> Vec<String> { vec!["Task".to_string()] }

/// A previously produced page artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingArtifact {
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

/// Index of prior page artifacts, built once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ArtifactRegistry {
    entries: Vec<ExistingArtifact>,
}

impl ArtifactRegistry {
    /// Scan the configured directory of `store` once.
    pub fn scan<St: ArtifactStore + ?Sized>(store: &St, config: &RegistryConfig) -> Result<Self> {
        let dir = Path::new(&config.dir);
        let mut entries = Vec::new();

        for name in store.list(dir, &config.extension)? {
            if config.exclude.iter().any(|x| name.contains(x.as_str())) {
                continue;
            }

            let path = dir.join(format!("{}.{}", name, config.extension));
            if let Some(content) = store.read(&path)? {
                entries.push(ExistingArtifact {
                    name,
                    path,
                    content,
                });
            }
        }

        debug!(count = entries.len(), dir = %config.dir, "registry scanned");
        Ok(Self { entries })
    }

    pub fn from_entries(entries: Vec<ExistingArtifact>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ExistingArtifact] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First indexed artifact (in scan order) that matches the analysis.
    pub fn find_existing(&self, analysis: &PageAnalysis) -> Option<&ExistingArtifact> {
        self.entries.iter().find(|e| matches_analysis(e, analysis))
    }
}

/// Permissive match: an address hit OR a title hit is enough.
///
/// - address hit: the stored content contains the full source address, or
///   its path component (a bare `/` path is not used as a needle)
/// - title hit: the artifact name, lowercased, contains the first
///   space-delimited title token, lowercased (an empty token is not used)
///
/// This deliberately favors updating over duplicating, so unrelated pages
/// whose titles share a first word collide.
pub fn matches_analysis(existing: &ExistingArtifact, analysis: &PageAnalysis) -> bool {
    address_matches(existing, analysis) || title_matches(existing, analysis)
}

fn address_matches(existing: &ExistingArtifact, analysis: &PageAnalysis) -> bool {
    if !analysis.url.is_empty() && existing.content.contains(&analysis.url) {
        return true;
    }

    analysis
        .path()
        .filter(|p| !p.is_empty() && p != "/")
        .is_some_and(|p| existing.content.contains(&p))
}

fn title_matches(existing: &ExistingArtifact, analysis: &PageAnalysis) -> bool {
    let token = analysis
        .title
        .to_lowercase()
        .split(' ')
        .next()
        .unwrap_or("")
        .to_string();

    !token.is_empty() && existing.name.to_lowercase().contains(&token)
}

/// Control names from the analysis that do not occur anywhere in the
/// existing artifact's content.
pub fn missing_elements(existing: &ExistingArtifact, analysis: &PageAnalysis) -> Vec<String> {
    analysis
        .controls
        .iter()
        .map(|c| c.derived_name.as_str())
        .filter(|name| !existing.content.contains(name))
        .map(str::to_string)
        .collect()
}
