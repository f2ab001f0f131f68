use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::registry::registry::{ArtifactRegistry, ExistingArtifact, missing_elements};
use crate::screen::screen_model::PageAnalysis;
use crate::synth::artifact::{Artifact, ArtifactKind, ArtifactLayout, GenerationRequest};
use crate::synth::synthesizer::Synthesizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileAction {
    Create,
    Update,
}

impl fmt::Display for ReconcileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileAction::Create => f.write_str("create"),
            ReconcileAction::Update => f.write_str("update"),
        }
    }
}

/// Outcome of one reconcile: every artifact carries its target path and
/// none has been persisted yet.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub action: ReconcileAction,
    /// Page name the artifacts are scoped under
    pub target_name: String,
    /// Control names missing from the existing page artifact (update only)
    pub delta: Vec<String>,
    pub artifacts: Vec<Artifact>,
}

/// Decides create vs update and drives the concurrent generation fan-out.
#[derive(Debug, Clone)]
pub struct Reconciler {
    synthesizer: Synthesizer,
    layout: ArtifactLayout,
}

impl Reconciler {
    pub fn new(synthesizer: Synthesizer, layout: ArtifactLayout) -> Self {
        Self { synthesizer, layout }
    }

    pub fn layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    pub async fn reconcile(&self, analysis: &PageAnalysis, registry: &ArtifactRegistry) -> Result<Reconciliation> {
        match registry.find_existing(analysis) {
            Some(existing) => self.update(analysis, existing).await,
            None => self.create(analysis).await,
        }
    }

    /// Generate all four kinds fresh under the analysis's page name.
    ///
    /// The join fails on the first error and drops the other in-flight
    /// generations, so no partial set is ever returned.
    pub async fn create(&self, analysis: &PageAnalysis) -> Result<Reconciliation> {
        let name = analysis.page_name.as_str();
        info!(page = name, url = %analysis.url, "creating artifacts");

        let page_req = create_page_request(analysis);
        let test_req = create_test_request(analysis);
        let feature_req = create_feature_request(analysis);
        let steps_req = create_steps_request(analysis);

        let (page, test, feature, steps) = tokio::try_join!(
            self.synthesizer.synthesize(ArtifactKind::PageObject, &page_req),
            self.synthesizer.synthesize(ArtifactKind::Test, &test_req),
            self.synthesizer.synthesize(ArtifactKind::Feature, &feature_req),
            self.synthesizer.synthesize(ArtifactKind::Steps, &steps_req),
        )?;

        let artifacts = vec![
            page.with_path(self.layout.path_for(ArtifactKind::PageObject, name)),
            test.with_path(self.layout.path_for(ArtifactKind::Test, name)),
            feature.with_path(self.layout.path_for(ArtifactKind::Feature, name)),
            steps.with_path(self.layout.path_for(ArtifactKind::Steps, name)),
        ];

        Ok(Reconciliation {
            action: ReconcileAction::Create,
            target_name: name.to_string(),
            delta: Vec::new(),
            artifacts,
        })
    }

    /// Refresh artifacts for a page that already has a page artifact.
    ///
    /// The page artifact is regenerated (with the full element set, at its
    /// existing path) only when the delta is non-empty. Test, feature and
    /// steps are always regenerated under the existing name.
    pub async fn update(&self, analysis: &PageAnalysis, existing: &ExistingArtifact) -> Result<Reconciliation> {
        let delta = missing_elements(existing, analysis);
        let name = existing.name.as_str();
        info!(page = name, delta = delta.len(), "updating artifacts");

        let page_req = (!delta.is_empty()).then(|| update_page_request(analysis, existing));
        let test_req = update_test_request(analysis);
        let feature_req = update_feature_request(analysis);
        let steps_req = update_steps_request(analysis);

        let page_future = async {
            match &page_req {
                Some(req) => self
                    .synthesizer
                    .synthesize(ArtifactKind::PageObject, req)
                    .await
                    .map(Some),
                None => Ok(None),
            }
        };

        let (page, test, feature, steps) = tokio::try_join!(
            page_future,
            self.synthesizer.synthesize(ArtifactKind::Test, &test_req),
            self.synthesizer.synthesize(ArtifactKind::Feature, &feature_req),
            self.synthesizer.synthesize(ArtifactKind::Steps, &steps_req),
        )?;

        let mut artifacts = Vec::with_capacity(4);
        if let Some(page) = page {
            artifacts.push(page.with_path(existing.path.clone()));
        }
        artifacts.push(test.with_path(self.layout.path_for(ArtifactKind::Test, name)));
        artifacts.push(feature.with_path(self.layout.path_for(ArtifactKind::Feature, name)));
        artifacts.push(steps.with_path(self.layout.path_for(ArtifactKind::Steps, name)));

        Ok(Reconciliation {
            action: ReconcileAction::Update,
            target_name: name.to_string(),
            delta,
            artifacts,
        })
    }
}

// ============================================================================
// Request shapes
// ============================================================================

pub fn create_page_request(analysis: &PageAnalysis) -> GenerationRequest {
    GenerationRequest {
        class_name: Some(analysis.page_name.clone()),
        url: Some(analysis.url.clone()),
        elements: Some(analysis.joined_element_names()),
        actions: Some(analysis.page_actions()),
        platform: Some(analysis.joined_platform()),
        business_logic: Some(analysis.joined_business_logic()),
        ..Default::default()
    }
}

pub fn create_test_request(analysis: &PageAnalysis) -> GenerationRequest {
    GenerationRequest {
        feature_description: Some(format!("Complete testing of {}", analysis.title)),
        url: Some(analysis.url.clone()),
        elements: Some(analysis.joined_element_names()),
        workflows: Some(analysis.workflows.clone()),
        platform: Some(analysis.joined_platform()),
        ..Default::default()
    }
}

pub fn create_feature_request(analysis: &PageAnalysis) -> GenerationRequest {
    GenerationRequest {
        feature: Some(analysis.title.clone()),
        workflows: Some(analysis.workflows.clone()),
        user_story: Some(format!("As a user, I want to interact with {}", analysis.title)),
        scenarios: Some(analysis.scenarios()),
        ..Default::default()
    }
}

pub fn create_steps_request(analysis: &PageAnalysis) -> GenerationRequest {
    GenerationRequest {
        feature: Some(analysis.title.clone()),
        workflows: Some(analysis.workflows.clone()),
        scenarios: Some(analysis.scenarios()),
        ..Default::default()
    }
}

pub fn update_page_request(analysis: &PageAnalysis, existing: &ExistingArtifact) -> GenerationRequest {
    GenerationRequest {
        class_name: Some(existing.name.clone()),
        url: Some(analysis.url.clone()),
        elements: Some(analysis.joined_element_names()),
        actions: Some(analysis.page_actions()),
        existing_content: Some(existing.content.clone()),
        ..Default::default()
    }
}

pub fn update_test_request(analysis: &PageAnalysis) -> GenerationRequest {
    GenerationRequest {
        feature_description: Some(format!("Testing {}", analysis.title)),
        url: Some(analysis.url.clone()),
        elements: Some(analysis.joined_element_names()),
        workflows: Some(analysis.workflows.clone()),
        ..Default::default()
    }
}

pub fn update_feature_request(analysis: &PageAnalysis) -> GenerationRequest {
    GenerationRequest {
        feature: Some(analysis.title.clone()),
        workflows: Some(analysis.workflows.clone()),
        scenarios: Some(analysis.scenarios()),
        ..Default::default()
    }
}

pub fn update_steps_request(analysis: &PageAnalysis) -> GenerationRequest {
    GenerationRequest {
        feature: Some(analysis.title.clone()),
        workflows: Some(analysis.workflows.clone()),
        ..Default::default()
    }
}
