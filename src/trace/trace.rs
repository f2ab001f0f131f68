use serde::Serialize;

use crate::registry::reconciler::ReconcileAction;
use crate::synth::artifact::{Artifact, ArtifactKind};

/// One line of the JSONL ledger: a persisted artifact.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp: String,
    pub address: String,

    pub kind: ArtifactKind,
    pub path: String,
    pub hash: String,

    pub action: ReconcileAction,
}

impl TraceEvent {
    pub fn persisted(address: &str, artifact: &Artifact, action: ReconcileAction) -> Self {
        Self {
            timestamp: artifact.timestamp(),
            address: address.to_string(),
            kind: artifact.kind,
            path: artifact.path.display().to_string(),
            hash: artifact.hash.clone(),
            action,
        }
    }
}
