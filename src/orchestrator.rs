use std::path::PathBuf;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::browser::surface::Surface;
use crate::error::{Result, SynthError};
use crate::registry::reconciler::{ReconcileAction, Reconciler, Reconciliation};
use crate::registry::registry::{ArtifactRegistry, RegistryConfig};
use crate::registry::store::ArtifactStore;
use crate::screen::analyzer::SurfaceAnalyzer;
use crate::screen::screen_model::PageAnalysis;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;

/// What happened to one surface.
#[derive(Debug, Clone, Serialize)]
pub struct SurfaceReport {
    pub analysis: PageAnalysis,
    pub action: ReconcileAction,
    pub delta: Vec<String>,
    pub written: Vec<PathBuf>,
}

/// Result of a batch run that did not abort.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub reports: Vec<SurfaceReport>,
    /// Address and error for every surface skipped under continue-on-error
    pub failures: Vec<(String, SynthError)>,
}

/// Drives analyze → reconcile → persist for one surface at a time.
///
/// The registry is scanned once at construction and never refreshed, so
/// artifacts persisted during a run are not matched until the next run.
pub struct Orchestrator<St: ArtifactStore> {
    analyzer: SurfaceAnalyzer,
    reconciler: Reconciler,
    registry: ArtifactRegistry,
    store: St,
    tracer: TraceLogger,
}

impl<St: ArtifactStore> Orchestrator<St> {
    pub fn new(reconciler: Reconciler, store: St, registry_config: RegistryConfig, tracer: TraceLogger) -> Result<Self> {
        let registry = ArtifactRegistry::scan(&store, &registry_config)?;
        info!(existing = registry.len(), "registry loaded");

        Ok(Self {
            analyzer: SurfaceAnalyzer,
            reconciler,
            registry,
            store,
            tracer,
        })
    }

    pub fn registry(&self) -> &ArtifactRegistry {
        &self.registry
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    pub fn into_store(self) -> St {
        self.store
    }

    /// Load `address` on `surface`, analyze it, reconcile against the
    /// registry and persist the result.
    ///
    /// The surface is released before returning on every path. Nothing is
    /// written unless every artifact of the reconcile was produced.
    pub async fn run_surface<S: Surface + ?Sized>(&mut self, surface: &mut S, address: &str) -> Result<SurfaceReport> {
        let outcome = self.process(surface, address).await;

        if let Err(e) = surface.release() {
            warn!(address, error = %e, "failed to release surface");
        }

        match &outcome {
            Ok(report) => info!(
                address,
                action = %report.action,
                written = report.written.len(),
                "surface complete"
            ),
            Err(e) => error!(address, error = %e, "surface failed"),
        }
        outcome
    }

    async fn process<S: Surface + ?Sized>(&mut self, surface: &mut S, address: &str) -> Result<SurfaceReport> {
        url::Url::parse(address).map_err(|e| SynthError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })?;

        surface.navigate(address)?;
        surface.wait_settled()?;

        // The surface is not touched past this point.
        let analysis = self.analyzer.analyze(surface)?;

        let reconciliation = self.reconciler.reconcile(&analysis, &self.registry).await?;
        let written = self.persist(address, &reconciliation)?;

        Ok(SurfaceReport {
            analysis,
            action: reconciliation.action,
            delta: reconciliation.delta,
            written,
        })
    }

    /// Write every artifact or none of them. On a failed write, paths
    /// already written are put back to what they held before.
    fn persist(&mut self, address: &str, reconciliation: &Reconciliation) -> Result<Vec<PathBuf>> {
        let mut undo: Vec<(PathBuf, Option<String>)> = Vec::with_capacity(reconciliation.artifacts.len());

        for artifact in &reconciliation.artifacts {
            let step = self
                .store
                .read(&artifact.path)
                .and_then(|prior| self.store.write(&artifact.path, &artifact.content).map(|_| prior));

            match step {
                Ok(prior) => undo.push((artifact.path.clone(), prior)),
                Err(e) => {
                    self.roll_back(undo);
                    return Err(e);
                }
            }
        }

        for artifact in &reconciliation.artifacts {
            self.tracer
                .log(&TraceEvent::persisted(address, artifact, reconciliation.action));
            info!(kind = %artifact.kind, path = %artifact.path.display(), hash = %artifact.hash, "artifact written");
        }

        Ok(undo.into_iter().map(|(path, _)| path).collect())
    }

    fn roll_back(&mut self, undo: Vec<(PathBuf, Option<String>)>) {
        for (path, prior) in undo.into_iter().rev() {
            let restored = match &prior {
                Some(content) => self.store.write(&path, content),
                None => self.store.remove(&path),
            };
            match restored {
                Ok(()) => warn!(path = %path.display(), "rolled back partial write"),
                Err(e) => error!(path = %path.display(), error = %e, "failed to roll back partial write"),
            }
        }
    }

    /// Process `addresses` strictly one after another.
    ///
    /// `open_session` supplies a fresh surface per address. The first
    /// failure aborts the batch unless `continue_on_error` is set, in which
    /// case it is recorded and the next address is processed.
    pub async fn run_batch<S, F>(
        &mut self,
        addresses: &[String],
        mut open_session: F,
        continue_on_error: bool,
    ) -> Result<BatchReport>
    where
        S: Surface,
        F: FnMut(&str) -> Result<S>,
    {
        let mut batch = BatchReport::default();

        for (i, address) in addresses.iter().enumerate() {
            info!("[{}/{}] {}", i + 1, addresses.len(), address);

            let outcome = match open_session(address) {
                Ok(mut surface) => self.run_surface(&mut surface, address).await,
                Err(e) => Err(e),
            };

            match outcome {
                Ok(report) => batch.reports.push(report),
                Err(e) if continue_on_error => {
                    warn!(address = %address, error = %e, "continuing after failure");
                    batch.failures.push((address.clone(), e));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(batch)
    }
}
