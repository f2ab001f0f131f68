use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::browser::session::BrowserSession;
use crate::browser::surface::Surface;
use crate::cli::config::{AppConfig, GeneratorConfig, TraceConfig};
use crate::error::{Result, SynthError};
use crate::locator::resolver::Resolver;
use crate::locator::strategy::CueKind;
use crate::orchestrator::{Orchestrator, SurfaceReport};
use crate::registry::reconciler::Reconciler;
use crate::registry::store::{ArtifactStore, FsArtifactStore};
use crate::synth::artifact::{ArtifactKind, GenerationRequest};
use crate::synth::generator::{
    DEFAULT_OLLAMA_ENDPOINT, DEFAULT_OLLAMA_MODEL, DEFAULT_OPENAI_ENDPOINT, DEFAULT_OPENAI_MODEL,
    MockGenerator, OllamaGenerator, OpenAiGenerator, TextGenerator,
};
use crate::synth::synthesizer::Synthesizer;
use crate::trace::logger::TraceLogger;

// ============================================================================
// analyze subcommand
// ============================================================================

pub async fn cmd_analyze(config: &AppConfig, output_root: &str, url: &str) -> Result<()> {
    let mut orchestrator = build_orchestrator(config, output_root)?;
    let mut session = BrowserSession::launch(&config.browser.server_script)?;

    let report = orchestrator.run_surface(&mut session, url).await?;
    print_report(&report);
    Ok(())
}

// ============================================================================
// batch subcommand
// ============================================================================

pub async fn cmd_batch(config: &AppConfig, output_root: &str, urls: &[String]) -> Result<()> {
    let mut orchestrator = build_orchestrator(config, output_root)?;
    let script = config.browser.server_script.clone();

    let batch = orchestrator
        .run_batch(urls, |_| BrowserSession::launch(&script), config.batch.continue_on_error)
        .await?;

    for report in &batch.reports {
        print_report(report);
    }
    for (url, e) in &batch.failures {
        println!("FAILED {}: {}", url, e);
    }

    println!(
        "Processed {} pages ({} failed)",
        batch.reports.len() + batch.failures.len(),
        batch.failures.len()
    );
    Ok(())
}

// ============================================================================
// generate subcommand
// ============================================================================

pub struct GenerateArgs<'a> {
    pub kind: &'a str,
    pub feature: &'a str,
    pub url: Option<&'a str>,
    pub elements: Option<&'a str>,
    pub actions: Option<&'a str>,
    pub scenarios: Option<&'a str>,
    pub output: Option<&'a str>,
}

pub async fn cmd_generate(config: &AppConfig, args: GenerateArgs<'_>) -> Result<()> {
    let kind: ArtifactKind = args.kind.parse()?;
    let synthesizer = Synthesizer::new(build_generator(&config.generator)?);

    let request = single_request(kind, &args);
    let artifact = synthesizer.synthesize(kind, &request).await?;

    match args.output {
        Some(path) => {
            let path = Path::new(path);
            let mut store = FsArtifactStore::new(".");
            store.write(path, &artifact.content)?;
            println!("Wrote {} ({}) to {}", kind, artifact.hash, path.display());
        }
        None => println!("{}", artifact.content),
    }
    Ok(())
}

/// Request for a one-off generation: the feature name doubles as the class
/// name for page objects.
pub fn single_request(kind: ArtifactKind, args: &GenerateArgs<'_>) -> GenerationRequest {
    let owned = |v: Option<&str>| v.map(str::to_string);

    let mut request = GenerationRequest {
        url: owned(args.url),
        elements: owned(args.elements),
        actions: owned(args.actions),
        scenarios: owned(args.scenarios),
        ..Default::default()
    };

    match kind {
        ArtifactKind::PageObject => request.class_name = Some(args.feature.to_string()),
        ArtifactKind::Test => request.feature_description = Some(args.feature.to_string()),
        ArtifactKind::Feature => {
            request.feature = Some(args.feature.to_string());
            request.user_story = Some(format!("As a user, I want to interact with {}", args.feature));
        }
        ArtifactKind::Steps => request.feature = Some(args.feature.to_string()),
    }
    request
}

// ============================================================================
// locate subcommand
// ============================================================================

pub fn cmd_locate(config: &AppConfig, url: &str, cue: &str, kind: CueKind) -> Result<()> {
    let resolver = Resolver::new(config.resolver.strategy_timeout_ms);
    let mut session = BrowserSession::launch(&config.browser.server_script)?;

    let outcome = session
        .navigate(url)
        .and_then(|_| session.wait_settled())
        .and_then(|_| resolver.resolve(&mut session, cue, kind));
    session.release()?;

    let handle = outcome?;
    println!("{} -> {}", cue, handle.locator.describe());
    if let Some(text) = handle.node.text.as_deref().filter(|t| !t.is_empty()) {
        println!("  text: {}", text);
    }
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Build the text generator named by `config.provider`.
pub fn build_generator(config: &GeneratorConfig) -> Result<Arc<dyn TextGenerator>> {
    match config.provider.as_str() {
        "ollama" => {
            let endpoint = config.endpoint.as_deref().unwrap_or(DEFAULT_OLLAMA_ENDPOINT);
            let model = config.model.as_deref().unwrap_or(DEFAULT_OLLAMA_MODEL);
            Ok(Arc::new(OllamaGenerator::new(endpoint, model, config.temperature)))
        }
        "openai" => {
            let api_key = std::env::var(&config.api_key_env).map_err(|_| {
                SynthError::Config(format!("{} is not set", config.api_key_env))
            })?;
            let endpoint = config.endpoint.as_deref().unwrap_or(DEFAULT_OPENAI_ENDPOINT);
            let model = config.model.as_deref().unwrap_or(DEFAULT_OPENAI_MODEL);
            Ok(Arc::new(OpenAiGenerator::new(endpoint, model, config.temperature, &api_key)))
        }
        "mock" => Ok(Arc::new(MockGenerator::new())),
        other => Err(SynthError::Config(format!(
            "Unknown provider '{}' (expected ollama, openai or mock)",
            other
        ))),
    }
}

/// Where the trace file goes: relative paths land under the output root,
/// next to the artifacts.
pub fn trace_path(trace: &TraceConfig, output_root: &str) -> PathBuf {
    Path::new(output_root).join(&trace.path)
}

fn build_orchestrator(config: &AppConfig, output_root: &str) -> Result<Orchestrator<FsArtifactStore>> {
    let synthesizer = Synthesizer::new(build_generator(&config.generator)?);
    let reconciler = Reconciler::new(synthesizer, config.layout.clone());

    let tracer = if config.trace.enabled {
        TraceLogger::new(trace_path(&config.trace, output_root))
    } else {
        TraceLogger::disabled()
    };

    info!(root = output_root, provider = %config.generator.provider, "starting");
    Orchestrator::new(
        reconciler,
        FsArtifactStore::new(output_root),
        config.registry.clone(),
        tracer,
    )
}

fn print_report(report: &SurfaceReport) {
    println!(
        "{} {} ({}): {} controls, {} workflows",
        report.action,
        report.analysis.page_name,
        report.analysis.url,
        report.analysis.controls.len(),
        report.analysis.workflows.len()
    );
    if !report.delta.is_empty() {
        println!("  new elements: {}", report.delta.join(", "));
    }
    for path in &report.written {
        println!("  wrote {}", path.display());
    }
}
