use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::locator::resolver::DEFAULT_STRATEGY_WAIT_MS;
use crate::locator::strategy::CueKind;
use crate::registry::registry::RegistryConfig;
use crate::synth::artifact::ArtifactLayout;
use crate::synth::generator::DEFAULT_TEMPERATURE;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "screen-synth",
    version,
    about = "Analyze rendered pages and synthesize page objects, tests, features and step definitions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: screen-synth.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Text generation provider: ollama, openai or mock
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Text generation endpoint
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Text generation model name
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Root directory artifacts are read from and written to
    #[arg(long, global = true)]
    pub output_root: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze one page and create or update its artifacts
    Analyze {
        /// Address of the page to analyze
        #[arg(long)]
        url: String,
    },

    /// Analyze several pages, one after another
    Batch {
        /// Addresses to analyze, in order
        #[arg(required = true)]
        urls: Vec<String>,

        /// Keep going after a page fails instead of aborting the batch
        #[arg(long)]
        continue_on_error: bool,
    },

    /// Generate a single artifact from explicit inputs
    Generate {
        /// Artifact kind: page, test, feature or steps
        kind: String,

        /// Feature (or class) name the artifact is about
        #[arg(long)]
        feature: String,

        #[arg(long)]
        url: Option<String>,

        /// Comma-separated element names
        #[arg(long)]
        elements: Option<String>,

        /// Comma-separated page actions
        #[arg(long)]
        actions: Option<String>,

        /// Comma-separated scenario descriptions
        #[arg(long)]
        scenarios: Option<String>,

        /// Output file (default: print to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Resolve a cue on a page and print the locator that matched
    Locate {
        #[arg(long)]
        url: String,

        /// Human-readable text naming the control
        #[arg(long)]
        cue: String,

        #[arg(long, value_enum, default_value = "generic")]
        kind: CueKind,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `screen-synth.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub layout: ArtifactLayout,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub trace: TraceConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    pub endpoint: Option<String>,
    pub model: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Environment variable holding the OpenAI API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: None,
            model: None,
            temperature: DEFAULT_TEMPERATURE,
            api_key_env: default_api_key_env(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default = "default_strategy_timeout")]
    pub strategy_timeout_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            strategy_timeout_ms: DEFAULT_STRATEGY_WAIT_MS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchConfig {
    #[serde(default)]
    pub continue_on_error: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceConfig {
    #[serde(default = "default_trace_path")]
    pub path: String,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            path: default_trace_path(),
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Node helper that speaks the NDJSON session protocol
    #[serde(default = "default_server_script")]
    pub server_script: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            server_script: default_server_script(),
        }
    }
}

// Serde default helpers
fn default_provider() -> String { "ollama".to_string() }
fn default_temperature() -> f32 { DEFAULT_TEMPERATURE }
fn default_api_key_env() -> String { "OPENAI_API_KEY".to_string() }
fn default_strategy_timeout() -> u64 { DEFAULT_STRATEGY_WAIT_MS }
fn default_trace_path() -> String { "synth_trace.jsonl".to_string() }
fn default_true() -> bool { true }
fn default_server_script() -> String { "node/browser_server.js".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("screen-synth.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => parse_config(&content),
        Err(_) => AppConfig::default(),
    }
}

/// Parse YAML config text, falling back to defaults when it is malformed.
pub fn parse_config(content: &str) -> AppConfig {
    match serde_yaml::from_str(content) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "malformed config, using defaults");
            AppConfig::default()
        }
    }
}

// ============================================================================
// CLI overrides (CLI > config > defaults)
// ============================================================================

impl AppConfig {
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(provider) = &cli.provider {
            self.generator.provider = provider.clone();
        }
        if let Some(endpoint) = &cli.endpoint {
            self.generator.endpoint = Some(endpoint.clone());
        }
        if let Some(model) = &cli.model {
            self.generator.model = Some(model.clone());
        }
        if let Commands::Batch { continue_on_error: true, .. } = cli.command {
            self.batch.continue_on_error = true;
        }
    }
}
