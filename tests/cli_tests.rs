use clap::Parser;
use screen_synth::cli::commands::{GenerateArgs, build_generator, single_request, trace_path};
use screen_synth::cli::config::{
    AppConfig, Cli, Commands, GeneratorConfig, TraceConfig, load_config, parse_config,
};
use screen_synth::error::SynthError;
use screen_synth::locator::strategy::CueKind;
use screen_synth::synth::artifact::ArtifactKind;

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_analyze() {
    let cli = Cli::parse_from(["screen-synth", "analyze", "--url", "https://example.com/login"]);
    match cli.command {
        Commands::Analyze { url } => assert_eq!(url, "https://example.com/login"),
        _ => panic!("Expected Analyze command"),
    }
    assert_eq!(cli.verbose, 0);
    assert!(cli.provider.is_none());
}

#[test]
fn cli_parse_batch_with_continue() {
    let cli = Cli::parse_from([
        "screen-synth",
        "batch",
        "https://a.test",
        "https://b.test",
        "--continue-on-error",
    ]);
    match cli.command {
        Commands::Batch {
            urls,
            continue_on_error,
        } => {
            assert_eq!(urls, vec!["https://a.test", "https://b.test"]);
            assert!(continue_on_error);
        }
        _ => panic!("Expected Batch command"),
    }
}

#[test]
fn cli_batch_requires_urls() {
    assert!(Cli::try_parse_from(["screen-synth", "batch"]).is_err());
}

#[test]
fn cli_parse_generate_all_args() {
    let cli = Cli::parse_from([
        "screen-synth",
        "generate",
        "page",
        "--feature",
        "LoginPage",
        "--url",
        "https://x/login",
        "--elements",
        "btnLogin,inputEmail",
        "--actions",
        "navigate,clickLogin",
        "--scenarios",
        "Valid login",
        "-o",
        "out/LoginPage.js",
    ]);
    match cli.command {
        Commands::Generate {
            kind,
            feature,
            url,
            elements,
            actions,
            scenarios,
            output,
        } => {
            assert_eq!(kind, "page");
            assert_eq!(feature, "LoginPage");
            assert_eq!(url.as_deref(), Some("https://x/login"));
            assert_eq!(elements.as_deref(), Some("btnLogin,inputEmail"));
            assert_eq!(actions.as_deref(), Some("navigate,clickLogin"));
            assert_eq!(scenarios.as_deref(), Some("Valid login"));
            assert_eq!(output.as_deref(), Some("out/LoginPage.js"));
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn cli_parse_locate_kind() {
    let cli = Cli::parse_from([
        "screen-synth",
        "locate",
        "--url",
        "https://x",
        "--cue",
        "Country",
        "--kind",
        "dropdown",
    ]);
    match cli.command {
        Commands::Locate { cue, kind, .. } => {
            assert_eq!(cue, "Country");
            assert_eq!(kind, CueKind::Dropdown);
        }
        _ => panic!("Expected Locate command"),
    }

    let default_kind = Cli::parse_from(["screen-synth", "locate", "--url", "https://x", "--cue", "Go"]);
    assert!(matches!(
        default_kind.command,
        Commands::Locate {
            kind: CueKind::Generic,
            ..
        }
    ));
}

#[test]
fn cli_global_flags() {
    let cli = Cli::parse_from([
        "screen-synth",
        "-vv",
        "analyze",
        "--url",
        "https://x",
        "--provider",
        "mock",
        "--model",
        "llama3",
        "--endpoint",
        "http://gpu:11434/api/generate",
        "--output-root",
        "/tmp/out",
        "--config",
        "custom.yaml",
    ]);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.provider.as_deref(), Some("mock"));
    assert_eq!(cli.model.as_deref(), Some("llama3"));
    assert_eq!(cli.endpoint.as_deref(), Some("http://gpu:11434/api/generate"));
    assert_eq!(cli.output_root.as_deref(), Some("/tmp/out"));
    assert_eq!(cli.config.as_deref(), Some("custom.yaml"));
}

// ============================================================================
// Config File Tests
// ============================================================================

#[test]
fn config_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.generator.provider, "ollama");
    assert_eq!(config.generator.temperature, 0.1);
    assert_eq!(config.generator.api_key_env, "OPENAI_API_KEY");
    assert_eq!(config.registry.dir, "pageObjects");
    assert_eq!(config.resolver.strategy_timeout_ms, 2000);
    assert!(!config.batch.continue_on_error);
    assert_eq!(config.trace.path, "synth_trace.jsonl");
    assert!(config.trace.enabled);
    assert_eq!(config.layout.test.suffix, ".spec.js");
}

#[test]
fn config_missing_file_uses_defaults() {
    let config = load_config(Some("/nonexistent/screen-synth.yaml"));
    assert_eq!(config.generator.provider, "ollama");
}

#[test]
fn config_partial_yaml() {
    let config = parse_config(
        r#"
generator:
  provider: openai
  model: gpt-4o
resolver:
  strategy_timeout_ms: 500
batch:
  continue_on_error: true
"#,
    );
    assert_eq!(config.generator.provider, "openai");
    assert_eq!(config.generator.model.as_deref(), Some("gpt-4o"));
    assert_eq!(config.generator.temperature, 0.1);
    assert_eq!(config.resolver.strategy_timeout_ms, 500);
    assert!(config.batch.continue_on_error);
    assert_eq!(config.registry.exclude, vec!["Task"]);
}

#[test]
fn config_custom_layout() {
    let config = parse_config(
        r#"
layout:
  page_object: { dir: po, suffix: .ts }
  test: { dir: e2e, suffix: .test.ts, lowercase: true }
  feature: { dir: features, suffix: .feature, lowercase: true }
  steps: { dir: features/steps, suffix: .steps.ts, lowercase: true }
"#,
    );
    assert_eq!(
        config.layout.path_for(ArtifactKind::PageObject, "LoginPage").display().to_string(),
        "po/LoginPage.ts"
    );
    assert_eq!(
        config.layout.path_for(ArtifactKind::Steps, "LoginPage").display().to_string(),
        "features/steps/loginpage.steps.ts"
    );
}

#[test]
fn config_malformed_yaml_uses_defaults() {
    let config = parse_config("generator: [not, a, map");
    assert_eq!(config.generator.provider, "ollama");
}

#[test]
fn config_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("screen-synth.yaml");
    std::fs::write(&path, "trace:\n  enabled: false\n").unwrap();

    let config = load_config(path.to_str());
    assert!(!config.trace.enabled);
    assert_eq!(config.trace.path, "synth_trace.jsonl");
}

#[test]
fn cli_overrides_config() {
    let cli = Cli::parse_from([
        "screen-synth",
        "batch",
        "https://a.test",
        "--continue-on-error",
        "--provider",
        "mock",
        "--endpoint",
        "http://local/api",
    ]);
    let mut config = parse_config("generator:\n  provider: openai\n  model: gpt-4\n");
    config.apply_cli(&cli);

    assert_eq!(config.generator.provider, "mock");
    assert_eq!(config.generator.endpoint.as_deref(), Some("http://local/api"));
    assert_eq!(config.generator.model.as_deref(), Some("gpt-4"));
    assert!(config.batch.continue_on_error);
}

// ============================================================================
// Command helpers
// ============================================================================

#[test]
fn build_generator_by_provider() {
    let mut config = GeneratorConfig::default();
    assert!(build_generator(&config).is_ok());

    config.provider = "mock".into();
    assert!(build_generator(&config).is_ok());

    config.provider = "openai".into();
    config.api_key_env = "SCREEN_SYNTH_TEST_KEY_THAT_IS_NOT_SET".into();
    assert!(matches!(build_generator(&config), Err(SynthError::Config(_))));

    config.provider = "gemini".into();
    assert!(matches!(build_generator(&config), Err(SynthError::Config(m)) if m.contains("gemini")));
}

fn generate_args<'a>(kind: &'a str) -> GenerateArgs<'a> {
    GenerateArgs {
        kind,
        feature: "Login",
        url: Some("https://x/login"),
        elements: Some("btnLogin"),
        actions: None,
        scenarios: None,
        output: None,
    }
}

#[test]
fn single_request_routes_feature_by_kind() {
    let page = single_request(ArtifactKind::PageObject, &generate_args("page"));
    assert_eq!(page.class_name.as_deref(), Some("Login"));
    assert_eq!(page.elements.as_deref(), Some("btnLogin"));
    assert!(page.feature.is_none());

    let test = single_request(ArtifactKind::Test, &generate_args("test"));
    assert_eq!(test.feature_description.as_deref(), Some("Login"));

    let feature = single_request(ArtifactKind::Feature, &generate_args("feature"));
    assert_eq!(feature.feature.as_deref(), Some("Login"));
    assert_eq!(
        feature.user_story.as_deref(),
        Some("As a user, I want to interact with Login")
    );
}

#[test]
fn trace_file_follows_output_root() {
    let trace = AppConfig::default().trace;
    assert_eq!(
        trace_path(&trace, "/tmp/out"),
        std::path::PathBuf::from("/tmp/out/synth_trace.jsonl")
    );
    assert_eq!(trace_path(&trace, "."), std::path::PathBuf::from("./synth_trace.jsonl"));

    let absolute = TraceConfig {
        path: "/var/log/synth.jsonl".into(),
        enabled: true,
    };
    assert_eq!(
        trace_path(&absolute, "/tmp/out"),
        std::path::PathBuf::from("/var/log/synth.jsonl")
    );
}
