use clap::Parser;
use screen_synth::cli::commands::{GenerateArgs, cmd_analyze, cmd_batch, cmd_generate, cmd_locate};
use screen_synth::cli::config::{Cli, Commands, load_config};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise -v picks the level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Resolve settings: CLI > config > defaults
    let mut config = load_config(cli.config.as_deref());
    config.apply_cli(&cli);
    let output_root = cli.output_root.as_deref().unwrap_or(".");

    match &cli.command {
        Commands::Analyze { url } => {
            cmd_analyze(&config, output_root, url).await?;
        }
        Commands::Batch { urls, .. } => {
            cmd_batch(&config, output_root, urls).await?;
        }
        Commands::Generate {
            kind,
            feature,
            url,
            elements,
            actions,
            scenarios,
            output,
        } => {
            let args = GenerateArgs {
                kind,
                feature,
                url: url.as_deref(),
                elements: elements.as_deref(),
                actions: actions.as_deref(),
                scenarios: scenarios.as_deref(),
                output: output.as_deref(),
            };
            cmd_generate(&config, args).await?;
        }
        Commands::Locate { url, cue, kind } => {
            cmd_locate(&config, url, cue, *kind)?;
        }
    }

    Ok(())
}
