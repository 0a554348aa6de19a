mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use mixo_core::config::Config;
use mixo_core::orchestrator::display_message;
use mixo_core::vault::EnvVaultProvider;
use mixo_core::{ConversionService, Orchestrator, Progress};
use mixo_gateway::GatewayServer;
use tokio::sync::{mpsc, watch};

#[derive(Parser)]
#[command(name = "mixo")]
#[command(version)]
#[command(about = "Convert recipes from any web page into Thermomix TM6 instructions", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the conversion endpoint
    Serve,
    /// Convert a recipe through a running endpoint and print it
    Convert {
        /// Recipe page URL
        url: String,
        /// Conversion endpoint (defaults to `client.endpoint` from the config)
        #[arg(long)]
        endpoint: Option<String>,
        /// Scale ingredient amounts to this many servings
        #[arg(long)]
        servings: Option<i64>,
        /// Print the recipe as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_subscriber();

    let config_path = resolve_config_path(cli.config.as_deref());
    let mut config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    match cli.command {
        Commands::Serve => {
            config.resolve_secrets(&EnvVaultProvider).await?;
            serve(config).await
        }
        Commands::Convert {
            url,
            endpoint,
            servings,
            json,
        } => {
            let endpoint = endpoint.unwrap_or_else(|| config.client.endpoint.clone());
            convert(&endpoint, &url, servings, json).await
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    if config.secrets.gemini_api_key.is_some() {
        tracing::info!(model = %config.llm.gemini_model, "using Gemini (free tier)");
    } else if config.secrets.anthropic_api_key.is_some() {
        tracing::info!(model = %config.llm.claude_model, "using Claude");
    } else {
        tracing::warn!(
            "no API key configured, conversions will fail until GEMINI_API_KEY or \
             ANTHROPIC_API_KEY is set"
        );
    }

    let gateway = config.gateway.clone();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {e:#}");
            return;
        }
        tracing::info!("received shutdown signal");
        let _ = shutdown_tx.send(true);
    });

    GatewayServer::new(
        &gateway.bind,
        gateway.port,
        ConversionService::new(config),
        shutdown_rx,
    )
    .with_rate_limit(gateway.rate_limit)
    .with_max_body_size(gateway.max_body_size)
    .serve()
    .await?;

    Ok(())
}

async fn convert(
    endpoint: &str,
    url: &str,
    servings: Option<i64>,
    json: bool,
) -> anyhow::Result<()> {
    let (progress_tx, mut progress_rx) = mpsc::unbounded_channel::<Progress>();
    let printer = tokio::spawn(async move {
        while let Some(p) = progress_rx.recv().await {
            eprintln!("[{:>3}%] {}", p.percent, p.message);
        }
    });

    let result = Orchestrator::new(endpoint)
        .with_progress(progress_tx)
        .submit(url)
        .await;
    let _ = printer.await;

    let mut conversion = match result {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!("conversion failed: {e}");
            bail!("{}", display_message(&e));
        }
    };

    if let Some(n) = servings {
        conversion.scale.set(n);
    }

    if json {
        println!(
            "{}",
            render::recipe_json(&conversion.recipe, &conversion.scale)?
        );
    } else {
        print!(
            "{}",
            render::render_recipe(&conversion.recipe, &conversion.scale)
        );
    }
    Ok(())
}

fn resolve_config_path(cli_path: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_path {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var("MIXO_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from("config/default.toml")
}

fn init_subscriber() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_convert_arguments() {
        let cli = Cli::try_parse_from([
            "mixo",
            "--config",
            "custom.toml",
            "convert",
            "https://example.com/r",
            "--servings",
            "6",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some(Path::new("custom.toml")));
        match cli.command {
            Commands::Convert {
                url,
                endpoint,
                servings,
                json,
            } => {
                assert_eq!(url, "https://example.com/r");
                assert!(endpoint.is_none());
                assert_eq!(servings, Some(6));
                assert!(json);
            }
            Commands::Serve => panic!("expected convert"),
        }
    }

    #[test]
    fn cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["mixo"]).is_err());
    }

    #[test]
    fn explicit_config_path_wins() {
        assert_eq!(
            resolve_config_path(Some(Path::new("a.toml"))),
            PathBuf::from("a.toml")
        );
    }
}
