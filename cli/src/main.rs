//! edgepress CLI
//!
//! Command-line interface for provisioning and updating static websites on
//! a Fastly-style edge platform.
//!
//! # Usage
//!
//! ```bash
//! edgepress create --domain example.com --domain www.example.com \
//!     --name "example site" --directory ./website
//! edgepress deploy --directory ./website --service SU1Z0isx --snippet 62Yd1WfiCBPENLkXukhB
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use edgepress_core::client::DEFAULT_BASE_URL;
use edgepress_core::ApiClient;

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "edgepress")]
#[command(version)]
#[command(about = "Static website provisioning for edge platforms", long_about = None)]
struct Cli {
    /// API endpoint URL
    #[arg(long, env = "EDGEPRESS_API_URL")]
    api_url: Option<String>,

    /// API key for authentication
    #[arg(long, env = "EDGEPRESS_API_KEY")]
    api_key: Option<String>,

    /// Output format
    #[arg(long, short)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Flag (or env var) wins, then the profile config, then the built-in default.
fn resolve_api_url(flag: Option<String>, configured: Option<&str>) -> String {
    flag.or_else(|| configured.map(str::to_owned))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned())
}

/// Same precedence as [`resolve_api_url`]; an unrecognized value in the
/// config file falls through to text output.
fn resolve_format(
    flag: Option<output::OutputFormat>,
    configured: Option<&str>,
) -> output::OutputFormat {
    flag.or_else(|| configured.and_then(|s| output::OutputFormat::from_str(s, true).ok()))
        .unwrap_or(output::OutputFormat::Text)
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new static website service
    Create(commands::create::CreateArgs),
    /// Deploy new content to an existing service
    Deploy(commands::deploy::DeployArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    tracing::info!("edgepress v{}", env!("CARGO_PKG_VERSION"));

    let config = config::Config::load(cli.profile.as_deref()).unwrap_or_default();
    let api_url = resolve_api_url(cli.api_url, config.api_url.as_deref());
    let format = resolve_format(cli.format, config.default_format.as_deref());
    let api_key = match cli.api_key.or(config.api_key) {
        Some(key) => key,
        None => {
            eprintln!(
                "Error: an API key is required. Pass --api-key, set EDGEPRESS_API_KEY, or add one to the profile config."
            );
            std::process::exit(1);
        }
    };

    let client = match ApiClient::new(&api_url, &api_key) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Create(args) => commands::create::handle(args, client, format).await,
        Commands::Deploy(args) => commands::deploy::handle(args, client, format).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if let Some(detail) = e.remote_detail() {
            eprintln!("{}", detail);
        }
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_accepts_repeated_domains() {
        let cli = Cli::parse_from([
            "edgepress",
            "--api-key",
            "key",
            "create",
            "--domain",
            "example.com",
            "--domain",
            "www.example.com",
            "--name",
            "example site",
            "--directory",
            "./website",
        ]);
        match cli.command {
            Commands::Create(args) => {
                assert_eq!(args.domain, vec!["example.com", "www.example.com"]);
                assert!(!args.access_control);
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn deploy_requires_service_and_snippet() {
        let cli = Cli::parse_from([
            "edgepress",
            "deploy",
            "--directory",
            "./website",
            "--service",
            "SU1Z0isx",
            "--snippet",
            "62Yd1WfiCBPENLkXukhB",
        ]);
        match cli.command {
            Commands::Deploy(args) => {
                assert_eq!(args.service, "SU1Z0isx");
                assert_eq!(args.snippet, "62Yd1WfiCBPENLkXukhB");
            }
            _ => panic!("expected deploy"),
        }
    }

    #[test]
    fn api_url_prefers_flag_then_config_then_default() {
        assert_eq!(
            resolve_api_url(Some("https://flag.test".into()), Some("https://conf.test")),
            "https://flag.test"
        );
        assert_eq!(
            resolve_api_url(None, Some("https://conf.test")),
            "https://conf.test"
        );
        assert_eq!(resolve_api_url(None, None), DEFAULT_BASE_URL);
    }

    #[test]
    fn format_falls_back_to_configured_default() {
        assert!(matches!(
            resolve_format(Some(output::OutputFormat::Yaml), Some("json")),
            output::OutputFormat::Yaml
        ));
        assert!(matches!(
            resolve_format(None, Some("json")),
            output::OutputFormat::Json
        ));
        assert!(matches!(
            resolve_format(None, Some("bogus")),
            output::OutputFormat::Text
        ));
        assert!(matches!(resolve_format(None, None), output::OutputFormat::Text));
    }
}
