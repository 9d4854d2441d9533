//! Deploy command - replace an existing service's content in place

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use edgepress_core::{pipeline, ApiClient, Result, Settings};

use crate::output::OutputFormat;

/// Arguments for the deploy command.
#[derive(Debug, Args)]
pub struct DeployArgs {
    /// Directory containing the website content
    #[arg(long)]
    pub directory: PathBuf,

    /// Service ID of the existing website
    #[arg(long)]
    pub service: String,

    /// Snippet ID of the website's dynamic content snippet
    #[arg(long)]
    pub snippet: String,
}

#[derive(Serialize)]
struct DeployReport {
    service_id: String,
    snippet_id: String,
}

/// Execute the deploy command: recompile the directory and replace the
/// dynamic content snippet. No new service version is created.
pub async fn handle(args: DeployArgs, client: ApiClient, format: OutputFormat) -> Result<()> {
    pipeline::update(
        &client,
        &args.service,
        &args.snippet,
        &args.directory,
        &Settings::default(),
    )
    .await?;

    let report = DeployReport {
        service_id: args.service,
        snippet_id: args.snippet,
    };

    match format {
        OutputFormat::Text => {
            println!("Website content updated.");
            println!(
                "To update again: edgepress deploy --service {} --snippet {} --directory <dir>",
                report.service_id, report.snippet_id
            );
        }
        _ => format.print(&report),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: DeployArgs,
    }

    #[test]
    fn all_flags_parse() {
        let cli = TestCli::parse_from([
            "test",
            "--directory",
            "./www",
            "--service",
            "abc",
            "--snippet",
            "def",
        ]);
        assert_eq!(cli.args.directory, PathBuf::from("./www"));
        assert_eq!(cli.args.service, "abc");
        assert_eq!(cli.args.snippet, "def");
    }

    #[test]
    fn snippet_is_required() {
        let parsed =
            TestCli::try_parse_from(["test", "--directory", "./www", "--service", "abc"]);
        assert!(parsed.is_err());
    }
}
