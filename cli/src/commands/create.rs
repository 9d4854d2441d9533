//! Create command - provision a new static website service

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use edgepress_core::{ApiClient, Pipeline, ProvisionPlan, Result, Settings};

use crate::output::OutputFormat;

/// Arguments for the create command.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Domain name(s) of the new website; repeat the flag to register more
    /// than one
    #[arg(long, required = true)]
    pub domain: Vec<String>,

    /// Name of the service being created, as searchable in the platform
    /// console
    #[arg(long)]
    pub name: String,

    /// Directory containing the website content
    #[arg(long)]
    pub directory: PathBuf,

    /// Put the website behind the access-control gate
    #[arg(long)]
    pub access_control: bool,
}

#[derive(Serialize)]
struct CreateReport {
    service_id: String,
    version: u64,
    snippet_id: String,
    domains: Vec<String>,
    manage_url: String,
}

/// Execute the create command: run the full provisioning pipeline and
/// print the identifiers the operator must record for later deploys.
pub async fn handle(args: CreateArgs, client: ApiClient, format: OutputFormat) -> Result<()> {
    let plan = ProvisionPlan {
        name: args.name,
        domains: args.domain,
        access_control: args.access_control,
        directory: args.directory,
    };

    let pipeline = Pipeline::new(client, Settings::default());
    let record = pipeline.execute(&plan).await?;

    let report = CreateReport {
        manage_url: format!(
            "https://manage.fastly.com/configure/services/{}",
            record.service_id
        ),
        service_id: record.service_id,
        version: record.version,
        snippet_id: record.content_snippet_id,
        domains: record.domains,
    };

    match format {
        OutputFormat::Text => {
            println!("Service created and activated.");
            println!();
            println!("  Service ID:  {}", report.service_id);
            println!("  Version:     {}", report.version);
            println!("  Snippet ID:  {}", report.snippet_id);
            println!("  Domains:     {}", report.domains.join(", "));
            println!("  Console:     {}", report.manage_url);
            println!();
            println!(
                "To update this site: edgepress deploy --service {} --snippet {} --directory <dir>",
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
        args: CreateArgs,
    }

    #[test]
    fn access_control_defaults_off() {
        let cli = TestCli::parse_from([
            "test",
            "--domain",
            "example.com",
            "--name",
            "site",
            "--directory",
            "./www",
        ]);
        assert!(!cli.args.access_control);
        assert_eq!(cli.args.directory, PathBuf::from("./www"));
    }

    #[test]
    fn domain_is_required() {
        let parsed = TestCli::try_parse_from(["test", "--name", "site", "--directory", "./www"]);
        assert!(parsed.is_err());
    }
}
