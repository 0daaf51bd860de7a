//! stackdiag - CloudFormation rollback diagnostics CLI
//!
//! `stackdiag <stack_name>` prints one JSON document on stdout explaining why
//! the stack rolled back, following the failed resource into its nested
//! stack when it is one.
//!
//! ## Exit codes
//!
//! - `0`: report printed (including "stack is healthy")
//! - `1`: usage error, or the stack status could not be read

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use stack_state::{ClientConfig, CloudFormationClient, StackStateClient};
use stackdiag_core::{
    diagnose, DiagnoseOptions, DiagnosisError, ErrorReport, NestedIdentity, MAX_NESTED_DEPTH,
};
use tracing::{debug, error, Level};

const USAGE: &str = "Usage: stackdiag [OPTIONS] <stack_name>";

const EXIT_OK: u8 = 0;
const EXIT_FAILURE: u8 = 1;

#[derive(Parser, Debug)]
#[command(name = "stackdiag")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Explain why a CloudFormation stack rolled back", long_about = None)]
struct Cli {
    /// Name or ARN of the stack to diagnose
    stack_name: String,

    /// AWS region (default: STACKDIAG_REGION, then the SDK's own resolution)
    #[arg(long)]
    region: Option<String>,

    /// Named AWS profile (default: STACKDIAG_PROFILE)
    #[arg(long)]
    profile: Option<String>,

    /// CloudFormation endpoint override (default: STACKDIAG_ENDPOINT_URL)
    #[arg(long)]
    endpoint_url: Option<String>,

    /// Nested stack levels to follow
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=MAX_NESTED_DEPTH as i64))]
    nested_depth: u8,

    /// Query nested stacks by physical id (stack ARN) instead of logical id
    #[arg(long)]
    nested_by_physical_id: bool,

    /// Enable verbose logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines on stderr
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        if let Some(region) = &self.region {
            config = config.with_region(region);
        }
        if let Some(profile) = &self.profile {
            config = config.with_profile(profile);
        }
        if let Some(endpoint_url) = &self.endpoint_url {
            config = config.with_endpoint_url(endpoint_url);
        }
        config
    }

    fn diagnose_options(&self) -> DiagnoseOptions {
        DiagnoseOptions {
            nested_depth: usize::from(self.nested_depth),
            nested_identity: if self.nested_by_physical_id {
                NestedIdentity::PhysicalId
            } else {
                NestedIdentity::LogicalId
            },
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return ExitCode::from(cmd_usage_error(&err)),
    };

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    stackdiag_core::init_tracing(cli.log_json, level);
    debug!("stackdiag v{} starting", stackdiag_core::VERSION);

    match run(&cli).await {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

async fn run(cli: &Cli) -> Result<u8> {
    let client = CloudFormationClient::from_config(&cli.client_config()).await;
    let (output, code) = cmd_diagnose(&client, &cli.stack_name, &cli.diagnose_options()).await?;
    println!("{output}");
    Ok(code)
}

/// Report a malformed invocation; `--help` and `--version` exit through clap.
fn cmd_usage_error(err: &clap::Error) -> u8 {
    if matches!(
        err.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    ) {
        err.exit();
    }
    eprintln!("{}", err.render());
    println!("{}", usage_report());
    EXIT_FAILURE
}

fn usage_report() -> String {
    // a struct of two strings always serializes
    ErrorReport::new(USAGE).render().unwrap_or_default()
}

/// Diagnose `stack_name` and render the stdout document with its exit code.
async fn cmd_diagnose(
    client: &dyn StackStateClient,
    stack_name: &str,
    options: &DiagnoseOptions,
) -> Result<(String, u8)> {
    match diagnose(client, stack_name, options).await {
        Ok(report) => {
            let output = report
                .render_pretty()
                .context("Failed to render diagnosis report")?;
            Ok((output, EXIT_OK))
        }
        Err(DiagnosisError::Usage(reason)) => {
            debug!(%reason, "Rejected stack name");
            Ok((usage_report(), EXIT_FAILURE))
        }
        Err(err) => {
            let output = err
                .to_error_report()
                .render()
                .context("Failed to render error report")?;
            Ok((output, EXIT_FAILURE))
        }
    }
}
