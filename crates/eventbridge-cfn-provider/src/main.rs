//! eventbridge-cfn-invoke: run one resource handler invocation locally
//!
//! Reads a handler request (and optionally the callback context from a
//! previous `IN_PROGRESS` event), runs it against EventBridge and prints the
//! progress event as JSON on stdout. Logs go to stderr.

use anyhow::Result;
use clap::Parser;
use eventbridge_cfn_common::{Action, ResourceKind};
use eventbridge_cfn_provider::aws::{AwsContext, EventsClient};
use eventbridge_cfn_provider::config::{AwsConfig, InputSource, InvokeConfig};
use eventbridge_cfn_provider::handlers;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "eventbridge-cfn-invoke")]
#[command(about = "Run one EventBridge CloudFormation handler invocation")]
#[command(version)]
struct Args {
    /// Resource type: rule, event-bus, connection, api-destination
    /// (or the full type name, e.g. AWS::Events::Rule)
    #[arg(short, long)]
    resource: ResourceKind,

    /// Lifecycle action: create, read, update, delete, list
    #[arg(short, long)]
    action: Action,

    /// Handler request JSON file ("-" for stdin)
    #[arg(long, default_value = "-")]
    request: String,

    /// Callback context JSON file from a previous IN_PROGRESS event
    #[arg(long)]
    context: Option<String>,

    /// AWS region (default: the request's region)
    #[arg(long)]
    region: Option<String>,

    /// AWS profile to use (overrides AWS_PROFILE env var)
    #[arg(long)]
    profile: Option<String>,
}

impl From<Args> for InvokeConfig {
    fn from(args: Args) -> Self {
        Self {
            resource: args.resource,
            action: args.action,
            request: InputSource::parse(&args.request),
            context: args.context.as_deref().map(InputSource::parse),
            aws: AwsConfig {
                region: args.region,
                profile: args.profile,
            },
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&e);
        std::process::exit(1);
    }
}

/// Print the error and its causes to stderr
fn print_error(e: &anyhow::Error) {
    use std::io::Write;

    let mut stderr = std::io::stderr();
    let _ = writeln!(stderr, "Error: {e}");
    let mut source = e.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "  Caused by: {cause}");
        source = cause.source();
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config: InvokeConfig = Args::parse().into();
    let (mut request, context) = config.load_documents()?;

    let region = config.region(&request);
    if let Some(profile) = &config.aws.profile {
        info!(profile = %profile, "Using AWS profile");
    }
    let aws = AwsContext::new(region.as_deref(), config.aws.profile.as_deref()).await;
    InvokeConfig::fill_region(&mut request, aws.region());
    let events = EventsClient::from_context(&aws);

    let event =
        handlers::dispatch(&events, config.resource, config.action, request, context).await?;
    println!("{}", serde_json::to_string_pretty(&event)?);
    Ok(())
}
