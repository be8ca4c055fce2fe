//! CLI argument definitions.

use clap::Parser;

/// Delete every item from a DynamoDB table.
#[derive(Debug, Parser)]
#[command(name = "tablewipe")]
#[command(version, about = "Delete every item from a DynamoDB table", long_about = "\
Delete every item from a DynamoDB table.

Scans the table page by page, fetching only the key attributes, and deletes
each page with BatchWriteItem (25 keys per request). Runs with no arguments
against the HospitableData table in us-east-1 using the hospitable-deployer
profile. Deletion is irreversible; use --dry-run to count items first.

Before deleting, the table's key schema is checked with DescribeTable, which
needs the dynamodb:DescribeTable permission; --skip-preflight disables it.
Keys a batch leaves unprocessed are resubmitted after a delay that doubles
each round, from --backoff-ms up to --max-backoff-ms.

Environment variables:
  AWS_ENDPOINT_URL    - Use local DynamoDB (e.g., http://localhost:8000)
  AWS_REGION          - AWS region (defaults to us-east-1)
  AWS_PROFILE         - AWS profile to use for credentials
  RUST_LOG            - Log filter for diagnostics on stderr")]
pub struct Cli {
    #[command(flatten)]
    pub global: Global,

    /// Table to empty.
    #[arg(long, env = "TABLEWIPE_TABLE", default_value = "HospitableData")]
    pub table: String,

    /// AWS region.
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    pub region: String,

    /// AWS credential profile.
    #[arg(long, env = "AWS_PROFILE", default_value = "hospitable-deployer")]
    pub profile: String,

    /// Custom DynamoDB endpoint (local DynamoDB).
    #[arg(long, env = "AWS_ENDPOINT_URL", value_name = "URL")]
    pub endpoint_url: Option<String>,

    /// Partition key attribute name.
    #[arg(long, env = "TABLEWIPE_PARTITION_KEY", default_value = "pk")]
    pub partition_key: String,

    /// Sort key attribute name.
    #[arg(long, env = "TABLEWIPE_SORT_KEY", default_value = "sk", conflicts_with = "no_sort_key")]
    pub sort_key: String,

    /// The table has no sort key.
    #[arg(long)]
    pub no_sort_key: bool,

    /// Only delete items whose partition key equals this string value.
    #[arg(long, value_name = "VALUE")]
    pub partition: Option<String>,

    /// Count the items that would be deleted without deleting them.
    #[arg(long)]
    pub dry_run: bool,

    /// Maximum items evaluated per scan request.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..=i32::MAX as i64))]
    pub page_size: Option<u32>,

    /// BatchWriteItem rounds per batch before unprocessed keys are an error.
    #[arg(long, value_name = "N", default_value = "10", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_unprocessed_rounds: u32,

    /// Wait before the first resubmission of unprocessed keys, in milliseconds.
    #[arg(long, value_name = "MS", default_value = "100")]
    pub backoff_ms: u64,

    /// Longest wait between resubmissions, in milliseconds.
    #[arg(long, value_name = "MS", default_value = "5000")]
    pub max_backoff_ms: u64,

    /// Skip the DescribeTable check of the key schema.
    #[arg(long)]
    pub skip_preflight: bool,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Silence the command output
    #[clap(long, global = true)]
    pub silent: bool,

    /// Enable verbose output
    #[clap(long, global = true)]
    pub verbose: bool,
}

impl Global {
    pub fn is_silent(&self) -> bool {
        self.silent
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}
