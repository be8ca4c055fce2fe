//! Run configuration assembled from the command line.

use std::time::Duration;

use tablewipe_core::{KeySchema, KeyValue, PurgeOptions, PurgeScope};
use thiserror::Error;

use crate::cli::Cli;

/// Errors in the assembled configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Table name must not be empty")]
    EmptyTableName,
    #[error("Key attribute name must not be empty: {0}")]
    EmptyKeyName(&'static str),
    #[error("Partition value must not be empty")]
    EmptyPartitionValue,
    #[error("Maximum backoff ({max_ms} ms) is shorter than the initial backoff ({initial_ms} ms)")]
    BackoffRange { initial_ms: u64, max_ms: u64 },
}

/// Where and how to connect to DynamoDB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsSettings {
    pub region: String,
    pub profile: String,
    /// Custom endpoint URL (for local DynamoDB).
    pub endpoint_url: Option<String>,
}

impl AwsSettings {
    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Local DynamoDB ({})", url),
            None => format!(
                "AWS DynamoDB (region: {}, profile: {})",
                self.region, self.profile
            ),
        }
    }
}

/// Everything a purge run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub aws: AwsSettings,
    pub table_name: String,
    pub schema: KeySchema,
    pub purge: PurgeOptions,
    pub preflight: bool,
}

impl Config {
    /// Validates the parsed arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let table_name = cli.table.trim();
        if table_name.is_empty() {
            return Err(ConfigError::EmptyTableName);
        }

        let partition_key = cli.partition_key.trim();
        if partition_key.is_empty() {
            return Err(ConfigError::EmptyKeyName("partition key"));
        }

        let schema = if cli.no_sort_key {
            KeySchema::partition_only(partition_key)
        } else {
            let sort_key = cli.sort_key.trim();
            if sort_key.is_empty() {
                return Err(ConfigError::EmptyKeyName("sort key"));
            }
            KeySchema::new(partition_key, sort_key)
        };

        let scope = match cli.partition.as_deref() {
            None => PurgeScope::Table,
            Some("") => return Err(ConfigError::EmptyPartitionValue),
            Some(value) => PurgeScope::Partition(KeyValue::s(value)),
        };

        if cli.max_backoff_ms < cli.backoff_ms {
            return Err(ConfigError::BackoffRange {
                initial_ms: cli.backoff_ms,
                max_ms: cli.max_backoff_ms,
            });
        }

        Ok(Self {
            aws: AwsSettings {
                region: cli.region.clone(),
                profile: cli.profile.clone(),
                endpoint_url: cli.endpoint_url.clone().filter(|url| !url.is_empty()),
            },
            table_name: table_name.to_string(),
            schema,
            purge: PurgeOptions {
                scope,
                dry_run: cli.dry_run,
                page_limit: cli.page_size,
                max_unprocessed_rounds: cli.max_unprocessed_rounds,
                initial_backoff: Duration::from_millis(cli.backoff_ms),
                max_backoff: Duration::from_millis(cli.max_backoff_ms),
            },
            preflight: !cli.skip_preflight,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["tablewipe", "--region", "us-east-1", "--profile", "test"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_explicit_flags() {
        let cli = parse(&[
            "--table",
            "Other",
            "--partition-key",
            "PK",
            "--sort-key",
            "SK",
            "--partition",
            "RES#UNKNOWN",
            "--dry-run",
            "--page-size",
            "50",
        ]);

        let config = Config::from_cli(&cli).unwrap();

        assert_eq!(config.table_name, "Other");
        assert_eq!(config.schema, KeySchema::new("PK", "SK"));
        assert_eq!(
            config.purge.scope,
            PurgeScope::Partition(KeyValue::s("RES#UNKNOWN"))
        );
        assert!(config.purge.dry_run);
        assert_eq!(config.purge.page_limit, Some(50));
        assert!(config.preflight);
    }

    #[test]
    fn test_resubmission_defaults_match_purge_defaults() {
        let cli = parse(&["--table", "T"]);

        let config = Config::from_cli(&cli).unwrap();
        let defaults = PurgeOptions::default();

        assert_eq!(
            config.purge.max_unprocessed_rounds,
            defaults.max_unprocessed_rounds
        );
        assert_eq!(config.purge.initial_backoff, defaults.initial_backoff);
        assert_eq!(config.purge.max_backoff, defaults.max_backoff);
    }

    #[test]
    fn test_backoff_flags() {
        let cli = parse(&["--table", "T", "--backoff-ms", "50", "--max-backoff-ms", "2000"]);

        let config = Config::from_cli(&cli).unwrap();

        assert_eq!(config.purge.initial_backoff, Duration::from_millis(50));
        assert_eq!(config.purge.max_backoff, Duration::from_millis(2000));
    }

    #[test]
    fn test_inverted_backoff_range_is_rejected() {
        let cli = parse(&["--table", "T", "--backoff-ms", "500", "--max-backoff-ms", "100"]);

        assert_eq!(
            Config::from_cli(&cli),
            Err(ConfigError::BackoffRange {
                initial_ms: 500,
                max_ms: 100
            })
        );
    }

    #[test]
    fn test_no_sort_key() {
        let cli = parse(&["--table", "T", "--partition-key", "id", "--no-sort-key"]);

        let config = Config::from_cli(&cli).unwrap();

        assert_eq!(config.schema, KeySchema::partition_only("id"));
    }

    #[test]
    fn test_empty_table_name_is_rejected() {
        let cli = parse(&["--table", "  "]);
        assert_eq!(Config::from_cli(&cli), Err(ConfigError::EmptyTableName));
    }

    #[test]
    fn test_empty_partition_value_is_rejected() {
        let cli = parse(&["--table", "T", "--partition", ""]);
        assert_eq!(
            Config::from_cli(&cli),
            Err(ConfigError::EmptyPartitionValue)
        );
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let result = Cli::try_parse_from(["tablewipe", "--page-size", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_target_display() {
        let mut aws = AwsSettings {
            region: "us-east-1".to_string(),
            profile: "hospitable-deployer".to_string(),
            endpoint_url: None,
        };
        assert_eq!(
            aws.target_display(),
            "AWS DynamoDB (region: us-east-1, profile: hospitable-deployer)"
        );

        aws.endpoint_url = Some("http://localhost:8000".to_string());
        assert_eq!(aws.target_display(), "Local DynamoDB (http://localhost:8000)");
    }
}
