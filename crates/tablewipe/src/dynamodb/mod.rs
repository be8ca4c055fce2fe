//! DynamoDB purge command.

mod client;
mod conversions;
mod error;
mod store;

use error::Result;
use store::DynamoDbStore;

use tablewipe_core::report::{format_progress, format_scope, format_summary};
use tablewipe_core::{purge_table, PurgeSummary};

use crate::cli::Global;
use crate::config::Config;
use crate::prelude::*;

/// Empties the configured table.
pub async fn run(config: &Config, global: &Global) -> Result<PurgeSummary> {
    if !global.is_silent() {
        aprintln!("{} {}", p_b("Target:"), config.aws.target_display());
        aprintln!("{} {}", p_b("Table:"), config.table_name);
        aprintln!(
            "{} {}",
            p_b("Scope:"),
            format_scope(&config.purge.scope, &config.schema)
        );
        if config.purge.dry_run {
            aprintln!("{}", p_y("Dry run: nothing will be deleted."));
        }
        aprintln!();
    }

    let dynamo_client = client::create_client(&config.aws).await;

    if config.preflight {
        let actual = client::describe_key_schema(&dynamo_client, &config.table_name).await?;
        client::check_key_schema(&config.table_name, &config.schema, &actual)?;
        tracing::debug!(table = %config.table_name, keys = ?actual.attribute_names(), "key schema verified");
    }

    let store = DynamoDbStore::new(dynamo_client, &config.table_name, config.schema.clone());

    let summary = purge_table(&store, &config.purge, |progress| {
        if !global.is_silent() {
            aprintln!("{}", format_progress(progress));
        }
        tracing::debug!(
            page = progress.page,
            keys = progress.page_keys,
            deleted = progress.deleted,
            "page processed"
        );
    })
    .await
    .inspect_err(|err| tracing::error!(error = %err, table = %config.table_name, "purge failed"))?;

    if !global.is_silent() {
        let line = format_summary(&summary);
        if summary.dry_run {
            aprintln!("{}", p_y(&line));
        } else if summary.deleted > 0 {
            aprintln!("{}", p_r(&line));
        } else {
            aprintln!("{}", p_g(&line));
        }
    }

    Ok(summary)
}
