//! The scan-and-delete loop.
//!
//! Reads a page of keys, deletes every key in the page in batches, reports
//! progress, and follows the continuation cursor until the store reports no
//! further pages. Any store error ends the purge on the spot: no scan or
//! delete is issued after the failing call.

use std::time::Duration;

use crate::batch::{batch_count, delete_batches};
use crate::keys::ItemKey;
use crate::store::{PageRequest, PurgeScope, Result, StoreError, TableStore};

/// Default number of BatchWriteItem rounds per batch, the first included.
pub const DEFAULT_MAX_UNPROCESSED_ROUNDS: u32 = 10;

/// Default wait before the first resubmission of unprocessed keys.
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(100);

/// Default upper bound on the wait between resubmissions.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Options controlling a purge run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeOptions {
    pub scope: PurgeScope,
    /// Count keys without deleting them.
    pub dry_run: bool,
    /// Page limit passed to every scan; provider default when unset.
    pub page_limit: Option<u32>,
    /// Rounds of BatchWriteItem per batch before unprocessed keys are an error.
    pub max_unprocessed_rounds: u32,
    /// Wait before the first resubmission; doubles every round.
    pub initial_backoff: Duration,
    /// Cap on the wait between resubmissions.
    pub max_backoff: Duration,
}

impl Default for PurgeOptions {
    fn default() -> Self {
        Self {
            scope: PurgeScope::Table,
            dry_run: false,
            page_limit: None,
            max_unprocessed_rounds: DEFAULT_MAX_UNPROCESSED_ROUNDS,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }
}

/// Running state reported after each non-empty page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurgeProgress {
    /// 1-based index of the page just processed.
    pub page: usize,
    /// Keys in the page just processed.
    pub page_keys: usize,
    /// Keys deleted so far (or counted, in a dry run).
    pub deleted: u64,
    pub dry_run: bool,
}

/// Outcome of a completed purge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeSummary {
    pub deleted: u64,
    /// Non-empty pages processed.
    pub pages: usize,
    /// Delete batches sent, resubmissions excluded.
    pub batches: usize,
    pub dry_run: bool,
}

/// Removes every row in `options.scope` from the store.
///
/// `on_page` is called once per non-empty page, after all of its keys have
/// been deleted.
pub async fn purge_table<S, F>(
    store: &S,
    options: &PurgeOptions,
    mut on_page: F,
) -> Result<PurgeSummary>
where
    S: TableStore + ?Sized,
    F: FnMut(&PurgeProgress),
{
    let mut summary = PurgeSummary {
        dry_run: options.dry_run,
        ..PurgeSummary::default()
    };
    let mut request = PageRequest {
        scope: options.scope.clone(),
        start_after: None,
        limit: options.page_limit,
    };

    loop {
        let page = store.fetch_keys(&request).await?;

        if page.keys.is_empty() {
            tracing::debug!(pages = summary.pages, "scan returned an empty page");
            break;
        }

        summary.pages += 1;
        tracing::debug!(
            page = summary.pages,
            keys = page.keys.len(),
            batches = batch_count(page.keys.len()),
            more = !page.is_last(),
            "scanned page"
        );

        if !options.dry_run {
            for batch in delete_batches(&page.keys) {
                delete_batch_fully(store, batch, options).await?;
                summary.batches += 1;
            }
        }

        summary.deleted += page.keys.len() as u64;

        on_page(&PurgeProgress {
            page: summary.pages,
            page_keys: page.keys.len(),
            deleted: summary.deleted,
            dry_run: options.dry_run,
        });

        match page.cursor {
            Some(cursor) => request.start_after = Some(cursor),
            None => break,
        }
    }

    tracing::info!(
        deleted = summary.deleted,
        pages = summary.pages,
        batches = summary.batches,
        dry_run = summary.dry_run,
        "purge finished"
    );

    Ok(summary)
}

/// Wait before resubmission number `round` (1-based): exponential from
/// `initial`, capped at `max`.
pub fn backoff_delay(round: u32, initial: Duration, max: Duration) -> Duration {
    let factor = 2u32.saturating_pow(round.saturating_sub(1));
    initial.saturating_mul(factor).min(max)
}

/// Sends one batch, resubmitting unprocessed keys with exponential backoff
/// until none remain.
async fn delete_batch_fully<S>(store: &S, batch: &[ItemKey], options: &PurgeOptions) -> Result<()>
where
    S: TableStore + ?Sized,
{
    let max_rounds = options.max_unprocessed_rounds.max(1);
    let mut pending = store.delete_batch(batch).await?;
    let mut rounds = 1;

    while !pending.is_empty() {
        if rounds >= max_rounds {
            return Err(StoreError::Unprocessed {
                remaining: pending.len(),
                rounds,
            });
        }

        let delay = backoff_delay(rounds, options.initial_backoff, options.max_backoff);
        tracing::warn!(
            unprocessed = pending.len(),
            round = rounds,
            delay_ms = delay.as_millis() as u64,
            "resubmitting unprocessed keys"
        );
        tokio::time::sleep(delay).await;
        pending = store.delete_batch(&pending).await?;
        rounds += 1;
    }

    Ok(())
}
