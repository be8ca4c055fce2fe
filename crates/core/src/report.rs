//! Pure formatting of purge output lines.

use crate::keys::KeySchema;
use crate::purge::{PurgeProgress, PurgeSummary};
use crate::store::PurgeScope;

/// Line printed after each page has been processed.
pub fn format_progress(progress: &PurgeProgress) -> String {
    if progress.dry_run {
        format!("  Would delete {} items so far...", progress.deleted)
    } else {
        format!("  Deleted {} items so far...", progress.deleted)
    }
}

/// Line printed when the purge finishes.
pub fn format_summary(summary: &PurgeSummary) -> String {
    if summary.dry_run {
        format!(
            "Done. Would delete {} total items (dry run, nothing deleted).",
            summary.deleted
        )
    } else {
        format!("Done. Deleted {} total items.", summary.deleted)
    }
}

/// Describes which rows a purge targets.
pub fn format_scope(scope: &PurgeScope, schema: &KeySchema) -> String {
    match scope {
        PurgeScope::Table => "all items".to_string(),
        PurgeScope::Partition(value) => {
            format!("items where {} = {}", schema.partition_key, value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyValue;

    #[test]
    fn test_format_progress() {
        let progress = PurgeProgress {
            page: 3,
            page_keys: 25,
            deleted: 75,
            dry_run: false,
        };
        assert_eq!(format_progress(&progress), "  Deleted 75 items so far...");
    }

    #[test]
    fn test_format_progress_dry_run() {
        let progress = PurgeProgress {
            page: 1,
            page_keys: 4,
            deleted: 4,
            dry_run: true,
        };
        assert_eq!(
            format_progress(&progress),
            "  Would delete 4 items so far..."
        );
    }

    #[test]
    fn test_format_summary() {
        let summary = PurgeSummary {
            deleted: 1234,
            pages: 2,
            batches: 50,
            dry_run: false,
        };
        assert_eq!(format_summary(&summary), "Done. Deleted 1234 total items.");
    }

    #[test]
    fn test_format_summary_dry_run() {
        let summary = PurgeSummary {
            deleted: 7,
            dry_run: true,
            ..PurgeSummary::default()
        };
        assert_eq!(
            format_summary(&summary),
            "Done. Would delete 7 total items (dry run, nothing deleted)."
        );
    }

    #[test]
    fn test_format_scope() {
        let schema = KeySchema::default();
        assert_eq!(format_scope(&PurgeScope::Table, &schema), "all items");
        assert_eq!(
            format_scope(&PurgeScope::Partition(KeyValue::s("RES#UNKNOWN")), &schema),
            "items where pk = RES#UNKNOWN"
        );
    }
}
