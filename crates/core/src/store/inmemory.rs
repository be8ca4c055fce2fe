//! In-memory table store.

use std::collections::BTreeSet;
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::batch::MAX_BATCH_SIZE;
use crate::keys::ItemKey;

use super::{PageRequest, Result, ScanPage, StoreError, TableStore};

/// Rows per page when the request sets no limit.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Calls observed by an [`InMemoryTable`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreCalls {
    /// Cursor passed to each `fetch_keys` call, in order.
    pub scans: Vec<Option<ItemKey>>,
    /// Size of each `delete_batch` call, in order.
    pub deletes: Vec<usize>,
}

#[derive(Debug, Default)]
struct State {
    rows: BTreeSet<ItemKey>,
    calls: StoreCalls,
    fail_scan_on: Option<usize>,
    fail_delete_on: Option<usize>,
    unprocessed_calls: usize,
}

/// Table store backed by an ordered set of keys.
///
/// Pages follow provider semantics: a full page always carries a cursor, so
/// a table holding an exact multiple of the page size ends with an empty
/// page. Failures and unprocessed keys can be injected for tests.
#[derive(Debug, Clone)]
pub struct InMemoryTable {
    state: Arc<Mutex<State>>,
    page_size: usize,
}

impl Default for InMemoryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Creates a table holding the given keys.
    pub fn with_rows(rows: impl IntoIterator<Item = ItemKey>) -> Self {
        let state = State {
            rows: rows.into_iter().collect(),
            ..State::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Sets the number of rows returned per page when no limit is requested.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Makes the n-th `fetch_keys` call (1-based) fail.
    pub async fn fail_scan_on(&self, call: usize) {
        self.state.lock().await.fail_scan_on = Some(call);
    }

    /// Makes the n-th `delete_batch` call (1-based) fail.
    pub async fn fail_delete_on(&self, call: usize) {
        self.state.lock().await.fail_delete_on = Some(call);
    }

    /// The next `calls` delete batches each leave their last key unprocessed.
    pub async fn leave_unprocessed(&self, calls: usize) {
        self.state.lock().await.unprocessed_calls = calls;
    }

    /// Inserts a row.
    pub async fn insert(&self, key: ItemKey) {
        self.state.lock().await.rows.insert(key);
    }

    /// Number of rows currently stored.
    pub async fn len(&self) -> usize {
        self.state.lock().await.rows.len()
    }

    /// Returns true if the table holds no rows.
    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.rows.is_empty()
    }

    /// Returns true if the key is stored.
    pub async fn contains(&self, key: &ItemKey) -> bool {
        self.state.lock().await.rows.contains(key)
    }

    /// Calls observed so far.
    pub async fn calls(&self) -> StoreCalls {
        self.state.lock().await.calls.clone()
    }
}

#[async_trait]
impl TableStore for InMemoryTable {
    async fn fetch_keys(&self, request: &PageRequest) -> Result<ScanPage> {
        let mut state = self.state.lock().await;
        state.calls.scans.push(request.start_after.clone());

        let call = state.calls.scans.len();
        if state.fail_scan_on == Some(call) {
            return Err(StoreError::Injected {
                operation: "scan",
                call,
            });
        }

        let capacity = request
            .limit
            .map(|l| l as usize)
            .unwrap_or(self.page_size)
            .max(1);

        let lower = match &request.start_after {
            Some(cursor) => Bound::Excluded(cursor),
            None => Bound::Unbounded,
        };

        let keys: Vec<ItemKey> = state
            .rows
            .range::<ItemKey, _>((lower, Bound::Unbounded))
            .filter(|key| request.scope.contains(key))
            .take(capacity)
            .cloned()
            .collect();

        let cursor = if keys.len() == capacity {
            keys.last().cloned()
        } else {
            None
        };

        Ok(ScanPage { keys, cursor })
    }

    async fn delete_batch(&self, keys: &[ItemKey]) -> Result<Vec<ItemKey>> {
        let mut state = self.state.lock().await;
        state.calls.deletes.push(keys.len());

        let call = state.calls.deletes.len();
        if state.fail_delete_on == Some(call) {
            return Err(StoreError::Injected {
                operation: "delete",
                call,
            });
        }

        if keys.len() > MAX_BATCH_SIZE {
            return Err(StoreError::Provider(format!(
                "batch of {} keys exceeds the limit of {}",
                keys.len(),
                MAX_BATCH_SIZE
            )));
        }

        let (processed, unprocessed) = match keys.split_last() {
            Some((last, rest)) if state.unprocessed_calls > 0 => {
                state.unprocessed_calls -= 1;
                (rest, vec![last.clone()])
            }
            _ => (keys, Vec::new()),
        };

        for key in processed {
            state.rows.remove(key);
        }

        Ok(unprocessed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyValue;
    use crate::store::PurgeScope;

    fn key(pk: &str, sk: u32) -> ItemKey {
        ItemKey::new(KeyValue::s(pk), KeyValue::s(format!("{sk:04}")))
    }

    fn rows(n: u32) -> Vec<ItemKey> {
        (0..n).map(|i| key("P", i)).collect()
    }

    #[tokio::test]
    async fn test_fetch_first_page() {
        let table = InMemoryTable::with_rows(rows(5)).with_page_size(2);

        let page = table.fetch_keys(&PageRequest::default()).await.unwrap();

        assert_eq!(page.keys, vec![key("P", 0), key("P", 1)]);
        assert_eq!(page.cursor, Some(key("P", 1)));
    }

    #[tokio::test]
    async fn test_fetch_resumes_after_cursor() {
        let table = InMemoryTable::with_rows(rows(5)).with_page_size(2);
        let request = PageRequest {
            start_after: Some(key("P", 3)),
            ..PageRequest::default()
        };

        let page = table.fetch_keys(&request).await.unwrap();

        assert_eq!(page.keys, vec![key("P", 4)]);
        assert!(page.is_last());
    }

    #[tokio::test]
    async fn test_full_last_page_still_has_cursor() {
        let table = InMemoryTable::with_rows(rows(2)).with_page_size(2);

        let page = table.fetch_keys(&PageRequest::default()).await.unwrap();
        assert_eq!(page.cursor, Some(key("P", 1)));

        let request = PageRequest {
            start_after: page.cursor,
            ..PageRequest::default()
        };
        let page = table.fetch_keys(&request).await.unwrap();
        assert!(page.keys.is_empty());
        assert!(page.is_last());
    }

    #[tokio::test]
    async fn test_request_limit_overrides_page_size() {
        let table = InMemoryTable::with_rows(rows(5));
        let request = PageRequest {
            limit: Some(3),
            ..PageRequest::default()
        };

        let page = table.fetch_keys(&request).await.unwrap();

        assert_eq!(page.keys.len(), 3);
        assert_eq!(page.cursor, Some(key("P", 2)));
    }

    #[tokio::test]
    async fn test_partition_scope_filters_rows() {
        let table = InMemoryTable::with_rows(vec![key("A", 1), key("B", 1), key("B", 2)]);
        let request = PageRequest {
            scope: PurgeScope::Partition(KeyValue::s("B")),
            ..PageRequest::default()
        };

        let page = table.fetch_keys(&request).await.unwrap();

        assert_eq!(page.keys, vec![key("B", 1), key("B", 2)]);
    }

    #[tokio::test]
    async fn test_delete_batch_removes_rows() {
        let table = InMemoryTable::with_rows(rows(3));

        let unprocessed = table
            .delete_batch(&[key("P", 0), key("P", 2)])
            .await
            .unwrap();

        assert!(unprocessed.is_empty());
        assert_eq!(table.len().await, 1);
        assert!(table.contains(&key("P", 1)).await);
    }

    #[tokio::test]
    async fn test_delete_batch_rejects_oversized_batch() {
        let table = InMemoryTable::with_rows(rows(30));

        let result = table.delete_batch(&rows(26)).await;

        assert!(matches!(result, Err(StoreError::Provider(_))));
        assert_eq!(table.len().await, 30);
    }

    #[tokio::test]
    async fn test_leave_unprocessed_returns_last_key() {
        let table = InMemoryTable::with_rows(rows(3));
        table.leave_unprocessed(1).await;

        let unprocessed = table.delete_batch(&rows(3)).await.unwrap();
        assert_eq!(unprocessed, vec![key("P", 2)]);
        assert_eq!(table.len().await, 1);

        let unprocessed = table.delete_batch(&unprocessed).await.unwrap();
        assert!(unprocessed.is_empty());
        assert!(table.is_empty().await);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let table = InMemoryTable::with_rows(rows(3));
        table.fail_scan_on(2).await;
        table.fail_delete_on(1).await;

        assert!(table.fetch_keys(&PageRequest::default()).await.is_ok());
        assert_eq!(
            table.fetch_keys(&PageRequest::default()).await,
            Err(StoreError::Injected {
                operation: "scan",
                call: 2
            })
        );
        assert!(matches!(
            table.delete_batch(&rows(1)).await,
            Err(StoreError::Injected { .. })
        ));
        assert_eq!(table.len().await, 3);
    }
}
