use async_trait::async_trait;

use crate::keys::ItemKey;

use super::{PageRequest, Result, ScanPage};

/// A table that can be read page by page and deleted from in batches.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Reads one page of keys.
    async fn fetch_keys(&self, request: &PageRequest) -> Result<ScanPage>;

    /// Deletes a batch of keys, returning the keys the provider did not
    /// process. Callers must not send more than
    /// [`MAX_BATCH_SIZE`](crate::batch::MAX_BATCH_SIZE) keys.
    async fn delete_batch(&self, keys: &[ItemKey]) -> Result<Vec<ItemKey>>;
}
