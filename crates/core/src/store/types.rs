use crate::keys::{ItemKey, KeyValue};

/// Which rows a purge reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PurgeScope {
    /// Every row in the table (Scan).
    #[default]
    Table,
    /// Only rows sharing one partition key value (Query).
    Partition(KeyValue),
}

impl PurgeScope {
    /// Returns true if the key belongs to this scope.
    pub fn contains(&self, key: &ItemKey) -> bool {
        match self {
            PurgeScope::Table => true,
            PurgeScope::Partition(pk) => &key.partition == pk,
        }
    }
}

/// A page of keys read from the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPage {
    /// Keys of the rows in this page, projected to key attributes only.
    pub keys: Vec<ItemKey>,
    /// Continuation token; `None` when the provider reports no further pages.
    pub cursor: Option<ItemKey>,
}

impl ScanPage {
    pub fn is_last(&self) -> bool {
        self.cursor.is_none()
    }
}

/// A request for one page of keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub scope: PurgeScope,
    /// Cursor returned by the previous page, absent for the first page.
    pub start_after: Option<ItemKey>,
    /// Maximum number of rows to evaluate; provider default when unset.
    pub limit: Option<u32>,
}
