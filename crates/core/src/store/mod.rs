//! Table store abstraction.

mod error;
mod inmemory;
mod traits;
mod types;

pub use error::{Result, StoreError};
pub use inmemory::{InMemoryTable, StoreCalls};
pub use traits::TableStore;
pub use types::{PageRequest, PurgeScope, ScanPage};
