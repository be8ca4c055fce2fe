//! Grouping keys into provider-sized delete batches.

use crate::keys::ItemKey;

/// Maximum number of write requests a single BatchWriteItem call accepts.
pub const MAX_BATCH_SIZE: usize = 25;

/// Splits a page of keys into batches of at most [`MAX_BATCH_SIZE`].
pub fn delete_batches(keys: &[ItemKey]) -> impl Iterator<Item = &[ItemKey]> {
    keys.chunks(MAX_BATCH_SIZE)
}

/// Number of batches needed to delete `key_count` keys.
pub fn batch_count(key_count: usize) -> usize {
    key_count.div_ceil(MAX_BATCH_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyValue;

    fn keys(n: usize) -> Vec<ItemKey> {
        (0..n)
            .map(|i| ItemKey::new(KeyValue::s("P"), KeyValue::n(i)))
            .collect()
    }

    #[test]
    fn test_empty_page_has_no_batches() {
        assert_eq!(delete_batches(&[]).count(), 0);
        assert_eq!(batch_count(0), 0);
    }

    #[test]
    fn test_batches_never_exceed_limit() {
        let page = keys(101);
        let sizes: Vec<usize> = delete_batches(&page).map(<[ItemKey]>::len).collect();

        assert_eq!(sizes, vec![25, 25, 25, 25, 1]);
        assert_eq!(batch_count(page.len()), sizes.len());
    }

    #[test]
    fn test_exact_multiple_of_batch_size() {
        let page = keys(50);
        assert_eq!(delete_batches(&page).count(), 2);
        assert_eq!(batch_count(50), 2);
    }

    #[test]
    fn test_batches_preserve_order() {
        let page = keys(30);
        let flattened: Vec<ItemKey> = delete_batches(&page).flatten().cloned().collect();
        assert_eq!(flattened, page);
    }
}
