//! Fixed-size chunking of ordered sequences

use std::num::NonZeroUsize;

/// Splits `items` into contiguous groups of `size`
///
/// Every group has exactly `size` elements except possibly the last one.
/// An empty input yields no groups.
pub fn chunk<T: Clone>(items: &[T], size: NonZeroUsize) -> Vec<Vec<T>> {
    items.chunks(size.get()).map(<[T]>::to_vec).collect()
}
