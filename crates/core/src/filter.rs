//! Byte-ceiling filtering of candidate streams.

/// Keep items whose size is unknown (0) or within `max_size_bytes`.
///
/// A ceiling of 0 disables filtering. Streams of unknown size are never
/// dropped.
pub fn filter_by_size<T, F>(items: Vec<T>, max_size_bytes: u64, size_of: F) -> Vec<T>
where
    F: Fn(&T) -> u64,
{
    if max_size_bytes == 0 {
        return items;
    }

    items
        .into_iter()
        .filter(|item| {
            let size = size_of(item);
            size == 0 || size <= max_size_bytes
        })
        .collect()
}
