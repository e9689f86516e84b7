use rand::seq::SliceRandom;

/// Caps `items` at `max_size` by uniform sampling without replacement.
/// Lists already within the cap come back untouched, original order intact.
pub fn sample<T>(mut items: Vec<T>, max_size: usize) -> Vec<T> {
    if items.len() > max_size {
        items.shuffle(&mut rand::thread_rng());
        items.truncate(max_size);
    }
    items
}
