//! Bounded concurrent map with order-preserving fan-in.

use std::future::Future;

use futures::stream::{self, StreamExt};

/// Run `f` over every item with at most `max_concurrency` futures in flight
/// and return the results in input order.
///
/// Each future is tagged with its input index and its output is written to
/// that slot, so completion order never affects the result. The first error
/// aborts the whole map: in-flight siblings are dropped and no partial
/// results are returned. A `max_concurrency` of 0 is treated as 1.
pub async fn concurrent_map<I, T, R, E, F, Fut>(
    items: I,
    max_concurrency: usize,
    mut f: F,
) -> Result<Vec<R>, E>
where
    I: IntoIterator<Item = T>,
    F: FnMut(usize, T) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    let tasks: Vec<_> = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let task = f(index, item);
            async move { task.await.map(|value| (index, value)) }
        })
        .collect();

    let mut slots: Vec<Option<R>> = std::iter::repeat_with(|| None).take(tasks.len()).collect();
    let mut results = stream::iter(tasks).buffer_unordered(max_concurrency.max(1));

    while let Some(result) = results.next().await {
        let (index, value) = result?;
        slots[index] = Some(value);
    }

    // The stream ran to completion, so every slot is filled.
    Ok(slots.into_iter().flatten().collect())
}
