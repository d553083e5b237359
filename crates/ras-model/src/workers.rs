//! One task per file, results in file order.

use std::sync::Arc;

use bytes::Bytes;
use tracing::warn;

use ras_common::{RasError, RasResult};
use storage::ModelStore;

/// Fetch every key on its own task and hand the fetch result to `parse`.
///
/// Results come back in the order of `keys`, one slot per key, after every
/// task has finished.
pub(crate) async fn run_per_file<T, F>(
    store: &Arc<dyn ModelStore>,
    keys: &[String],
    parse: F,
) -> Vec<RasResult<T>>
where
    T: Send + 'static,
    F: Fn(&str, RasResult<Bytes>) -> RasResult<T> + Clone + Send + 'static,
{
    let handles: Vec<_> = keys
        .iter()
        .map(|key| {
            let store = store.clone();
            let key = key.clone();
            let parse = parse.clone();
            tokio::spawn(async move {
                let fetched = store.fetch(&key).await;
                parse(&key, fetched)
            })
        })
        .collect();

    let mut slots = Vec::with_capacity(handles.len());
    for (handle, key) in handles.into_iter().zip(keys) {
        slots.push(match handle.await {
            Ok(result) => result,
            Err(e) => Err(RasError::TaskFailed(format!("{}: {}", key, e))),
        });
    }
    slots
}

/// Split worker results into values and the first error. Every error is
/// logged, so later failures are not lost.
pub(crate) fn first_error<T>(
    role: &str,
    keys: &[String],
    results: Vec<RasResult<T>>,
) -> (Vec<T>, Option<RasError>) {
    let mut values = Vec::with_capacity(results.len());
    let mut first = None;
    for (key, result) in keys.iter().zip(results) {
        match result {
            Ok(value) => values.push(value),
            Err(e) => {
                warn!(role = role, path = %key, error = %e, "File worker failed");
                first.get_or_insert(e);
            }
        }
    }
    (values, first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::ObjectStorage;

    #[tokio::test]
    async fn test_slots_follow_key_order() {
        let storage = ObjectStorage::in_memory();
        let keys: Vec<String> = (0..8).map(|i| format!("m/f{}.txt", i)).collect();
        for (i, key) in keys.iter().enumerate() {
            storage.put(key, Bytes::from(i.to_string())).await.unwrap();
        }
        let store: Arc<dyn ModelStore> = Arc::new(storage);

        let results = run_per_file(&store, &keys, |_, fetched| {
            let bytes = fetched?;
            Ok(String::from_utf8_lossy(&bytes).to_string())
        })
        .await;

        let values: Vec<String> = results.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(values, (0..8).map(|i| i.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn test_first_error_keeps_values() {
        let keys = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let results = vec![
            Ok(1),
            Err(RasError::NotFound("b".into())),
            Err(RasError::NotFound("c".into())),
        ];
        let (values, first) = first_error("geometry", &keys, results);
        assert_eq!(values, vec![1]);
        assert!(matches!(first, Some(RasError::NotFound(k)) if k == "b"));
    }
}
