//! Finding the files that belong to a model.

use tracing::{debug, instrument};

use ras_common::{file_stem_key, normalize_key, parent_prefix, RasResult};
use ras_parser::{classify_key, FileRole};
use storage::ModelStore;

/// Keys of the files that belong to the model defined by `definition_file`.
///
/// A file belongs to the model when it sits in the same directory and shares
/// the definition file's stem (`Muncie.g01` for `Muncie.prj`), or when it is
/// a projection file in that directory. The definition file itself is not
/// included. Keys are sorted and in listing form (see [`normalize_key`]).
#[instrument(skip(store))]
pub async fn model_files(store: &dyn ModelStore, definition_file: &str) -> RasResult<Vec<String>> {
    let definition_file = normalize_key(definition_file);
    let stem = format!("{}.", file_stem_key(&definition_file));
    let entries = store.list(parent_prefix(&definition_file), false).await?;

    let mut files: Vec<String> = entries
        .into_iter()
        .filter(|entry| !entry.is_dir)
        .map(|entry| normalize_key(&entry.path))
        .filter(|path| *path != definition_file)
        .filter(|path| path.starts_with(&stem) || classify_key(path) == FileRole::Projection)
        .collect();
    files.sort();

    debug!(count = files.len(), "Discovered model files");
    Ok(files)
}

/// Whether `key` defines a valid model. Any failure along the way, including
/// a missing file or a malformed geometry file, counts as "no".
pub async fn is_a_model(store: std::sync::Arc<dyn ModelStore>, key: &str) -> bool {
    match crate::RasModel::assemble(store, key).await {
        Ok(model) => model.is_model(),
        Err(e) => {
            debug!(path = %key, error = %e, "Not a model");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use storage::ObjectStorage;

    #[tokio::test]
    async fn test_stem_and_projection_files() {
        let storage = ObjectStorage::in_memory();
        for key in [
            "m/Muncie.prj",
            "m/Muncie.g01",
            "m/Muncie.p01",
            "m/Muncie.g01.hdf",
            "m/Projection.prj",
            "m/Other.g01",
            "m/notes.txt",
            "m/sub/Muncie.g02",
        ] {
            storage.put(key, Bytes::from_static(b"x")).await.unwrap();
        }

        let files = model_files(&storage, "m/Muncie.prj").await.unwrap();
        assert_eq!(
            files,
            vec!["m/Muncie.g01", "m/Muncie.g01.hdf", "m/Muncie.p01", "m/Projection.prj"]
        );
    }

    #[tokio::test]
    async fn test_leading_separator() {
        let storage = ObjectStorage::in_memory();
        for key in ["m/Muncie.prj", "m/Muncie.g01", "m/Projection.prj"] {
            storage.put(key, Bytes::from_static(b"x")).await.unwrap();
        }

        let files = model_files(&storage, "/m/Muncie.prj").await.unwrap();
        assert_eq!(files, vec!["m/Muncie.g01", "m/Projection.prj"]);
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let storage = ObjectStorage::in_memory();
        let files = model_files(&storage, "nowhere/Muncie.prj").await.unwrap();
        assert!(files.is_empty());
    }
}
