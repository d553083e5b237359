//! Loading fixture files into storage backends.

use std::path::Path;

use bytes::Bytes;
use ras_common::RasResult;
use storage::ObjectStorage;
use tempfile::TempDir;

/// Put every `(key, content)` pair into the store.
pub async fn seed_store(store: &ObjectStorage, files: &[(String, String)]) -> RasResult<()> {
    for (key, content) in files {
        store.put(key, Bytes::from(content.clone())).await?;
    }
    Ok(())
}

/// In-memory store holding the given files.
pub async fn seeded_store(files: &[(String, String)]) -> RasResult<ObjectStorage> {
    let store = ObjectStorage::in_memory();
    seed_store(&store, files).await?;
    Ok(store)
}

/// Write the files below a fresh temporary directory, keys becoming
/// relative paths.
pub fn write_model_dir(files: &[(String, String)]) -> std::io::Result<TempDir> {
    let dir = TempDir::new()?;
    for (key, content) in files {
        let path = dir.path().join(Path::new(key));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
    }
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{model, sample_model};

    #[test]
    fn test_seeded_store_holds_files() {
        let store = tokio_test::block_on(seeded_store(&sample_model())).unwrap();
        let content = tokio_test::block_on(store.get(model::PROJECT_KEY)).unwrap();
        assert!(content.starts_with(b"Proj Title=Muncie"));
    }

    #[test]
    fn test_write_model_dir() {
        let dir = write_model_dir(&sample_model()).unwrap();
        assert!(dir.path().join(model::PROJECT_KEY).is_file());
    }
}
