//! Boundary conditions of every flow file.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::{info, instrument, warn};

use ras_common::{file_name, RasError, RasResult};
use ras_parser::{parse_forcing, ForcingData};

use crate::RasModel;

impl RasModel {
    /// Parse every flow file of the model into its boundary conditions.
    ///
    /// Each flow file gets its own task that inserts into the shared
    /// aggregate and reports on a completion channel. Quasi-steady files are
    /// recorded as not implemented.
    #[instrument(skip(self), fields(path = %self.definition_file()))]
    pub async fn forcing_data(&self) -> RasResult<ForcingData> {
        let keys: Vec<String> = self
            .metadata
            .flow_files
            .iter()
            .map(|f| f.path.clone())
            .collect();

        let forcing = Arc::new(Mutex::new(ForcingData::default()));
        let (tx, mut rx) = mpsc::channel::<(String, RasResult<()>)>(keys.len().max(1));

        for key in &keys {
            let store = self.store.clone();
            let forcing = forcing.clone();
            let tx = tx.clone();
            let key = key.clone();
            tokio::spawn(async move {
                let result = async {
                    let content = store.fetch(&key).await?;
                    let data = parse_forcing(&key, &content)?;
                    forcing.lock().await.insert(file_name(&key).to_string(), data);
                    Ok::<(), RasError>(())
                }
                .await;
                drop(forcing);
                let _ = tx.send((key, result)).await;
            });
        }
        drop(tx);

        let mut first = None;
        let mut completed = 0;
        while let Some((key, result)) = rx.recv().await {
            completed += 1;
            if let Err(e) = result {
                warn!(role = "flow", path = %key, error = %e, "File worker failed");
                first.get_or_insert(e);
            }
        }
        if completed < keys.len() {
            first.get_or_insert(RasError::TaskFailed(format!(
                "{} of {} flow workers did not report",
                keys.len() - completed,
                keys.len()
            )));
        }
        if let Some(e) = first {
            return Err(e);
        }

        let data = std::mem::take(&mut *forcing.lock().await);
        info!(files = data.len(), "Extracted forcing data");
        Ok(data)
    }
}
