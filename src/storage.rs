use crate::errors::StoreError;
use crate::models::DailyRecord;
use std::{collections::BTreeMap, path::Path};
use tokio::fs;
use tracing::{debug, error};

pub type Logs = BTreeMap<String, DailyRecord>;

/// Reads the durable slot. A missing, unreadable or malformed slot yields an
/// empty log set; startup never fails on bad content.
pub async fn load_logs(path: &Path) -> Logs {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(logs) => logs,
            Err(err) => {
                error!("failed to parse logs at {}: {err}", path.display());
                Logs::new()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!("no logs at {}, starting empty", path.display());
            Logs::new()
        }
        Err(err) => {
            error!("failed to read logs at {}: {err}", path.display());
            Logs::new()
        }
    }
}

/// Overwrites the slot with the full log set.
pub async fn persist_logs(path: &Path, logs: &Logs) -> Result<(), StoreError> {
    let payload = serde_json::to_vec_pretty(logs)?;
    fs::write(path, payload)
        .await
        .map_err(|source| StoreError::Persist {
            path: path.to_path_buf(),
            source,
        })
}

pub async fn ensure_parent_dir(path: &Path) -> Result<(), StoreError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Persist {
                    path: parent.to_path_buf(),
                    source,
                })
        }
        _ => Ok(()),
    }
}
