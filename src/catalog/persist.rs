//! Flat JSON array persistence for raw and enriched catalogs
use super::VideoRecord;
use crate::error::CatalogError;
use std::path::Path;
use tracing::{debug, info};

/// Read a catalog file written by [`write_catalog`].
pub async fn read_catalog(path: &Path) -> Result<Vec<VideoRecord>, CatalogError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let records: Vec<VideoRecord> =
        serde_json::from_str(&content).map_err(|source| CatalogError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Write a catalog as a pretty-printed JSON array, replacing any previous file.
pub async fn write_catalog(path: &Path, records: &[VideoRecord]) -> Result<(), CatalogError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| CatalogError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    let json_content = serde_json::to_string_pretty(records).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    tokio::fs::write(path, json_content)
        .await
        .map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    info!("💾 Saved {} records to {}", records.len(), path.display());
    Ok(())
}
