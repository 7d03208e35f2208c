//! API request handlers

use anyhow::Result;
use tracing::info;

use super::models::{HealthStatus, SearchParams};
use crate::catalog::store::CatalogStats;
use crate::catalog::ShuffleReport;
use crate::search::{QueryService, SearchResults};

/// Handle health check requests
pub async fn health_check(service: &QueryService) -> HealthStatus {
    HealthStatus {
        status: "healthy".to_string(),
        service: "shorts-catalog".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        catalog_size: service.store().len().await,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}

/// Handle search requests
pub async fn search(service: &QueryService, params: &SearchParams) -> SearchResults {
    service.search(&params.query, params.limit(), params.mode()).await
}

/// Handle shuffle requests
pub async fn shuffle(service: &QueryService) -> ShuffleReport {
    let report = service.shuffle().await;
    info!("🔀 Shuffled {} videos", report.catalog_size);
    report
}

/// Handle catalog statistics requests
pub async fn stats(service: &QueryService) -> CatalogStats {
    service.store().stats().await
}

/// Handle reload requests
pub async fn reload(service: &QueryService) -> Result<usize> {
    Ok(service.store().reload().await?)
}
