//! LLM enrichment: assigns each catalog record a category and search keywords.

pub mod pacing;
pub mod prompts;

pub use pacing::PacingPolicy;
pub use prompts::EnrichmentPrompts;

use crate::catalog::{read_catalog, write_catalog, Category, VideoRecord};
use crate::error::EnrichmentError;
use crate::llm::{clean_llm_response, ChatMessage, LLM};
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Requests issued per batch: one for categories, one for keywords.
pub const CALLS_PER_BATCH: u32 = 2;

/// Batch counts of an enrichment run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    pub videos: usize,
    pub batches: usize,
    pub failed_category_batches: usize,
    pub failed_keyword_batches: usize,
}

/// The projection of a record sent to the model.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TitleEntry<'a> {
    video_id: &'a str,
    title: &'a str,
}

pub struct EnrichmentClient {
    llm: Box<dyn LLM>,
    batch_size: usize,
    pacing: PacingPolicy,
    prompts: EnrichmentPrompts,
}

impl EnrichmentClient {
    pub fn new(llm: Box<dyn LLM>, batch_size: usize, pacing: PacingPolicy, prompts: EnrichmentPrompts) -> Self {
        Self {
            llm,
            batch_size: batch_size.max(1),
            pacing,
            prompts,
        }
    }

    pub async fn enrich(&self, records: Vec<VideoRecord>) -> Vec<VideoRecord> {
        self.enrich_with_report(records).await.0
    }

    /// Enrich every record, batch by batch.
    ///
    /// A failed request leaves the defaults in place for its half of the batch; the
    /// output always has the same records, in the same order, as the input.
    pub async fn enrich_with_report(&self, mut records: Vec<VideoRecord>) -> (Vec<VideoRecord>, EnrichmentReport) {
        let mut report = EnrichmentReport {
            videos: records.len(),
            ..EnrichmentReport::default()
        };
        let total_batches = records.len().div_ceil(self.batch_size);

        for (index, batch) in records.chunks_mut(self.batch_size).enumerate() {
            if index > 0 {
                self.pacing.pause().await;
            }
            report.batches += 1;
            info!("🧠 Processing batch {} / {}", index + 1, total_batches);

            let payload = match batch_payload(batch) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("Cannot serialize batch {}: {}", index + 1, e);
                    String::from("[]")
                }
            };

            let categories = match self.request_categories(&payload).await {
                Ok(map) => map,
                Err(e) => {
                    warn!("Categorization failed for batch {}: {}. Assigning 'Other'.", index + 1, e);
                    report.failed_category_batches += 1;
                    HashMap::new()
                }
            };

            let keywords = match self.request_keywords(&payload).await {
                Ok(map) => map,
                Err(e) => {
                    warn!("Keyword extraction failed for batch {}: {}. Assigning no keywords.", index + 1, e);
                    report.failed_keyword_batches += 1;
                    HashMap::new()
                }
            };

            merge_batch(batch, &categories, &keywords);
        }

        info!(
            "✅ Enriched {} videos in {} batches ({} category / {} keyword failures)",
            report.videos, report.batches, report.failed_category_batches, report.failed_keyword_batches
        );
        (records, report)
    }

    /// Read the raw catalog, enrich it and write the enriched catalog.
    pub async fn enrich_file(&self, input: &Path, output: &Path) -> Result<EnrichmentReport> {
        let records = read_catalog(input).await?;
        info!("📂 Loaded {} shorts from {}", records.len(), input.display());

        let (enriched, report) = self.enrich_with_report(records).await;
        write_catalog(output, &enriched).await?;
        Ok(report)
    }

    async fn request_categories(&self, payload: &str) -> Result<HashMap<String, Category>, EnrichmentError> {
        let content = self.ask(&self.prompts.categorize, payload).await?;
        parse_category_map(&content)
    }

    async fn request_keywords(&self, payload: &str) -> Result<HashMap<String, Vec<String>>, EnrichmentError> {
        let content = self.ask(&self.prompts.keywords, payload).await?;
        parse_keyword_map(&content)
    }

    async fn ask(&self, instruction: &str, payload: &str) -> Result<String, EnrichmentError> {
        let messages = vec![ChatMessage::system(instruction), ChatMessage::user(payload)];
        let response = self.llm.chat(messages).await.map_err(EnrichmentError::Request)?;
        debug!("{:?} answered (tokens: {:?})", self.llm.provider_type(), response.tokens_used);
        Ok(response.content)
    }
}

fn batch_payload(batch: &[VideoRecord]) -> serde_json::Result<String> {
    let entries: Vec<TitleEntry> = batch
        .iter()
        .map(|record| TitleEntry {
            video_id: &record.video_id,
            title: &record.title,
        })
        .collect();
    serde_json::to_string(&entries)
}

/// Overwrite category and keywords of each record from the batch maps.
pub fn merge_batch(
    batch: &mut [VideoRecord],
    categories: &HashMap<String, Category>,
    keywords: &HashMap<String, Vec<String>>,
) {
    for record in batch {
        record.category = categories.get(&record.video_id).copied().unwrap_or_default();
        record.keywords = keywords.get(&record.video_id).cloned().unwrap_or_default();
    }
}

fn parse_object(content: &str) -> Result<serde_json::Map<String, Value>, EnrichmentError> {
    let cleaned = clean_llm_response(content);
    match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(EnrichmentError::Parse(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(EnrichmentError::Parse(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse a `videoId -> category` response. Unknown labels map to `Other`; entries
/// that are not strings are dropped.
pub fn parse_category_map(content: &str) -> Result<HashMap<String, Category>, EnrichmentError> {
    let map = parse_object(content)?
        .into_iter()
        .filter_map(|(id, value)| {
            let label = value.as_str()?;
            Some((id, Category::from_label(label).unwrap_or(Category::Other)))
        })
        .collect();
    Ok(map)
}

/// Parse a `videoId -> [keyword]` response. Keywords are trimmed and lowercased;
/// entries that are not arrays are dropped.
pub fn parse_keyword_map(content: &str) -> Result<HashMap<String, Vec<String>>, EnrichmentError> {
    let map = parse_object(content)?
        .into_iter()
        .filter_map(|(id, value)| {
            let keywords = value
                .as_array()?
                .iter()
                .filter_map(Value::as_str)
                .map(|keyword| keyword.trim().to_lowercase())
                .filter(|keyword| !keyword.is_empty())
                .collect();
            Some((id, keywords))
        })
        .collect();
    Ok(map)
}
