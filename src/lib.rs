//! Shorts Catalog
//!
//! Builds a curated catalog of short programming videos from a fixed set of channels,
//! enriches it with LLM-assigned categories and keywords, and serves search over it.

pub mod api;
pub mod catalog;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod search;
pub mod youtube;

// Re-export main types for easy access
pub use crate::config::{Config, ConfigBuilder};
pub use crate::catalog::{CatalogStore, Category, ChannelRef, VideoRecord};
pub use crate::enrichment::{EnrichmentClient, EnrichmentPrompts, EnrichmentReport, PacingPolicy};
pub use crate::llm::{create_llm, LLMConfig, LLMProvider, LLM};
pub use crate::pipeline::{BuildReport, CatalogBuilder, ChannelResolver, DurationFilter, VideoIdHarvester};
pub use crate::search::{QueryService, SearchMode, SearchResults};
pub use crate::youtube::{VideoPlatform, YouTubeClient};
