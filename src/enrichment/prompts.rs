use crate::catalog::Category;
use crate::config::PromptConfig;
use tracing::{debug, info};

/// Placeholder substituted with the JSON list of category labels.
const CATEGORIES_PLACEHOLDER: &str = "{categories}";

/// System instructions for the two enrichment requests.
#[derive(Debug, Clone)]
pub struct EnrichmentPrompts {
    pub categorize: String,
    pub keywords: String,
}

impl Default for EnrichmentPrompts {
    fn default() -> Self {
        Self {
            categorize: render_categories(DEFAULT_CATEGORIZE_PROMPT),
            keywords: DEFAULT_KEYWORDS_PROMPT.to_string(),
        }
    }
}

impl EnrichmentPrompts {
    /// Load prompt overrides, falling back to the built-in prompt for each missing file.
    pub async fn load(config: &PromptConfig) -> Self {
        let defaults = Self::default();

        let categorize = match config.load_prompt(&config.categorize_file).await {
            Ok(prompt) => {
                info!("📝 Using categorization prompt from {}", config.categorize_file);
                render_categories(&prompt)
            }
            Err(e) => {
                debug!("{}, using default categorization prompt", e);
                defaults.categorize
            }
        };

        let keywords = match config.load_prompt(&config.keywords_file).await {
            Ok(prompt) => {
                info!("📝 Using keyword prompt from {}", config.keywords_file);
                prompt
            }
            Err(e) => {
                debug!("{}, using default keyword prompt", e);
                defaults.keywords
            }
        };

        Self { categorize, keywords }
    }
}

fn render_categories(template: &str) -> String {
    let labels = serde_json::to_string(&Category::labels()).unwrap_or_default();
    template.replace(CATEGORIES_PLACEHOLDER, &labels)
}

const DEFAULT_CATEGORIZE_PROMPT: &str = r#"You are an expert content categorizer. I will provide a list of video objects.
Assign *one* category to each video from this list: {categories}
Your response *must* be a valid JSON object only, mapping 'videoId' to 'category'.
Example: {"vid1": "Python", "vid2": "Career Advice"}"#;

const DEFAULT_KEYWORDS_PROMPT: &str = r#"You are an expert keyword extractor. I will provide a list of video objects.
For each video, list 3-5 relevant search keywords (all lowercase).
Your response *must* be a valid JSON object only, mapping 'videoId' to a list of strings.
Example: {"vid1": ["python", "loops", "beginner"], "vid2": ["job", "interview", "resume"]}"#;
