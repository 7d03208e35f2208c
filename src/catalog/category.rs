use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed topic vocabulary the enrichment stage assigns from.
///
/// Serialized as its display label (`"HTML/CSS"`, `"Databases & SQL"`, ...). Labels
/// outside the vocabulary deserialize as [`Category::Other`], so a record always
/// carries a member of the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Python,
    JavaScript,
    Java,
    CCpp,
    HtmlCss,
    React,
    VueAngular,
    UiUxDesign,
    NodeJs,
    DatabasesSql,
    DevOpsCloud,
    AiMachineLearning,
    DataScience,
    Cybersecurity,
    GameDevelopment,
    MobileDevelopment,
    ComputerScience,
    SystemDesign,
    CareerAdvice,
    ProductivityTools,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 21] = [
        Category::Python,
        Category::JavaScript,
        Category::Java,
        Category::CCpp,
        Category::HtmlCss,
        Category::React,
        Category::VueAngular,
        Category::UiUxDesign,
        Category::NodeJs,
        Category::DatabasesSql,
        Category::DevOpsCloud,
        Category::AiMachineLearning,
        Category::DataScience,
        Category::Cybersecurity,
        Category::GameDevelopment,
        Category::MobileDevelopment,
        Category::ComputerScience,
        Category::SystemDesign,
        Category::CareerAdvice,
        Category::ProductivityTools,
        Category::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Python => "Python",
            Category::JavaScript => "JavaScript",
            Category::Java => "Java",
            Category::CCpp => "C/C++",
            Category::HtmlCss => "HTML/CSS",
            Category::React => "React",
            Category::VueAngular => "Vue/Angular",
            Category::UiUxDesign => "UI/UX Design",
            Category::NodeJs => "Node.js",
            Category::DatabasesSql => "Databases & SQL",
            Category::DevOpsCloud => "DevOps & Cloud",
            Category::AiMachineLearning => "AI & Machine Learning",
            Category::DataScience => "Data Science",
            Category::Cybersecurity => "Cybersecurity",
            Category::GameDevelopment => "Game Development",
            Category::MobileDevelopment => "Mobile Development",
            Category::ComputerScience => "Computer Science",
            Category::SystemDesign => "System Design",
            Category::CareerAdvice => "Career Advice",
            Category::ProductivityTools => "Productivity & Tools",
            Category::Other => "Other",
        }
    }

    /// Case-insensitive lookup of a vocabulary label.
    pub fn from_label(label: &str) -> Option<Category> {
        let label = label.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.label().eq_ignore_ascii_case(label))
    }

    /// All labels in vocabulary order, as handed to the model.
    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(Category::label).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Category::from_label(&label).unwrap_or_default()
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.label().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_has_twenty_one_unique_labels() {
        let mut labels = Category::labels();
        assert_eq!(labels.len(), 21);
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 21);
        assert!(labels.contains(&"Other"));
    }

    #[test]
    fn test_label_lookup_is_case_insensitive() {
        assert_eq!(Category::from_label("html/css"), Some(Category::HtmlCss));
        assert_eq!(Category::from_label(" Databases & SQL "), Some(Category::DatabasesSql));
        assert_eq!(Category::from_label("Cooking"), None);
    }

    #[test]
    fn test_unknown_label_deserializes_as_other() {
        let category: Category = serde_json::from_str("\"Knitting\"").unwrap();
        assert_eq!(category, Category::Other);

        let category: Category = serde_json::from_str("\"C/C++\"").unwrap();
        assert_eq!(category, Category::CCpp);
        assert_eq!(serde_json::to_string(&category).unwrap(), "\"C/C++\"");
    }
}
