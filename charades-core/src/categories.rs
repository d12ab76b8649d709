use anyhow::{Context, Result};
use charades_types::{Category, SessionError};
use std::path::Path;
use tracing::{debug, info};

const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    ("Animals", &["dog", "cat", "elephant", "giraffe", "tiger"]),
    ("Movies", &["Titanic", "Avatar", "Inception", "Avengers", "Matrix"]),
    ("Professions", &["doctor", "engineer", "teacher", "pilot", "chef"]),
];

/// Built-in categories used when a session is created without any.
pub fn default_categories() -> Vec<Category> {
    DEFAULT_CATEGORIES
        .iter()
        .filter_map(|(name, words)| Category::new(name, words.iter()).ok())
        .collect()
}

/// The categories available to one session. Names are unique ignoring case.
#[derive(Debug, Clone)]
pub struct CategorySet {
    categories: Vec<Category>,
}

impl CategorySet {
    /// Build the active set, seeding the defaults when `categories` is empty.
    pub fn new(categories: Vec<Category>) -> Result<Self, SessionError> {
        let categories = if categories.is_empty() {
            default_categories()
        } else {
            categories
        };

        for (index, category) in categories.iter().enumerate() {
            if categories[..index].iter().any(|c| c.matches(category.name())) {
                return Err(SessionError::invalid_input(format!(
                    "duplicate category name: {}",
                    category.name()
                )));
            }
        }

        Ok(Self { categories })
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.matches(name))
    }

    pub fn find(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.matches(name))
    }

    pub fn get(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Parse a word list: one word per line, blank lines and `#` comments skipped.
pub fn parse_word_list(name: &str, content: &str) -> Result<Category, SessionError> {
    let words = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'));

    Category::new(name, words)
}

/// Load every `*.txt` file in `dir` as a category named after the file stem.
pub fn load_word_lists<P: AsRef<Path>>(dir: P) -> Result<Vec<Category>> {
    let dir = dir.as_ref();
    let mut paths = Vec::new();

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read word list directory {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            paths.push(path);
        }
    }

    // Directory order is platform dependent
    paths.sort();

    let mut categories = Vec::with_capacity(paths.len());
    for path in paths {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .with_context(|| format!("Invalid word list file name {}", path.display()))?;
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read word list {}", path.display()))?;

        let category = parse_word_list(name, &content)?;
        debug!("Loaded {} words for category {}", category.words().len(), name);
        categories.push(category);
    }

    info!("Loaded {} categories from {}", categories.len(), dir.display());
    Ok(categories)
}
