use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::SessionError;

/// A named list of candidate words. Immutable once built; deserializing goes
/// through the same checks as [`Category::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(try_from = "CategoryFields")]
#[ts(export)]
pub struct Category {
    name: String,
    words: Vec<String>,
}

#[derive(Deserialize)]
struct CategoryFields {
    name: String,
    #[serde(default)]
    words: Vec<String>,
}

impl TryFrom<CategoryFields> for Category {
    type Error = SessionError;

    fn try_from(fields: CategoryFields) -> Result<Self, Self::Error> {
        Category::new(&fields.name, fields.words)
    }
}

impl Category {
    /// Build a category. Words are trimmed and blank entries dropped; an
    /// empty word list is accepted and only rejected when a word is drawn.
    pub fn new<I, S>(name: &str, words: I) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::invalid_input("category name must not be blank"));
        }

        let words = words
            .into_iter()
            .map(|word| word.as_ref().trim().to_string())
            .filter(|word| !word.is_empty())
            .collect();

        Ok(Self {
            name: name.to_string(),
            words,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// Case-insensitive name comparison, used for lookup and uniqueness.
    pub fn matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}
