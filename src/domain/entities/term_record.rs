use serde::{Deserialize, Serialize};

/// Maximum characters the collection schema allows for a term.
pub const MAX_TERM_CHARS: usize = 500;
/// Maximum characters the collection schema allows for a category.
pub const MAX_CATEGORY_CHARS: usize = 100;

/// A single terminology row as read from the source CSV.
///
/// Ids are not part of the record: both backends auto-assign the integer
/// primary key on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRecord {
    pub term: String,
    pub category: String,
}

impl TermRecord {
    /// Build a record, enforcing the collection's varchar bounds so the
    /// embedded and networked backends reject the same inputs.
    pub fn new(term: String, category: String) -> Result<Self, String> {
        if term.trim().is_empty() {
            return Err("Term must not be empty".to_string());
        }
        let term_chars = term.chars().count();
        if term_chars > MAX_TERM_CHARS {
            return Err(format!(
                "Term exceeds {MAX_TERM_CHARS} characters (got {term_chars})"
            ));
        }
        let category_chars = category.chars().count();
        if category_chars > MAX_CATEGORY_CHARS {
            return Err(format!(
                "Category exceeds {MAX_CATEGORY_CHARS} characters (got {category_chars})"
            ));
        }
        Ok(Self { term, category })
    }
}

/// A similarity search hit: the stored term plus its cosine score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermMatch {
    pub term: String,
    pub category: String,
    pub score: f64,
}
