pub mod import_terms;
pub mod search_terms;
pub mod stats;
