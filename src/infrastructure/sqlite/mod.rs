pub mod term_collection;
