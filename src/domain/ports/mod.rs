pub mod embedding_port;
pub mod term_collection;
