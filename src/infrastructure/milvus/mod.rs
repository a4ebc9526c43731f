pub mod http_collection;
