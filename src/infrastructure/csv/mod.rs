pub mod term_file;
