pub mod term_record;
