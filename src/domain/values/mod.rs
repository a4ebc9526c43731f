pub mod batch_size;
