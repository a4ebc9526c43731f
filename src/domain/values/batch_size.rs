use serde::{Deserialize, Serialize};
use std::fmt;

/// A strictly positive batch size for chunked embedding and insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSize(usize);

impl BatchSize {
    pub fn new(value: usize) -> Result<Self, String> {
        if value == 0 {
            return Err("Batch size must be greater than 0".to_string());
        }
        Ok(BatchSize(value))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl fmt::Display for BatchSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
