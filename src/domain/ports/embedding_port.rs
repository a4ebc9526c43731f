use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy)]
pub enum InputType {
    Document,
    Query,
}

#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one batch of texts, preserving input order.
    async fn embed(&self, texts: &[String], input_type: InputType)
        -> Result<Vec<Vec<f32>>, DomainError>;

    /// Vector length this provider produces (0 = unknown/none).
    fn dimension(&self) -> usize;
}
