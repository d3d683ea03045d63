pub mod embeddings;
pub mod inference;
pub mod models;

pub use embeddings::EmbeddingsManager;
pub use inference::InferenceManager;
pub use models::ModelsManager;
