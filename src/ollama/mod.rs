//! Ollama domain types: validated tool arguments, wire payloads and the
//! response shapes the backend is expected to honour.

pub mod args;
mod model_name;
pub mod payloads;
pub mod schemas;

pub use model_name::ModelName;
