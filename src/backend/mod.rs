mod client;
mod types;

#[cfg(test)]
pub use client::MockInferenceBackend;
pub use client::{InferenceBackend, WorkersAiClient};
pub use types::*;
