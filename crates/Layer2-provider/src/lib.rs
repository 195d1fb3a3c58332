//! # sealtrace-provider
//!
//! Backend adapter layer for SealTrace.
//! Normalizes vendor inference APIs behind explicit capability traits.
//!
//! ## Features
//! - `Backend` (single-shot) and `StreamingBackend` (SSE) capabilities,
//!   declared per adapter rather than probed at call time
//! - Vendor metadata (`BackendDescriptor`) for audit events
//! - OpenAI-compatible chat adapter (invoke + stream)
//! - Hugging Face Inference API adapter (invoke only)

pub mod backends;
pub mod error;
pub mod r#trait;

// Core traits and types
pub use r#trait::{Backend, BackendDescriptor, ChunkStream, StreamingBackend};

// Error
pub use error::BackendError;

// Backend implementations
pub use backends::huggingface::{GeneratedText, GenerationParameters, GenerationRequest, HuggingFaceBackend};
pub use backends::openai::{ChatMessage, ChatRequest, ChatResponse, OpenAiBackend};
