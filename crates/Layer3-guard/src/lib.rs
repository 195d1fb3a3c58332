//! # sealtrace-guard
//!
//! Instrumented invocation layer for SealTrace.
//! Wraps backend calls with the sovereignty gate, wall-clock timing, and
//! unconditional audit delivery to the compliance ledger.
//!
//! ## Features
//! - Policy gate applied before every backend interaction
//! - Single-shot and streamed invocation shapes
//! - Awaited or detached (bounded, best-effort) audit delivery
//! - Backend responses and errors pass through unmodified
//!
//! ## Usage
//!
//! ```ignore
//! use sealtrace_foundation::{LedgerConfig, RegionPolicy};
//! use sealtrace_guard::{CallMetadata, ComplianceGuard, GuardConfig};
//! use sealtrace_ledger::LedgerClient;
//! use sealtrace_provider::{ChatMessage, ChatRequest, OpenAiBackend};
//! use std::sync::Arc;
//!
//! let ledger = Arc::new(LedgerClient::open(LedgerConfig::from_env())?);
//! let guard = ComplianceGuard::new(
//!     RegionPolicy::new(["eu-"]),
//!     ledger,
//!     GuardConfig::new("chat-agent"),
//! )?;
//!
//! let backend = OpenAiBackend::new(api_key, "gpt-4o")?;
//! let request = ChatRequest::new(vec![ChatMessage::user("hello")]);
//! let invoked = guard
//!     .invoke(
//!         &backend,
//!         &request,
//!         CallMetadata::new("openai_chat_completion", "eu-west-1"),
//!     )
//!     .await?;
//! println!("{:?}", invoked.response.text());
//! ```

pub mod error;
pub mod guard;
pub mod metadata;

// Core types
pub use guard::{
    AuditOutcome, ComplianceGuard, DeliveryMode, GuardConfig, GuardedStream, Invoked,
};
pub use metadata::CallMetadata;

// Error
pub use error::GuardError;
