//! Completion backend abstractions for Lil Weirdo.
//!
//! - `CompletionBackend`: RPITIT trait for concrete backends
//! - `BoxCompletionBackend`: object-safe wrapper for dynamic dispatch
//! - `Templater`: prompt template plus the per-request ephemeral model scope
//! - `templates`: the built-in persona templates

pub mod backend;
pub mod box_backend;
pub mod templater;
pub mod templates;
