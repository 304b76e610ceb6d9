//! Background tasks module
//!
//! This module contains the tasks a mounted widget runs alongside its host.

pub mod completion;
pub mod tick_source;

// Re-export main types
pub use completion::{completion_task, CompletionCallback};
pub use tick_source::TickSource;
