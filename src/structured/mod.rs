//! Structured response engine.
//!
//! One call sends the instruction with the target schema, cleans the reply,
//! parses it as JSON, and validates it. Retrying is composed on top with
//! [`RetryPolicy`](crate::retry::RetryPolicy) rather than built in.

pub mod clean;
pub mod engine;
pub mod outcome;
pub mod prompt;

pub use clean::{Cleaner, clean_response};
pub use engine::{build_request, extract, extract_with_retry, get_structured_response, parse_reply};
pub use outcome::{ErrorContext, Structured, StructuredOutcome};
