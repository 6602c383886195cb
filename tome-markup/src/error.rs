//! Error types for context and markup operations

use std::fmt;

use crate::context::Citation;

/// Misuse of the context stack
#[derive(Debug, Clone, PartialEq)]
pub enum ContextError {
    /// `pop(true)` was called with no frame left to remove
    UnbalancedPop,
    /// The last frame was popped while citations were still pending
    UnresolvedCitations(Vec<Citation>),
    /// A citation was added while no frame was on the stack
    NoActiveFrame(String),
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextError::UnbalancedPop => write!(f, "Pop without a matching push"),
            ContextError::UnresolvedCitations(citations) => {
                let keys: Vec<&str> = citations.iter().map(|c| c.key.as_str()).collect();
                write!(
                    f,
                    "Context stack emptied with unresolved citations: {}",
                    keys.join(", ")
                )
            }
            ContextError::NoActiveFrame(key) => {
                write!(f, "Citation '{key}' added with no active frame")
            }
        }
    }
}

impl std::error::Error for ContextError {}

/// Malformed input that a composer could not process
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupError {
    /// The outer admonition markers were not where they were expected
    MalformedAdmonition(String),
}

impl fmt::Display for MarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkupError::MalformedAdmonition(msg) => write!(f, "Malformed admonition: {msg}"),
        }
    }
}

impl std::error::Error for MarkupError {}
