//! Rendering tests
//!
//! End-to-end checks of text going through the renderer with different contexts.

mod examples;
mod passage;
mod table;
