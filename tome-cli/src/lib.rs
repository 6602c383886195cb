//! Library side of the `tome` binary.
//!
//! The binary only parses arguments and handles I/O; the work of driving a
//! [`tome_markup::TextRenderer`] over a whole document lives in [`commands`] so it
//! can be tested without spawning a process.

pub mod commands;
