//! Core domain model for refrain.
//!
//! This crate defines the play-event model, lyrics lookup results and
//! sentiment scores, the streaming-history loader, and the aggregate
//! listening reports computed over loaded events.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod history;
pub mod model;
pub mod report;

pub use error::{Error, Result};
