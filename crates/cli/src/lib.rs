//! Terminal output helpers for ClearWay tools
//!
//! Provides shared CLI functionality:
//! - Status messages and engine error rendering
//! - Report and route lines for nearby alerts and route plans
//! - Spinners for network fetches

#![warn(missing_docs)]

pub mod output;
pub mod progress;
