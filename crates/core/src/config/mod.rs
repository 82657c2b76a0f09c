//! Configuration loading and schema definitions
//!
//! Tunables shared by the engine crates and the command-line front-end.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
