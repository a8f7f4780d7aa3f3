//! praxis-core
//!
//! Pure value types for the clinical decision support engine.
//! No engine logic lives here: this is the shared vocabulary between the
//! calling application and the scoring/optimization crates.

pub mod error;
pub mod models;
pub mod time;
