//! Pure domain types and functions for the Lectern client core.
//!
//! No I/O lives here: statuses, language availability, the artifact and
//! version model, lecture analysis results, and validation helpers. The
//! gateway and orchestration crates build on these types.

pub mod artifact;
pub mod error;
pub mod language;
pub mod results;
pub mod status;
pub mod types;
pub mod version;

pub use error::CoreError;
