//! pl-core: stable foundation for pressloop.
//!
//! Contains:
//! - numeric (Real + tolerances + float guards)
//! - units (uom SI types + constructors for the quantities the loop reports)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;
