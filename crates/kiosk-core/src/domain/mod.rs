//! Pure domain logic for the lockdown controller.
//!
//! Nothing in this module touches the OS; everything is a function of its
//! inputs and is exercised directly by unit tests.

pub mod policy;
pub mod report;
