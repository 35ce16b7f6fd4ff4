//! Domain types and pure calculations for the bikeshare explorer.
//!
//! Holds the trip-record model, filter parameters, the city registry,
//! frequency/mode helpers and display formatting. No I/O happens here.

pub mod calculations;
pub mod error;
pub mod formatting;
pub mod models;
pub mod registry;
