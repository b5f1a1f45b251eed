//! Catalog services
//!
//! - [assembler]: projects loaded spell aggregates into one language
//! - [catalog]: runs listing and filter requests against the database
//! - [logging]: tracing subscriber setup

pub mod assembler;
pub mod catalog;
pub mod logging;

pub use assembler::ProjectedSpell;
pub use catalog::{CatalogError, CatalogService, CatalogStatus, FilterOptions};
pub use logging::init_tracing;
