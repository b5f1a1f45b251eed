//! Spell listing query composition
//!
//! - [request]: the validated request descriptor (language, sort, filters, page)
//! - [sort]: the closed sort-key allow-list
//! - [builder]: compiles a request into parameterized SQL with de-duplicated joins

pub mod builder;
pub mod request;
pub mod sort;

pub use builder::SpellQuery;
pub use request::{Language, SpellListRequest};
pub use sort::SortKey;
