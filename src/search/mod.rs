//! Question search: filter state, predicate evaluation and SQL construction
//!
//! A search combines three optional restrictions with logical AND:
//! - tag membership ("any of" the selected names)
//! - resolved state (tri-state, unset means no restriction)
//! - keyword (case-insensitive substring of title or content)

pub mod filter;
pub mod predicate;
pub mod query;


pub use filter::{FilterState, ResolvedFilter};
pub use predicate::{FilterPlan, Predicate};
