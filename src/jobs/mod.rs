//! Extraction job state and execution
//!
//! [`table`] owns the volatile per-feature status map; [`executor`] runs the
//! fetch → normalize → store sequence for one feature and publishes the
//! terminal status back into the table.

pub mod executor;
pub mod table;

pub use table::{Registration, StatusTable};
