//! Output formatting for query results

pub mod console;
