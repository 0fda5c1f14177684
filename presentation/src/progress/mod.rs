//! Progress reporting while endpoints settle

pub mod reporter;
