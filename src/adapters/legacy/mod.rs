//! Legacy → Graph adapter

mod convert;

pub use convert::legacy_to_graph;
