pub mod node;
pub mod edge;
pub mod graph;
pub mod documentation;
pub mod legacy;
pub mod archive;
pub mod classifier;
pub mod visualization;
pub mod builder;
pub mod index;
pub mod edits;
pub mod ports;
