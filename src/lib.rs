//! docpack library: archive codec, graph model and visualization graph construction.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod server;
