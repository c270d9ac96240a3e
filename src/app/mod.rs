pub mod dto;
pub mod engine;
