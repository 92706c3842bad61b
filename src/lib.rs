pub mod backend;
pub mod config;
pub mod errors;
pub mod extraction;
pub mod pipeline;
pub mod tree;
pub mod types;
