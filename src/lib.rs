pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod processors;
pub mod query;
pub mod readers;
pub mod utils;

pub use error::{PipelineError, Result};
