// lib.rs - Main library file that exports all modules
pub mod audio;
pub mod claude_client;
pub mod cli;
pub mod config;
pub mod openai_client;
pub mod pipeline;
pub mod slide;
pub mod types;
pub mod utils;
pub mod video;
pub mod wordlist;

pub use config::Config;
pub use pipeline::{run, PipelineError, RunSummary};
pub use types::{WordArtifacts, WordInfo};
