// src/cli.rs

use crate::config::{Config, ConfigError};
use clap::Parser;
use std::path::PathBuf;

/// Turn vocabulary word lists into short instructional videos
#[derive(Parser, Debug)]
#[command(name = "vocab_clips", version, about)]
pub struct Args {
    /// Words to process, overriding the materials directory
    pub words: Vec<String>,

    /// Directory of .txt word lists
    #[arg(long, value_name = "DIR")]
    pub materials_dir: Option<PathBuf>,

    /// Directory for per-word intermediate artifacts
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Directory for batched output videos
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Number of per-word videos per batch video
    #[arg(long, value_name = "N")]
    pub batch_size: Option<usize>,

    /// Silence between narration segments, in seconds
    #[arg(long, value_name = "SECS")]
    pub pause_seconds: Option<f64>,

    /// Regenerate artifacts even when cached copies exist
    #[arg(long)]
    pub force: bool,

    /// Produce per-word videos only, without batch concatenation
    #[arg(long)]
    pub skip_batching: bool,
}

impl Args {
    /// Layer CLI flags over the environment-derived config
    pub fn into_config(self) -> Result<Config, ConfigError> {
        let mut config = Config::from_env()?;
        if let Some(dir) = self.materials_dir {
            config.materials_dir = dir;
        }
        if let Some(dir) = self.cache_dir {
            config.cache_dir = dir;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(n) = self.batch_size {
            config.batch_size = n;
        }
        if let Some(secs) = self.pause_seconds {
            config.pause_seconds = secs;
        }
        config.force = self.force;
        config.skip_batching = self.skip_batching;
        config.words = self.words;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_positional_words_and_flags_parse() {
        let args = Args::parse_from([
            "vocab_clips",
            "apple",
            "banana",
            "--batch-size",
            "5",
            "--force",
        ]);
        assert_eq!(args.words, vec!["apple", "banana"]);
        assert_eq!(args.batch_size, Some(5));
        assert!(args.force);
        assert!(!args.skip_batching);
    }

    #[test]
    fn test_defaults_are_unset() {
        let args = Args::parse_from(["vocab_clips"]);
        assert!(args.words.is_empty());
        assert!(args.materials_dir.is_none());
        assert!(args.batch_size.is_none());
    }
}
