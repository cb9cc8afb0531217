// src/types.rs

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Definition and example sentence generated for a single vocabulary word
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WordInfo {
    pub word: String,
    pub definition: String,
    pub example: String,
}

/// Per-word artifact paths inside the cache directory. Every stage output is
/// keyed by the word so a re-run can reuse whatever already exists.
#[derive(Debug, Clone)]
pub struct WordArtifacts {
    pub dir: PathBuf,
    pub word_info: PathBuf,
    pub image: PathBuf,
    pub slide_html: PathBuf,
    pub slide_png: PathBuf,
    pub narration: PathBuf,
    pub video: PathBuf,
}

impl WordArtifacts {
    pub fn new(cache_dir: &Path, key: &str) -> Self {
        let dir = cache_dir.join(key);
        Self {
            word_info: dir.join("word_info.json"),
            image: dir.join("image.png"),
            slide_html: dir.join("slide.html"),
            slide_png: dir.join("slide.png"),
            narration: dir.join("narration.mp3"),
            video: dir.join("word.mp4"),
            dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_artifacts_live_under_cache_key() {
        let artifacts = WordArtifacts::new(Path::new("/tmp/cache"), "apple");
        assert_eq!(artifacts.dir, Path::new("/tmp/cache/apple"));
        assert_eq!(artifacts.video, Path::new("/tmp/cache/apple/word.mp4"));
        assert_eq!(artifacts.word_info, Path::new("/tmp/cache/apple/word_info.json"));
    }
}
