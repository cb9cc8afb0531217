// src/pipeline.rs - Sequential per-word stage orchestration and batching
//
// Every stage writes its artifact into the word's cache directory and is
// skipped on re-runs when the artifact already exists. A word that fails is
// logged and left out of batching; it does not abort the run.

use crate::audio::combine_narration;
use crate::claude_client::ClaudeClient;
use crate::config::{Config, ConfigError};
use crate::openai_client::{build_image_prompt, OpenAiClient};
use crate::slide::{convert_slide_to_png, write_slide_html};
use crate::types::{WordArtifacts, WordInfo};
use crate::utils::cache_key;
use crate::video::{compose_still_video, merge_videos, probe_duration};
use crate::wordlist::{dedup_words, load_materials_dir};
use std::path::{Path, PathBuf};
use thiserror::Error;

const VOICE_ANNOUNCEMENT: &str = "shimmer";
const VOICE_DEFINITION: &str = "shimmer";
const VOICE_EXAMPLE: &str = "nova";

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Word list error: {0}")]
    WordList(String),
    #[error("Word info generation failed for '{word}': {message}")]
    WordInfo { word: String, message: String },
    #[error("Image generation failed for '{word}': {message}")]
    Image { word: String, message: String },
    #[error("Slide rendering failed for '{word}': {message}")]
    Slide { word: String, message: String },
    #[error("Narration failed for '{word}': {message}")]
    Narration { word: String, message: String },
    #[error("Video composition failed for '{word}': {message}")]
    Video { word: String, message: String },
    #[error("Batch merge failed for {output}: {message}")]
    Batch { output: String, message: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub words_completed: usize,
    pub words_failed: usize,
    pub batches_written: usize,
}

pub async fn run(config: &Config) -> Result<RunSummary, PipelineError> {
    config.validate()?;

    let words = if config.words.is_empty() {
        load_materials_dir(&config.materials_dir).map_err(PipelineError::WordList)?
    } else {
        dedup_words(config.words.iter().cloned())
    };
    tracing::info!("Loaded {} words", words.len());

    std::fs::create_dir_all(&config.cache_dir)?;
    std::fs::create_dir_all(&config.output_dir)?;

    let claude = ClaudeClient::new(config.anthropic_api_key.clone());
    let openai = OpenAiClient::new(config.openai_api_key.clone());

    let mut summary = RunSummary::default();
    let mut word_videos: Vec<String> = Vec::new();

    for word in &words {
        match process_word(&claude, &openai, config, word).await {
            Ok(video) => {
                summary.words_completed += 1;
                word_videos.push(video.display().to_string());
            }
            Err(e) => {
                summary.words_failed += 1;
                tracing::error!("Skipping word '{}': {}", word, e);
            }
        }
    }

    if config.skip_batching {
        tracing::info!(
            "Skipping batching; {} per-word videos in {}",
            word_videos.len(),
            config.cache_dir.display()
        );
        return Ok(summary);
    }

    summary.batches_written = render_batches(config, &word_videos)?;
    tracing::info!(
        "Done: {} words completed, {} failed, {} batches written",
        summary.words_completed,
        summary.words_failed,
        summary.batches_written
    );
    Ok(summary)
}

/// Run one word through all six stages, reusing cached artifacts
async fn process_word(
    claude: &ClaudeClient,
    openai: &OpenAiClient,
    config: &Config,
    word: &str,
) -> Result<PathBuf, PipelineError> {
    let key = cache_key(word);
    if key.is_empty() {
        return Err(PipelineError::WordList(format!(
            "Word '{}' has no usable characters",
            word
        )));
    }
    let artifacts = WordArtifacts::new(&config.cache_dir, &key);

    if artifacts.video.exists() && !config.force {
        tracing::info!("'{}': cached video found, skipping", word);
        return Ok(artifacts.video);
    }

    std::fs::create_dir_all(&artifacts.dir)?;
    tracing::info!("'{}': generating word info...", word);
    let word_info = stage_word_info(claude, config, word, &artifacts).await?;

    tracing::info!("'{}': rendering slide...", word);
    stage_slide(openai, config, &word_info, &artifacts).await?;

    tracing::info!("'{}': generating narration...", word);
    stage_narration(openai, config, &word_info, &artifacts).await?;

    tracing::info!("'{}': composing video...", word);
    compose_still_video(
        &artifacts.slide_png.display().to_string(),
        &artifacts.narration.display().to_string(),
        &artifacts.video.display().to_string(),
    )
    .map_err(|message| PipelineError::Video {
        word: word.to_string(),
        message,
    })?;

    tracing::info!("'{}': video ready at {}", word, artifacts.video.display());
    Ok(artifacts.video)
}

async fn stage_word_info(
    claude: &ClaudeClient,
    config: &Config,
    word: &str,
    artifacts: &WordArtifacts,
) -> Result<WordInfo, PipelineError> {
    if artifacts.word_info.exists() && !config.force {
        let cached = std::fs::read_to_string(&artifacts.word_info)?;
        if let Ok(info) = serde_json::from_str::<WordInfo>(&cached) {
            tracing::debug!("'{}': reusing cached word info", word);
            return Ok(info);
        }
        tracing::warn!("'{}': cached word info unreadable, regenerating", word);
    }

    let info = claude
        .generate_word_info(word)
        .await
        .map_err(|message| PipelineError::WordInfo {
            word: word.to_string(),
            message,
        })?;
    let json = serde_json::to_string_pretty(&info).map_err(|e| PipelineError::WordInfo {
        word: word.to_string(),
        message: e.to_string(),
    })?;
    std::fs::write(&artifacts.word_info, json)?;
    Ok(info)
}

async fn stage_slide(
    openai: &OpenAiClient,
    config: &Config,
    word_info: &WordInfo,
    artifacts: &WordArtifacts,
) -> Result<(), PipelineError> {
    if artifacts.slide_png.exists() && !config.force {
        tracing::debug!("'{}': reusing cached slide", word_info.word);
        return Ok(());
    }

    let image_bytes = if artifacts.image.exists() && !config.force {
        tracing::debug!("'{}': reusing cached image", word_info.word);
        std::fs::read(&artifacts.image)?
    } else {
        let prompt = build_image_prompt(word_info);
        let bytes = openai
            .generate_image(&prompt)
            .await
            .map_err(|message| PipelineError::Image {
                word: word_info.word.clone(),
                message,
            })?;
        std::fs::write(&artifacts.image, &bytes)?;
        bytes
    };

    write_slide_html(word_info, &image_bytes, &artifacts.slide_html).map_err(|message| {
        PipelineError::Slide {
            word: word_info.word.clone(),
            message,
        }
    })?;
    convert_slide_to_png(&artifacts.slide_html, &artifacts.slide_png, &config.soffice_bin)
        .map_err(|message| PipelineError::Slide {
            word: word_info.word.clone(),
            message,
        })?;
    Ok(())
}

async fn stage_narration(
    openai: &OpenAiClient,
    config: &Config,
    word_info: &WordInfo,
    artifacts: &WordArtifacts,
) -> Result<(), PipelineError> {
    if artifacts.narration.exists() && !config.force {
        tracing::debug!("'{}': reusing cached narration", word_info.word);
        return Ok(());
    }

    let segments = [
        (
            artifacts.dir.join("narration_word.mp3"),
            format!("The word is \"{}\" ...", word_info.word),
            VOICE_ANNOUNCEMENT,
        ),
        (
            artifacts.dir.join("narration_definition.mp3"),
            word_info.definition.clone(),
            VOICE_DEFINITION,
        ),
        (
            artifacts.dir.join("narration_example.mp3"),
            word_info.example.clone(),
            VOICE_EXAMPLE,
        ),
    ];

    let mut segment_paths = Vec::with_capacity(segments.len());
    for (path, text, voice) in &segments {
        if !path.exists() || config.force {
            let bytes = openai.text_to_speech(text, voice).await.map_err(|message| {
                PipelineError::Narration {
                    word: word_info.word.clone(),
                    message,
                }
            })?;
            std::fs::write(path, bytes)?;
        }
        segment_paths.push(path.display().to_string());
    }

    combine_narration(
        &segment_paths,
        &artifacts.narration.display().to_string(),
        config.pause_seconds,
    )
    .map_err(|message| PipelineError::Narration {
        word: word_info.word.clone(),
        message,
    })?;
    Ok(())
}

/// Chunk per-word videos into batches of `batch_size`, keeping input order.
/// The final partial batch is kept.
pub fn plan_batches<T: Clone>(items: &[T], batch_size: usize) -> Vec<Vec<T>> {
    if batch_size == 0 {
        return Vec::new();
    }
    items.chunks(batch_size).map(|c| c.to_vec()).collect()
}

pub fn batch_output_path(output_dir: &Path, index: usize) -> PathBuf {
    output_dir.join(format!("batch_{:03}.mp4", index + 1))
}

fn render_batches(config: &Config, word_videos: &[String]) -> Result<usize, PipelineError> {
    if word_videos.is_empty() {
        tracing::warn!("No per-word videos available; nothing to batch");
        return Ok(0);
    }

    let mut written = 0;
    for (index, batch) in plan_batches(word_videos, config.batch_size).iter().enumerate() {
        let output = batch_output_path(&config.output_dir, index);
        let output_str = output.display().to_string();

        if output.exists() && !config.force {
            tracing::info!("Batch {} already exists, skipping", output.display());
            continue;
        }

        tracing::info!("Merging {} videos into {}", batch.len(), output.display());
        merge_videos(batch, &output_str).map_err(|message| PipelineError::Batch {
            output: output_str.clone(),
            message,
        })?;
        written += 1;

        // batch duration should be close to the sum of its member durations
        let member_total: f64 = batch
            .iter()
            .filter_map(|v| probe_duration(v).ok())
            .sum();
        match probe_duration(&output_str) {
            Ok(batch_duration) => tracing::info!(
                "Batch {}: {:.1}s (members total {:.1}s)",
                output.display(),
                batch_duration,
                member_total
            ),
            Err(e) => tracing::warn!("Could not probe {}: {}", output.display(), e),
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_batches_keeps_order_and_partial_tail() {
        let items: Vec<i32> = (1..=7).collect();
        let batches = plan_batches(&items, 3);
        assert_eq!(batches, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
    }

    #[test]
    fn test_plan_batches_exact_multiple() {
        let items: Vec<i32> = (1..=6).collect();
        let batches = plan_batches(&items, 3);
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|b| b.len() == 3));
    }

    #[test]
    fn test_plan_batches_zero_size_yields_nothing() {
        assert!(plan_batches(&[1, 2, 3], 0).is_empty());
    }

    #[test]
    fn test_batch_output_path_is_one_based_and_padded() {
        let path = batch_output_path(Path::new("/out"), 0);
        assert_eq!(path, Path::new("/out/batch_001.mp4"));
        let path = batch_output_path(Path::new("/out"), 11);
        assert_eq!(path, Path::new("/out/batch_012.mp4"));
    }
}
