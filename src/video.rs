// src/video.rs

use crate::utils::{execute_ffmpeg_command, execute_ffprobe_command, validate_input_files};
use std::process::Command;

/// Compose a per-word video: the slide PNG looped for the duration of the
/// narration audio
pub fn compose_still_video(
    image_file: &str,
    audio_file: &str,
    output_file: &str,
) -> Result<String, String> {
    let mut command = Command::new("ffmpeg");
    command
        .arg("-loop")
        .arg("1")
        .arg("-i")
        .arg(image_file)
        .arg("-i")
        .arg(audio_file)
        .arg("-c:v")
        .arg("libx264")
        .arg("-tune")
        .arg("stillimage")
        .arg("-r")
        .arg("24")
        .arg("-c:a")
        .arg("aac")
        .arg("-b:a")
        .arg("192k")
        // even dimensions for yuv420p, whatever size the slide rasterized to
        .arg("-vf")
        .arg("scale=trunc(iw/2)*2:trunc(ih/2)*2")
        .arg("-pix_fmt")
        .arg("yuv420p")
        .arg("-shortest")
        .arg("-y")
        .arg(output_file);

    execute_ffmpeg_command(command)
}

/// Concatenate videos with the concat demuxer (stream copy, no re-encode).
/// All inputs come from the same composition settings so copy is safe.
pub fn merge_videos(input_files: &[String], output_file: &str) -> Result<String, String> {
    validate_input_files(input_files)?;

    let concat_list = input_files
        .iter()
        .map(|f| {
            let absolute_path = std::fs::canonicalize(f)
                .map_err(|e| format!("Failed to resolve {}: {}", f, e))?;
            Ok(format!("file '{}'", absolute_path.display()))
        })
        .collect::<Result<Vec<String>, String>>()?
        .join("\n");
    let concat_file_path = format!("{}.txt", output_file);
    std::fs::write(&concat_file_path, concat_list).map_err(|e| e.to_string())?;

    let mut command = Command::new("ffmpeg");
    command
        .arg("-f")
        .arg("concat")
        .arg("-safe")
        .arg("0")
        .arg("-i")
        .arg(&concat_file_path)
        .arg("-c")
        .arg("copy")
        .arg("-y")
        .arg(output_file);

    let result = execute_ffmpeg_command(command);
    std::fs::remove_file(concat_file_path).ok();
    result
}

/// Duration of a media file in seconds, via ffprobe
pub fn probe_duration(file_path: &str) -> Result<f64, String> {
    let output = execute_ffprobe_command(&[
        "-v",
        "quiet",
        "-show_entries",
        "format=duration",
        "-of",
        "csv=p=0",
        file_path,
    ])?;
    parse_duration(&output)
}

fn parse_duration(output: &str) -> Result<f64, String> {
    let trimmed = output.trim();
    trimmed
        .parse::<f64>()
        .map_err(|e| format!("Failed to parse ffprobe duration '{}': {}", trimmed, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_rejects_missing_inputs() {
        let err = merge_videos(&["/nonexistent/a.mp4".to_string()], "/tmp/out.mp4").unwrap_err();
        assert!(err.contains("does not exist"));
    }

    #[test]
    fn test_parse_duration_accepts_ffprobe_csv_output() {
        assert_eq!(parse_duration("12.483000\n").unwrap(), 12.483);
        assert!(parse_duration("N/A\n").is_err());
        assert!(parse_duration("").is_err());
    }
}
