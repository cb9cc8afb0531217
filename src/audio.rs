// src/audio.rs

use crate::utils::{execute_ffmpeg_command, validate_input_files};
use std::process::Command;

/// Build the filter graph that joins `input_count` audio streams, padding
/// every stream except the last with `pause_secs` of trailing silence
pub fn build_narration_filter(input_count: usize, pause_secs: f64) -> String {
    let mut filter = String::new();
    let mut labels = Vec::with_capacity(input_count);

    for i in 0..input_count {
        if i + 1 < input_count && pause_secs > 0.0 {
            filter.push_str(&format!("[{i}:a]apad=pad_dur={pause_secs}[p{i}];"));
            labels.push(format!("[p{i}]"));
        } else {
            labels.push(format!("[{i}:a]"));
        }
    }

    filter.push_str(&labels.concat());
    filter.push_str(&format!("concat=n={input_count}:v=0:a=1[out]"));
    filter
}

/// Join narration MP3 segments into one file with a silence gap after each
/// segment except the last
pub fn combine_narration(
    segments: &[String],
    output_file: &str,
    pause_secs: f64,
) -> Result<String, String> {
    if segments.is_empty() {
        return Err("No narration segments to combine".to_string());
    }
    validate_input_files(segments)?;

    let filter = build_narration_filter(segments.len(), pause_secs);

    let mut command = Command::new("ffmpeg");
    for segment in segments {
        command.arg("-i").arg(segment);
    }
    command
        .arg("-filter_complex")
        .arg(&filter)
        .arg("-map")
        .arg("[out]")
        .arg("-c:a")
        .arg("libmp3lame")
        .arg("-q:a")
        .arg("4")
        .arg("-y")
        .arg(output_file);

    execute_ffmpeg_command(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_pads_all_but_last() {
        let filter = build_narration_filter(3, 2.0);
        assert_eq!(
            filter,
            "[0:a]apad=pad_dur=2[p0];[1:a]apad=pad_dur=2[p1];[p0][p1][2:a]concat=n=3:v=0:a=1[out]"
        );
    }

    #[test]
    fn test_filter_single_segment_has_no_pad() {
        let filter = build_narration_filter(1, 2.0);
        assert_eq!(filter, "[0:a]concat=n=1:v=0:a=1[out]");
    }

    #[test]
    fn test_filter_zero_pause_has_no_pad() {
        let filter = build_narration_filter(2, 0.0);
        assert_eq!(filter, "[0:a][1:a]concat=n=2:v=0:a=1[out]");
    }

    #[test]
    fn test_combine_rejects_empty_segment_list() {
        let err = combine_narration(&[], "/tmp/out.mp3", 2.0).unwrap_err();
        assert!(err.contains("No narration segments"));
    }
}
