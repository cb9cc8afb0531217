// utils.rs - Subprocess helpers for ffmpeg, ffprobe, and document tools
use std::path::Path;
use std::process::Command;

/// Execute an FFmpeg command with error handling
pub fn execute_ffmpeg_command(mut command: Command) -> Result<String, String> {
    tracing::debug!("Executing FFmpeg: {:?}", command);

    let output = command
        .output()
        .map_err(|e| format!("Failed to execute FFmpeg: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("FFmpeg error: {}", stderr));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Execute FFprobe for media analysis
pub fn execute_ffprobe_command(args: &[&str]) -> Result<String, String> {
    let output = Command::new("ffprobe")
        .args(args)
        .output()
        .map_err(|e| format!("Failed to execute FFprobe: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("FFprobe error: {}", stderr));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Execute an arbitrary external tool (soffice, pdftoppm) with error handling
pub fn execute_tool_command(mut command: Command) -> Result<String, String> {
    tracing::debug!("Executing tool: {:?}", command);

    let program = command.get_program().to_string_lossy().to_string();
    let output = command
        .output()
        .map_err(|e| format!("Failed to execute {}: {}", program, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("{} error: {}", program, stderr));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Check that every external binary the pipeline shells out to is available
pub fn check_tools_available(soffice_bin: &str) -> Result<(), String> {
    for (bin, version_arg) in [
        ("ffmpeg", "-version"),
        ("ffprobe", "-version"),
        ("pdftoppm", "-v"),
        (soffice_bin, "--version"),
    ] {
        Command::new(bin)
            .arg(version_arg)
            .output()
            .map_err(|_| format!("{} not found. Please install it.", bin))?;
    }
    Ok(())
}

/// Validate that all input files exist
pub fn validate_input_files(files: &[String]) -> Result<(), String> {
    for file in files {
        if !Path::new(file).exists() {
            return Err(format!("Input file does not exist: {}", file));
        }
    }
    Ok(())
}

/// Map an arbitrary word to a filesystem-safe cache key: lowercase, with
/// runs of non-alphanumeric characters collapsed to a single '-'
pub fn cache_key(word: &str) -> String {
    let mut key = String::with_capacity(word.len());
    let mut pending_dash = false;
    for c in word.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !key.is_empty() {
                key.push('-');
            }
            pending_dash = false;
            for lc in c.to_lowercase() {
                key.push(lc);
            }
        } else {
            pending_dash = true;
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_lowercases_and_collapses() {
        assert_eq!(cache_key("Apple"), "apple");
        assert_eq!(cache_key("ice cream"), "ice-cream");
        assert_eq!(cache_key("  mother-in-law!  "), "mother-in-law");
        assert_eq!(cache_key("don't"), "don-t");
    }

    #[test]
    fn test_cache_key_strips_leading_separator() {
        assert_eq!(cache_key("...dot"), "dot");
        assert_eq!(cache_key(""), "");
    }

    #[test]
    fn test_validate_input_files_reports_missing() {
        let err = validate_input_files(&["/nonexistent/foo.mp4".to_string()]).unwrap_err();
        assert!(err.contains("/nonexistent/foo.mp4"));
    }
}
