// src/slide.rs - Renders the per-word slide and rasterizes it to PNG
//
// The slide is a single self-contained HTML page (illustration embedded as a
// base64 data URI) converted with LibreOffice to PDF and then with pdftoppm
// to PNG, so no intermediate file references leak out of the cache directory.

use crate::types::WordInfo;
use crate::utils::execute_tool_command;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Write the slide HTML for a word: title across the top, illustration on
/// the left, definition and example on the right.
pub fn write_slide_html(
    word_info: &WordInfo,
    image_bytes: &[u8],
    out_html: &Path,
) -> Result<(), String> {
    let html = render_slide_html(word_info, image_bytes);
    std::fs::write(out_html, html)
        .map_err(|e| format!("Failed to write slide {}: {}", out_html.display(), e))
}

pub fn render_slide_html(word_info: &WordInfo, image_bytes: &[u8]) -> String {
    let image_uri = format!("data:image/png;base64,{}", BASE64.encode(image_bytes));
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<style>
  @page {{ size: 297mm 210mm; margin: 10mm; }}
  body {{ font-family: Helvetica, Arial, sans-serif; margin: 40px; }}
  h1 {{ font-size: 54pt; margin-bottom: 24px; }}
  table {{ width: 100%; border-collapse: collapse; }}
  td {{ vertical-align: top; }}
  td.text {{ font-size: 22pt; padding-left: 30px; }}
  p {{ margin-top: 0; margin-bottom: 24px; }}
  img {{ width: 450px; height: 450px; }}
</style>
</head>
<body>
<h1>{word}</h1>
<table>
<tr>
<td><img src="{image}" alt="{word}"></td>
<td class="text">
<p>{definition}</p>
<p>{example}</p>
</td>
</tr>
</table>
</body>
</html>
"#,
        word = escape_html(&word_info.word),
        definition = escape_html(&word_info.definition),
        example = escape_html(&word_info.example),
        image = image_uri,
    )
}

/// Convert the slide HTML to a PNG: LibreOffice renders it to PDF, pdftoppm
/// rasterizes the single page. The intermediate PDF is removed.
pub fn convert_slide_to_png(
    html_path: &Path,
    out_png: &Path,
    soffice_bin: &str,
) -> Result<PathBuf, String> {
    let workdir = html_path
        .parent()
        .ok_or_else(|| format!("Slide path has no parent: {}", html_path.display()))?;
    let stem = html_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| format!("Slide path has no file stem: {}", html_path.display()))?;

    let mut soffice = Command::new(soffice_bin);
    soffice
        .arg("--headless")
        .arg("--convert-to")
        .arg("pdf")
        .arg(html_path)
        .arg("--outdir")
        .arg(workdir);
    execute_tool_command(soffice)?;

    let pdf_path = workdir.join(format!("{}.pdf", stem));
    if !pdf_path.exists() {
        return Err(format!(
            "LibreOffice did not produce {}",
            pdf_path.display()
        ));
    }

    // pdftoppm appends .png to the root prefix it is given
    let png_root = out_png.with_extension("");
    let mut pdftoppm = Command::new("pdftoppm");
    pdftoppm
        .arg("-png")
        .arg("-singlefile")
        .arg("-r")
        .arg("150")
        .arg(&pdf_path)
        .arg(&png_root);
    let result = execute_tool_command(pdftoppm);
    std::fs::remove_file(&pdf_path).ok();
    result?;

    if !out_png.exists() {
        return Err(format!("pdftoppm did not produce {}", out_png.display()));
    }
    Ok(out_png.to_path_buf())
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_info() -> WordInfo {
        WordInfo {
            word: "apple".to_string(),
            definition: "A round fruit.".to_string(),
            example: "For example, I ate an apple.".to_string(),
        }
    }

    #[test]
    fn test_slide_html_contains_word_and_embedded_image() {
        let html = render_slide_html(&sample_info(), b"\x89PNG fake");
        assert!(html.contains("<h1>apple</h1>"));
        assert!(html.contains("data:image/png;base64,"));
        assert!(html.contains("A round fruit."));
        assert!(html.contains("For example, I ate an apple."));
        // landscape page geometry; without it LibreOffice renders portrait A4
        assert!(html.contains("@page { size: 297mm 210mm;"));
    }

    #[test]
    fn test_slide_html_escapes_markup() {
        let mut info = sample_info();
        info.definition = "Smaller than 1 < 2 & \"big\"".to_string();
        let html = render_slide_html(&info, b"png");
        assert!(html.contains("1 &lt; 2 &amp; &quot;big&quot;"));
        assert!(!html.contains("1 < 2"));
    }

    #[test]
    fn test_write_slide_html_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slide.html");
        write_slide_html(&sample_info(), b"png", &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("<h1>apple</h1>"));
    }
}
