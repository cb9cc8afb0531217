// src/wordlist.rs - Word list loading from the materials directory

use std::path::Path;

/// Case-insensitive dedup preserving first-seen order. Applied to every
/// word source, including words passed directly on the command line.
pub fn dedup_words(words: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for word in words {
        if seen.insert(word.to_lowercase()) {
            out.push(word);
        }
    }
    out
}

/// Parse a word list: one word per line, trimmed, blank lines and `#`
/// comments skipped, case-insensitive dedup preserving first-seen order.
pub fn parse_word_list(contents: &str) -> Vec<String> {
    dedup_words(
        contents
            .lines()
            .map(str::trim)
            .filter(|word| !word.is_empty() && !word.starts_with('#'))
            .map(String::from),
    )
}

/// Load a single word list file
pub fn load_word_list(path: &Path) -> Result<Vec<String>, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read word list {}: {}", path.display(), e))?;
    Ok(parse_word_list(&contents))
}

/// Load and merge every `.txt` word list in the materials directory.
/// Files are visited in name order so repeated runs see the same sequence.
pub fn load_materials_dir(dir: &Path) -> Result<Vec<String>, String> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| format!("Failed to read materials directory {}: {}", dir.display(), e))?;

    let mut files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|ext| ext.to_str()) == Some("txt"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(format!(
            "No .txt word lists found in materials directory {}",
            dir.display()
        ));
    }

    let mut words = Vec::new();
    for file in &files {
        words.extend(load_word_list(file)?);
    }
    Ok(dedup_words(words))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_skips_blanks_and_comments() {
        let words = parse_word_list("apple\n\n# fruit section\nbanana\n  cherry  \n");
        assert_eq!(words, vec!["apple", "banana", "cherry"]);
    }

    #[test]
    fn test_parse_dedups_case_insensitively() {
        let words = parse_word_list("Apple\napple\nAPPLE\nbanana");
        assert_eq!(words, vec!["Apple", "banana"]);
    }

    #[test]
    fn test_dedup_words_covers_command_line_input() {
        let words = dedup_words(["apple", "Apple", "banana", "APPLE"].map(String::from));
        assert_eq!(words, vec!["apple", "banana"]);
    }

    #[test]
    fn test_materials_dir_merges_in_file_name_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = std::fs::File::create(dir.path().join("b_animals.txt")).unwrap();
        writeln!(b, "zebra\ncat").unwrap();
        let mut a = std::fs::File::create(dir.path().join("a_fruit.txt")).unwrap();
        writeln!(a, "apple\ncat").unwrap();
        // non-txt files are ignored
        std::fs::File::create(dir.path().join("notes.md")).unwrap();

        let words = load_materials_dir(dir.path()).unwrap();
        assert_eq!(words, vec!["apple", "cat", "zebra"]);
    }

    #[test]
    fn test_empty_materials_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_materials_dir(dir.path()).unwrap_err();
        assert!(err.contains("No .txt word lists"));
    }
}
