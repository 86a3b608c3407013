//! Debug dump directory naming

use std::path::{Path, PathBuf};

/// Longest case name used verbatim as a directory name (eCryptFS limit)
pub const MAX_CASE_DIR_NAME: usize = 142;

const KEEP: usize = 70;

/// Directory that receives the debug bundle for one invocation.
///
/// Whole-file runs dump into `base/<fixture file stem>`. Single-case runs
/// dump into `base/<fixture file stem>/<case name>`, with `/` replaced by
/// `-` and over-long names shortened to their first and last 70 characters.
pub fn debug_dump_dir(
    base: &Path,
    fixture_path: &Path,
    fixture_name: Option<&str>,
    single_case: bool,
) -> PathBuf {
    let stem = fixture_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = base.join(stem);
    match fixture_name {
        Some(name) if single_case => dir.join(shorten(name).replace('/', "-")),
        _ => dir,
    }
}

fn shorten(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= MAX_CASE_DIR_NAME {
        return name.to_string();
    }
    let head: String = chars[..KEEP].iter().collect();
    let tail: String = chars[chars.len() - KEEP..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_file() {
        let dir = debug_dump_dir(
            Path::new("/dump"),
            Path::new("/fixtures/cancun/blobs.json"),
            Some("case"),
            false,
        );
        assert_eq!(dir, PathBuf::from("/dump/blobs"));
    }

    #[test]
    fn test_single_case_replaces_slashes() {
        let dir = debug_dump_dir(
            Path::new("/dump"),
            Path::new("/fixtures/blobs.json"),
            Some("tests/cancun/test_blobs.py::test_valid"),
            true,
        );
        assert_eq!(
            dir,
            PathBuf::from("/dump/blobs/tests-cancun-test_blobs.py::test_valid")
        );
    }

    #[test]
    fn test_single_case_without_name() {
        let dir = debug_dump_dir(Path::new("/dump"), Path::new("/f/x.json"), None, true);
        assert_eq!(dir, PathBuf::from("/dump/x"));
    }

    #[test]
    fn test_long_name_shortened() {
        let name = format!("{}{}", "a".repeat(100), "b".repeat(100));
        let dir = debug_dump_dir(Path::new("/d"), Path::new("/f/x.json"), Some(&name), true);
        let leaf = dir.file_name().unwrap().to_str().unwrap().to_string();
        assert_eq!(leaf.len(), KEEP * 2 + 3);
        assert!(leaf.starts_with(&"a".repeat(KEEP)));
        assert!(leaf.ends_with(&"b".repeat(KEEP)));
        assert!(leaf.contains("..."));
    }

    #[test]
    fn test_name_at_limit_kept() {
        let name = "c".repeat(MAX_CASE_DIR_NAME);
        let dir = debug_dump_dir(Path::new("/d"), Path::new("/f/x.json"), Some(&name), true);
        assert_eq!(dir.file_name().unwrap().to_str().unwrap(), name);
    }
}
