use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TESTCASE_RE: Regex = Regex::new(r"^id_(\d+)\.txt$").unwrap();
    static ref LEVEL_RE: Regex = Regex::new(r"level_\d+$").unwrap();
}

/// The id of a testcase file named `id_<n>.txt`.
pub fn testcase_id(path: impl AsRef<Path>) -> Option<usize> {
    let name = path.as_ref().file_name()?.to_str()?;
    TESTCASE_RE.captures(name)?.get(1)?.as_str().parse().ok()
}

/// Whether `path` names a directory of testcases, i.e. ends in `level_<n>`.
pub fn is_level_dir(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| LEVEL_RE.is_match(name))
}

pub fn testcase_path(dir: impl AsRef<Path>, id: usize) -> PathBuf {
    PathBuf::from(dir.as_ref()).join(format!("id_{id}.txt"))
}

/// The sibling testcase with the preceding id, if there is one.
pub fn previous_testcase(path: impl AsRef<Path>) -> Option<PathBuf> {
    let path = path.as_ref();
    let id = testcase_id(path)?.checked_sub(1)?;
    Some(testcase_path(path.parent()?, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_testcase_id() {
        assert_eq!(testcase_id("data/level_2/id_17.txt"), Some(17));
        assert_eq!(testcase_id("id_0.txt"), Some(0));
        assert_eq!(testcase_id("data/level_2/id_17.txt.bak"), None);
        assert_eq!(testcase_id("data/level_2/xid_1.txt"), None);
        assert_eq!(testcase_id("data/level_2"), None);
    }

    #[test]
    fn test_is_level_dir() {
        assert!(is_level_dir("data/level_3"));
        assert!(is_level_dir("data/train_level_12"));
        assert!(!is_level_dir("data/level_3/id_0.txt"));
        assert!(!is_level_dir("data/levels"));
    }

    #[test]
    fn test_previous_testcase() {
        assert_eq!(
            previous_testcase("data/level_1/id_5.txt"),
            Some(PathBuf::from("data/level_1/id_4.txt"))
        );
        assert_eq!(previous_testcase("data/level_1/id_0.txt"), None);
        assert_eq!(previous_testcase("data/level_1/notes.txt"), None);
    }
}
