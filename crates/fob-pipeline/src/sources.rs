//! File discovery for [`SourceSet`]s.

use crate::config::SourceSet;
use std::io;
use std::path::PathBuf;
use walkdir::WalkDir;

/// List the files belonging to `set`, sorted by path.
///
/// A missing directory yields an empty list.
pub fn collect(set: &SourceSet) -> io::Result<Vec<PathBuf>> {
    if !set.dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut walker = WalkDir::new(&set.dir).min_depth(1).follow_links(true);
    if !set.recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(io::Error::other)?;
        if entry.file_type().is_file() && set.matches(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: PathBuf) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_collect_recursive_filters_extensions() {
        let temp = TempDir::new().unwrap();
        touch(temp.path().join("icon.png"));
        touch(temp.path().join("img/logo.svg"));
        touch(temp.path().join("index.styl"));

        let set = SourceSet {
            dir: temp.path().to_path_buf(),
            extensions: vec!["png".into(), "svg".into()],
            recursive: true,
        };

        let files = collect(&set).unwrap();
        assert_eq!(
            files,
            vec![temp.path().join("icon.png"), temp.path().join("img/logo.svg")]
        );
    }

    #[test]
    fn test_collect_flat_skips_subdirectories() {
        let temp = TempDir::new().unwrap();
        touch(temp.path().join("index.html"));
        touch(temp.path().join("nested/page.html"));
        touch(temp.path().join("Makefile"));

        let set = SourceSet {
            dir: temp.path().to_path_buf(),
            extensions: vec![],
            recursive: false,
        };

        assert_eq!(collect(&set).unwrap(), vec![temp.path().join("index.html")]);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let set = SourceSet {
            dir: PathBuf::from("/definitely/not/here"),
            extensions: vec![],
            recursive: true,
        };
        assert!(collect(&set).unwrap().is_empty());
    }
}
