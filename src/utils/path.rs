use glob::glob;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Build a matcher from the `.gitignore` files found under `root`
pub fn gitignore_matcher(root: &Path) -> Gitignore {
    let mut builder = GitignoreBuilder::new(root);

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_name() == ".gitignore")
    {
        if let Some(err) = builder.add(entry.path()) {
            log::warn!("Failed to read {}: {err}", entry.path().display());
        }
    }

    builder.build().unwrap_or_else(|err| {
        log::warn!("Invalid .gitignore under {}: {err}", root.display());
        Gitignore::empty()
    })
}

/// Expand files, directories and glob patterns into a sorted list of files.
/// Directories are walked recursively, skipping `.git` and, when
/// `respect_gitignore` is set, anything their `.gitignore` files exclude.
pub fn expand_paths(patterns: &[String], respect_gitignore: bool) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    for pattern in patterns {
        let is_glob = pattern.contains('*') || pattern.contains('?') || pattern.contains('[');

        if !is_glob {
            let path = PathBuf::from(pattern);
            if path.is_dir() {
                paths.extend(walk_dir(&path, respect_gitignore));
            } else if path.is_file() {
                paths.push(path);
            } else {
                log::warn!("Path not found: {pattern}");
            }
            continue;
        }

        match glob(pattern) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    if entry.is_file() {
                        paths.push(entry);
                    }
                }
            }
            Err(err) => log::warn!("Invalid pattern '{pattern}': {err}"),
        }
    }

    paths.sort();
    paths.dedup();
    paths
}

fn walk_dir(root: &Path, respect_gitignore: bool) -> Vec<PathBuf> {
    let gitignore = if respect_gitignore {
        gitignore_matcher(root)
    } else {
        Gitignore::empty()
    };

    WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| {
            entry.file_name() != ".git"
                && !gitignore
                    .matched_path_or_any_parents(entry.path(), entry.file_type().is_dir())
                    .is_ignore()
        })
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() && entry.file_name() != ".gitignore")
        .map(|entry| entry.into_path())
        .collect()
}

/// Where the rendering of `source` goes under `output_dir`: the source's
/// relative location is mirrored, with `extension` appended to its name
pub fn output_path(output_dir: &Path, source: &Path, extension: &str) -> PathBuf {
    let relative: PathBuf = source
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect();

    let mut file_name = relative.file_name().unwrap_or_default().to_os_string();
    file_name.push(".");
    file_name.push(extension);

    output_dir.join(relative.with_file_name(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_expand_paths() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let file1_path = dir_path.join("test1.c");
        let file2_path = dir_path.join("test2.c");
        let file3_path = dir_path.join("test3.js");

        fs::write(&file1_path, "// test").unwrap();
        fs::write(&file2_path, "// test").unwrap();
        fs::write(&file3_path, "// test").unwrap();

        let pattern1 = file1_path.to_str().unwrap().to_string();
        let expanded1 = expand_paths(&[pattern1], true);
        assert_eq!(expanded1, vec![file1_path.clone()]);

        let pattern2 = format!("{}/*.c", dir_path.to_str().unwrap());
        let expanded2 = expand_paths(&[pattern2.clone()], true);
        assert_eq!(expanded2, vec![file1_path.clone(), file2_path.clone()]);

        let pattern3 = format!("{}/*.js", dir_path.to_str().unwrap());
        let expanded3 = expand_paths(&[pattern2, pattern3], true);
        assert_eq!(expanded3.len(), 3);
        assert!(expanded3.contains(&file3_path));
    }

    #[test]
    fn test_directory_walk_respects_gitignore() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("build")).unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join(".gitignore"), "build/\n").unwrap();
        fs::write(root.join("build").join("gen.c"), "int x;").unwrap();
        fs::write(root.join("src").join("main.c"), "int y;").unwrap();

        let pattern = root.to_str().unwrap().to_string();

        let respected = expand_paths(&[pattern.clone()], true);
        assert_eq!(respected, vec![root.join("src").join("main.c")]);

        let everything = expand_paths(&[pattern], false);
        assert_eq!(everything.len(), 2);
    }

    #[test]
    fn test_output_path_mirrors_source() {
        assert_eq!(
            output_path(Path::new("out"), Path::new("./src/lib/hello.c"), "md"),
            PathBuf::from("out/src/lib/hello.c.md")
        );
        assert_eq!(
            output_path(Path::new("out"), Path::new("/abs/hello.c"), "json"),
            PathBuf::from("out/abs/hello.c.json")
        );
    }
}
