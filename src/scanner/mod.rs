use crate::error::{CataidError, Result};
use globset::{Glob, GlobMatcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Compiles a file name pattern (`*`, `?`, `[...]`, `{a,b}`)
pub fn pattern_matcher(pattern: &str) -> Result<GlobMatcher> {
    Glob::new(pattern.trim())
        .map(|glob| glob.compile_matcher())
        .map_err(|e| CataidError::Config(format!("invalid file pattern {}: {}", pattern, e)))
}

fn file_name_matches(path: &Path, matcher: &GlobMatcher) -> bool {
    path.file_name()
        .map(|n| matcher.is_match(n))
        .unwrap_or(false)
}

/// Resolves the catout files named by `paths`.
///
/// Files must match `pattern`; directories are scanned one level deep.
/// Missing and non-matching paths are skipped with a warning. The result
/// is de-duplicated and sorted.
pub fn collect_catout_paths(paths: &[PathBuf], pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = pattern_matcher(pattern)?;
    let mut found = BTreeSet::new();

    for path in paths {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "path does not exist, skipping");
            continue;
        }

        if path.is_dir() {
            for entry in WalkDir::new(path)
                .min_depth(1)
                .max_depth(1)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let entry_path = entry.path();
                if entry_path.is_file() && file_name_matches(entry_path, &matcher) {
                    found.insert(entry_path.to_path_buf());
                }
            }
        } else if file_name_matches(path, &matcher) {
            found.insert(path.clone());
        } else {
            tracing::warn!(path = %path.display(), %pattern, "file does not match pattern, skipping");
        }
    }

    Ok(found.into_iter().collect())
}
