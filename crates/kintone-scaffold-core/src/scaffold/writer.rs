//! Writing generated files to disk

use crate::codegen::{GeneratedFile, GeneratedProject};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Write a generated project into the target directory.
/// Returns the paths of the written files, relative to `target_dir`.
pub async fn write_project(target_dir: &Path, project: &GeneratedProject) -> Result<Vec<PathBuf>> {
    // Ensure target directory exists
    fs::create_dir_all(target_dir)
        .await
        .context("Failed to create target directory")?;

    for dir in &project.directories {
        let path = target_dir.join(dir);
        fs::create_dir_all(&path)
            .await
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }

    write_files(target_dir, &project.files).await
}

/// Write files below `target_dir`, creating parent directories as needed
pub async fn write_files(target_dir: &Path, files: &[GeneratedFile]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(files.len());

    for file in files {
        let target_path = target_dir.join(&file.path);
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(&target_path, &file.contents)
            .await
            .with_context(|| format!("Failed to write file: {}", target_path.display()))?;
        tracing::debug!(path = %target_path.display(), bytes = file.contents.len(), "wrote file");

        written.push(file.path.clone());
    }

    Ok(written)
}

/// Number of entries in a directory, or `None` if it does not exist
pub fn existing_entries(dir: &Path) -> Option<usize> {
    if !dir.is_dir() {
        return None;
    }
    std::fs::read_dir(dir).ok().map(|entries| entries.count())
}
