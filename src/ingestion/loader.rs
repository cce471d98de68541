//! Corpus loading: recursive directory walk with per-file error tolerance.

use crate::error::{AppError, Result};
use crate::ingestion::types::SourceDocument;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Read every regular file under `root`, at any depth, as UTF-8 text.
///
/// Files are visited in file-name order so repeated loads produce the same
/// sequence. A file that cannot be read (permissions, invalid UTF-8) is
/// logged and skipped; the rest of the corpus still loads.
///
/// # Errors
/// Returns `AppError::IngestError` if `root` does not exist or is not a directory.
pub async fn load_documents(root: &Path) -> Result<Vec<SourceDocument>> {
    let meta = tokio::fs::metadata(root).await.map_err(|e| {
        AppError::IngestError(format!("cannot access {}: {}", root.display(), e))
    })?;
    if !meta.is_dir() {
        return Err(AppError::IngestError(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let paths = list_files(root.to_path_buf()).await?;

    let mut documents = Vec::with_capacity(paths.len());
    let mut skipped = 0usize;

    for path in paths {
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => documents.push(SourceDocument {
                path: path.display().to_string(),
                contents,
            }),
            Err(e) => {
                skipped += 1;
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Skipping unreadable file"
                );
            }
        }
    }

    tracing::debug!(
        root = %root.display(),
        loaded = documents.len(),
        skipped,
        "Corpus load complete"
    );

    Ok(documents)
}

/// Walk the tree on the blocking pool; walkdir is synchronous.
async fn list_files(root: PathBuf) -> Result<Vec<PathBuf>> {
    tokio::task::spawn_blocking(move || {
        WalkDir::new(&root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable directory entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect::<Vec<_>>()
    })
    .await
    .map_err(|e| AppError::IngestError(format!("directory walk task failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_loads_nested_files_in_order() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("code/deep")).unwrap();
        fs::write(dir.path().join("b.txt"), "bravo").unwrap();
        fs::write(dir.path().join("a.txt"), "alpha").unwrap();
        fs::write(dir.path().join("code/deep/c.py"), "charlie").unwrap();

        let docs = load_documents(dir.path()).await.unwrap();
        let contents: Vec<&str> = docs.iter().map(|d| d.contents.as_str()).collect();

        assert_eq!(contents, vec!["alpha", "bravo", "charlie"]);
        assert!(docs[2].path.ends_with("c.py"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_file_is_skipped() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("good.md"), "readable").unwrap();
        fs::write(dir.path().join("bad.bin"), [0xff, 0xfe, 0x00, 0xc3]).unwrap();

        let docs = load_documents(dir.path()).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].contents, "readable");
    }

    #[tokio::test]
    async fn test_missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        let result = load_documents(&dir.path().join("nope")).await;
        assert!(matches!(result, Err(AppError::IngestError(_))));
    }

    #[tokio::test]
    async fn test_file_root_is_an_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("single.txt");
        fs::write(&file, "x").unwrap();
        assert!(load_documents(&file).await.is_err());
    }
}
