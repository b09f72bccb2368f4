//! Local directory tree backend.
//!
//! The content root holds one subdirectory per post; each
//! subdirectory's designated document (`index.md` by default) is the
//! unit. Media files live beside it and are served elsewhere, so only
//! the document itself is read here.

use super::{ContentSource, ContentUnit, SourceError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Content source over a local directory tree.
pub struct LocalSource {
    root: PathBuf,
    document: String,
}

impl LocalSource {
    pub fn new(root: impl Into<PathBuf>, document: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            document: document.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ContentSource for LocalSource {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    async fn list_units(&self) -> Result<Vec<ContentUnit>, SourceError> {
        // A missing root is an empty source, not an outage.
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(|err| SourceError::Unlistable(self.root.clone(), err))?;

        let mut units = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| SourceError::Unlistable(self.root.clone(), err))?
        {
            let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            units.push(ContentUnit::new(format!("{name}/{}", self.document)));
        }

        // read_dir order is platform-dependent; keep enumeration stable.
        units.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(units)
    }

    async fn read_unit(&self, unit: &ContentUnit) -> Result<Vec<u8>, SourceError> {
        fs::read(self.root.join(&unit.name))
            .await
            .map_err(|err| SourceError::Unreadable(unit.name.clone(), err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn write_post(root: &Path, dir: &str, content: &str) {
        let post_dir = root.join(dir);
        std_fs::create_dir_all(&post_dir).unwrap();
        std_fs::write(post_dir.join("index.md"), content).unwrap();
    }

    #[tokio::test]
    async fn test_list_units_one_per_subdirectory() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "first-post", "---\n---\n");
        write_post(tmp.path(), "second-post", "---\n---\n");
        std_fs::write(tmp.path().join("stray.md"), "not a unit").unwrap();

        let source = LocalSource::new(tmp.path(), "index.md");
        let units = source.list_units().await.unwrap();

        let names: Vec<_> = units.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["first-post/index.md", "second-post/index.md"]);
    }

    #[tokio::test]
    async fn test_list_units_missing_root_is_empty() {
        let source = LocalSource::new("/nonexistent/postr-content", "index.md");
        assert!(source.list_units().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_units_empty_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        let source = LocalSource::new(tmp.path(), "index.md");
        assert!(source.list_units().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_unit() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "first-post", "document body");

        let source = LocalSource::new(tmp.path(), "index.md");
        let bytes = source
            .read_unit(&ContentUnit::new("first-post/index.md"))
            .await
            .unwrap();

        assert_eq!(bytes, b"document body");
    }

    #[tokio::test]
    async fn test_read_unit_missing_document() {
        let tmp = TempDir::new().unwrap();
        std_fs::create_dir_all(tmp.path().join("empty-post")).unwrap();

        let source = LocalSource::new(tmp.path(), "index.md");
        let units = source.list_units().await.unwrap();
        assert_eq!(units.len(), 1);

        // The directory lists as a unit; the read fails per unit.
        let err = source.read_unit(&units[0]).await.unwrap_err();
        assert!(matches!(err, SourceError::Unreadable(name, _) if name == "empty-post/index.md"));
    }
}
