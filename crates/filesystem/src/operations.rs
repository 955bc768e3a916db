use super::models::FileSystem;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

impl FileSystem {
    /// Reads a URL list: one URL per line, trimmed, blank and `#` lines skipped
    pub async fn read_url_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read URL list {}", path.display()))?;

        let urls = parse_url_list(&content);
        tracing::debug!("Read {} URL(s) from {}", urls.len(), path.display());
        Ok(urls)
    }

    fn get_absolute_path(path: &Path) -> Result<PathBuf> {
        let abs_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        Ok(abs_path)
    }

    pub fn get_absolute_path_string(path: &str) -> Result<String> {
        let path_buf = PathBuf::from(path);
        let abs = Self::get_absolute_path(&path_buf)?;
        Ok(abs.to_string_lossy().to_string())
    }
}

fn parse_url_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let urls = parse_url_list("# targets\nexample.com\n\n  https://a.test/  \n#skip\n");
        assert_eq!(urls, vec!["example.com", "https://a.test/"]);
    }

    #[tokio::test]
    async fn test_read_url_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        tokio::fs::write(&path, "a.test\r\nb.test\r\n").await.unwrap();

        let urls = FileSystem::read_url_list(&path).await.unwrap();
        assert_eq!(urls, vec!["a.test", "b.test"]);
    }

    #[tokio::test]
    async fn test_missing_list_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileSystem::read_url_list(dir.path().join("none.txt")).await.is_err());
    }

    #[test]
    fn test_absolute_path() {
        let abs = FileSystem::get_absolute_path_string("urls.txt").unwrap();
        assert!(Path::new(&abs).is_absolute());
    }
}
