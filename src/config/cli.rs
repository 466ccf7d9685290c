use crate::core::Storage;
use crate::domain::model::{Upload, UploadStatus};
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

/// 本機檔案系統：上傳檔以原路徑讀取，輸出寫入 base_path
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_upload(&self, path: &str) -> Result<Upload> {
        let source = Path::new(path);
        let original_name = source
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(path)
            .to_string();

        let metadata = match fs::metadata(source) {
            Ok(metadata) if metadata.is_file() => metadata,
            _ => {
                tracing::debug!("Upload '{}' is not a readable file", path);
                return Ok(Upload {
                    original_name,
                    content: Vec::new(),
                    status: UploadStatus::Missing,
                });
            }
        };

        let content = fs::read(source)?;
        // 讀取期間檔案被截斷或仍在寫入
        let status = if content.len() as u64 == metadata.len() {
            UploadStatus::Complete
        } else {
            UploadStatus::Partial
        };

        Ok(Upload {
            original_name,
            content,
            status,
        })
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_upload_complete() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("goals.CSV");
        fs::write(&path, b"A,B,C,D,E\n").unwrap();

        let storage = LocalStorage::new(dir.path().to_string_lossy().to_string());
        let upload = storage.read_upload(path.to_str().unwrap()).await.unwrap();

        assert_eq!(upload.original_name, "goals.CSV");
        assert_eq!(upload.extension(), "CSV");
        assert_eq!(upload.status, UploadStatus::Complete);
        assert_eq!(upload.content, b"A,B,C,D,E\n");
    }

    #[tokio::test]
    async fn test_read_upload_missing_file() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().to_string_lossy().to_string());
        let missing = dir.path().join("missing.csv");

        let upload = storage.read_upload(missing.to_str().unwrap()).await.unwrap();
        assert_eq!(upload.status, UploadStatus::Missing);

        let as_dir = storage.read_upload(dir.path().to_str().unwrap()).await.unwrap();
        assert_eq!(as_dir.status, UploadStatus::Missing);
    }

    #[tokio::test]
    async fn test_write_file_creates_directories() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("nested/out");
        let storage = LocalStorage::new(base.to_string_lossy().to_string());

        storage.write_file("report.pdf", b"%PDF").await.unwrap();
        assert_eq!(fs::read(base.join("report.pdf")).unwrap(), b"%PDF");
    }
}
