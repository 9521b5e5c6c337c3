//! JSON Lines file sink.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::SinkResult;
use crate::traits::sink::RecordSink;
use crate::types::Record;

/// Appends each record as one JSON line.
///
/// The file is opened in append mode, so several crawls can share it. A
/// page's records are written in one `write_all`.
#[derive(Debug)]
pub struct JsonlSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlSink {
    /// Open (or create) `path` for appending.
    pub async fn open(path: impl AsRef<Path>) -> SinkResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSink for JsonlSink {
    async fn accept(&self, records: &[Record]) -> SinkResult<()> {
        let mut buf = Vec::new();
        for record in records {
            serde_json::to_writer(&mut buf, record)?;
            buf.push(b'\n');
        }
        let mut file = self.file.lock().await;
        file.write_all(&buf).await?;
        Ok(())
    }

    async fn flush(&self) -> SinkResult<()> {
        self.file.lock().await.flush().await?;
        Ok(())
    }
}
