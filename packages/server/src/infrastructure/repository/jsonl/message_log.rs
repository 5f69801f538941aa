//! JSON Lines Message Log 実装
//!
//! 1 行に 1 つの JSON オブジェクト（`time`, `who`, `what`）を追記するファイルストア。
//! 既存の行は書き換えません。
//!
//! 追記は Mutex で直列化します。読み込みは追記と並行して実行でき、
//! 書き込み途中の末尾行（改行で終わっていない行）は単に無視します。

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::Mutex};

use crate::{
    domain::{Backlog, ChatMessage, MessageLogError, MessageLogRepository},
    infrastructure::dto::websocket::MessageRecord,
};

/// ファイルベースの Message Log 実装
pub struct JsonlMessageLog {
    /// ログファイルのパス（初回の追記時に作成される）
    path: PathBuf,
    /// 追記の排他制御
    append_lock: Mutex<()>,
}

impl JsonlMessageLog {
    /// 新しい JsonlMessageLog を作成（ファイルはまだ作成しない）
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            append_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MessageLogRepository for JsonlMessageLog {
    async fn append(&self, message: &ChatMessage) -> Result<(), MessageLogError> {
        let mut line = serde_json::to_string(&MessageRecord::from(message))?;
        line.push('\n');

        let _guard = self.append_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }

    async fn read_all(&self) -> Result<Backlog, MessageLogError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Backlog::Missing),
            Err(e) => return Err(e.into()),
        };

        Ok(Backlog::Entries(parse_records(&bytes)))
    }
}

/// Parse newline-separated records, skipping the ones that cannot be read.
fn parse_records(bytes: &[u8]) -> Vec<ChatMessage> {
    let terminated = bytes.ends_with(b"\n");
    let lines: Vec<&[u8]> = bytes.split(|b| *b == b'\n').collect();
    let last = lines.len() - 1;

    let mut messages = Vec::new();
    for (index, raw) in lines.into_iter().enumerate() {
        let is_trailing = index == last;
        if raw.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        let parsed = std::str::from_utf8(raw)
            .map_err(|e| e.to_string())
            .and_then(|line| {
                serde_json::from_str::<MessageRecord>(line).map_err(|e| e.to_string())
            });

        match parsed {
            Ok(record) => messages.push(record.into()),
            // Append in progress
            Err(_) if is_trailing && !terminated => {
                tracing::debug!(line = index + 1, "ignoring unterminated trailing record");
            }
            Err(e) => {
                tracing::warn!(line = index + 1, error = %e, "skipping malformed log record");
            }
        }
    }
    messages
}
