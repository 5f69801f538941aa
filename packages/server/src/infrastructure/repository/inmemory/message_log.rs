//! InMemory Message Log 実装
//!
//! Vec をインメモリストアとして使用します。`None` はストア未作成を表し、
//! JsonlMessageLog のファイル未作成と同じ扱いになります。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Backlog, ChatMessage, MessageLogError, MessageLogRepository};

/// インメモリ Message Log 実装
#[derive(Default)]
pub struct InMemoryMessageLog {
    messages: Mutex<Option<Vec<ChatMessage>>>,
}

impl InMemoryMessageLog {
    /// ストア未作成の状態で作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存のメッセージを持った状態で作成
    pub fn with_messages(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages: Mutex::new(Some(messages)),
        }
    }

    pub async fn len(&self) -> usize {
        self.messages.lock().await.as_ref().map_or(0, Vec::len)
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl MessageLogRepository for InMemoryMessageLog {
    async fn append(&self, message: &ChatMessage) -> Result<(), MessageLogError> {
        let mut messages = self.messages.lock().await;
        messages.get_or_insert_with(Vec::new).push(message.clone());
        Ok(())
    }

    async fn read_all(&self) -> Result<Backlog, MessageLogError> {
        let messages = self.messages.lock().await;
        Ok(match messages.as_ref() {
            Some(messages) => Backlog::Entries(messages.clone()),
            None => Backlog::Missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_log_is_missing() {
        // テスト項目: 作成直後は Missing が返される
        // given (前提条件):
        let log = InMemoryMessageLog::new();

        // when (操作):
        let result = log.read_all().await.unwrap();

        // then (期待する結果):
        assert_eq!(result, Backlog::Missing);
        assert!(log.is_empty().await);
    }

    #[tokio::test]
    async fn test_append_creates_store() {
        // テスト項目: 最初の追記でストアが作成され、以降は追記順に返される
        // given (前提条件):
        let log = InMemoryMessageLog::new();
        let first = ChatMessage::new("t1", "alice", "hello");
        let second = ChatMessage::new("t2", "bob", "hi");

        // when (操作):
        log.append(&first).await.unwrap();
        log.append(&second).await.unwrap();

        // then (期待する結果):
        assert_eq!(
            log.read_all().await.unwrap(),
            Backlog::Entries(vec![first, second])
        );
        assert_eq!(log.len().await, 2);
    }
}
