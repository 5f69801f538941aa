//! UseCase: セッション参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinSessionUseCase::execute() メソッド
//! - Registry への登録と、参加者に最初に送るバックログペイロードの構築
//!
//! ### なぜこのテストが必要か
//! - 新規参加者は過去のメッセージを追記順に受け取る必要がある
//! - ログ未作成時は `{time, who: "", message: "file DNE."}` を送る（既存クライアントとの互換性）
//! - ログの読み込み失敗で参加自体が失敗してはならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：N 件のメッセージがあるログ
//! - エッジケース：ログ未作成、空のログ
//! - 異常系：ログ読み込みエラー、同じ ID での二重登録

use std::sync::Arc;

use dengon_shared::time::current_local_timestamp;

use crate::{
    domain::{Backlog, MessageLogRepository},
    infrastructure::{
        dto::websocket::{FileMissingNotice, MessageRecord},
        registry::{SessionHandle, SessionRegistry},
    },
};

use super::error::JoinError;

/// セッション参加のユースケース
pub struct JoinSessionUseCase {
    /// Message Log（データアクセス層の抽象化）
    message_log: Arc<dyn MessageLogRepository>,
    /// 接続中セッションの Registry
    registry: Arc<SessionRegistry>,
}

impl JoinSessionUseCase {
    /// 新しい JoinSessionUseCase を作成
    pub fn new(message_log: Arc<dyn MessageLogRepository>, registry: Arc<SessionRegistry>) -> Self {
        Self {
            message_log,
            registry,
        }
    }

    /// セッション参加を実行
    ///
    /// # Arguments
    ///
    /// * `handle` - 参加するセッションの書き込みハンドル
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - このセッションだけに送るバックログペイロード
    /// * `Err(JoinError)` - 参加失敗
    pub async fn execute(&self, handle: SessionHandle) -> Result<String, JoinError> {
        let session_id = handle.id().clone();

        // 1. Registry に登録（以降のブロードキャストは outbox に溜まる）
        if !self.registry.add(handle).await {
            return Err(JoinError::AlreadyRegistered(session_id.into_string()));
        }

        // 2. バックログを構築
        self.build_backlog_payload().await
    }

    /// バックログペイロードを構築
    ///
    /// ログ読み込みに失敗した場合は警告を出して空配列を返す
    pub async fn build_backlog_payload(&self) -> Result<String, JoinError> {
        let backlog = match self.message_log.read_all().await {
            Ok(backlog) => backlog,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read message log; replaying empty backlog");
                Backlog::Entries(Vec::new())
            }
        };

        let payload = match backlog {
            Backlog::Missing => {
                serde_json::to_string(&FileMissingNotice::new(current_local_timestamp()))?
            }
            Backlog::Entries(messages) => {
                let records: Vec<MessageRecord> = messages.iter().map(MessageRecord::from).collect();
                serde_json::to_string(&records)?
            }
        };

        Ok(payload)
    }
}
