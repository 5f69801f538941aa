//! UseCase: メッセージ中継処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayMessageUseCase::execute() メソッド
//! - 受信ペイロードのパース、ログへの追記、送信者以外へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 受信したペイロードは加工せずそのまま他の参加者に届ける必要がある
//! - 送信者自身には届けない
//! - ログへの追記失敗や、一部の参加者への書き込み失敗があっても配信は継続する
//!
//! ### どのような状況を想定しているか
//! - 正常系：3 人接続中のメッセージ送信
//! - 異常系：不正なペイロード、ログ追記エラー、切断済みの参加者
//! - エッジケース：送信者のみが接続している場合

use std::sync::Arc;

use crate::{
    domain::{ChatMessage, MessageLogRepository, SessionId},
    infrastructure::{dto::websocket::MessageEnvelope, registry::SessionRegistry},
};

use super::error::RelayError;

/// 1 回の中継の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayOutcome {
    /// ログへの追記に成功したか
    pub persisted: bool,
    /// ペイロードを受け付けた参加者数
    pub delivered: usize,
    /// 書き込みに失敗し Registry から削除された参加者
    pub dropped: Vec<SessionId>,
}

/// メッセージ中継のユースケース
pub struct RelayMessageUseCase {
    /// Message Log（データアクセス層の抽象化）
    message_log: Arc<dyn MessageLogRepository>,
    /// 接続中セッションの Registry
    registry: Arc<SessionRegistry>,
}

impl RelayMessageUseCase {
    /// 新しい RelayMessageUseCase を作成
    pub fn new(message_log: Arc<dyn MessageLogRepository>, registry: Arc<SessionRegistry>) -> Self {
        Self {
            message_log,
            registry,
        }
    }

    /// メッセージ中継を実行
    ///
    /// # Arguments
    ///
    /// * `from` - 送信元セッションの ID
    /// * `payload` - 受信したテキストペイロード（そのまま転送される）
    ///
    /// # Returns
    ///
    /// * `Ok(RelayOutcome)` - 中継結果
    /// * `Err(RelayError)` - ペイロードが不正（追記もブロードキャストも行わない）
    pub async fn execute(&self, from: &SessionId, payload: &str) -> Result<RelayOutcome, RelayError> {
        // 1. パース
        let envelope: MessageEnvelope = serde_json::from_str(payload).map_err(RelayError::Parse)?;
        let message = ChatMessage::from(envelope);

        // 2. ログに追記（失敗しても配信は継続）
        let persisted = match self.message_log.append(&message).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(session_id = %from, error = %e, "Failed to append message to log");
                false
            }
        };

        // 3. 送信者以外に受信したペイロードをそのまま配信
        let mut attempted = 0;
        let dropped = self
            .registry
            .for_each_except(from, |peer| {
                attempted += 1;
                peer.send(payload)
            })
            .await;
        for peer in &dropped {
            tracing::warn!(session_id = %from, peer = %peer, "Peer is gone; removed from registry");
        }

        Ok(RelayOutcome {
            persisted,
            delivered: attempted - dropped.len(),
            dropped,
        })
    }
}
