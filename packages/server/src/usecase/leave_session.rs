//! UseCase: セッション離脱処理

use std::sync::Arc;

use crate::{domain::SessionId, infrastructure::registry::SessionRegistry};

/// セッション離脱のユースケース
pub struct LeaveSessionUseCase {
    registry: Arc<SessionRegistry>,
}

impl LeaveSessionUseCase {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Registry からセッションを削除する
    ///
    /// 既に削除済み（ブロードキャスト中の書き込み失敗など）の場合は何もせず `false` を返す
    pub async fn execute(&self, session_id: &SessionId) -> bool {
        self.registry.remove(session_id).await
    }
}
