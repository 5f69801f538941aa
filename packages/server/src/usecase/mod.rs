//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層（WebSocket ハンドラ）から呼び出され、Domain 層と Registry を操作します。

pub mod error;
pub mod join_session;
pub mod leave_session;
pub mod relay_message;

pub use error::{JoinError, RelayError};
pub use join_session::JoinSessionUseCase;
pub use leave_session::LeaveSessionUseCase;
pub use relay_message::{RelayMessageUseCase, RelayOutcome};
