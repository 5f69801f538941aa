//! Domain layer for the relay.
//!
//! This module contains the message and session models and the
//! persistence port. It is independent of wire DTOs and of the transport.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{Backlog, ChatMessage, Session, SessionState};
pub use error::{MessageLogError, SessionError};
pub use factory::SessionIdFactory;
pub use repository::MessageLogRepository;
pub use value_object::SessionId;
