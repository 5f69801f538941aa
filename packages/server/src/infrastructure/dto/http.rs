//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Live session count for the sessions endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCountDto {
    pub count: usize,
}
