//! Infrastructure layer: wire DTOs, message log stores and the session registry.

pub mod dto;
pub mod registry;
pub mod repository;
