//! Library crate for fob-contest, exposing modules for binaries and integration tests.

pub mod config;
/// Persistence layer: entities, the store trait and its SQLite backend.
pub mod dao;
/// Request and response payloads of the REST API.
pub mod dto;
/// Service errors and their HTTP projection.
pub mod error;
/// Axum routers and handlers.
pub mod routes;
/// Business logic behind every command and the countdown task.
pub mod services;
/// Shared application state and the contest lifecycle.
pub mod state;

#[cfg(test)]
mod test_support;
