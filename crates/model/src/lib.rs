//! # elif-model: Data-Mapper Models for elif.rs
//!
//! A `Model` turns a declarative [`ModelConfig`] (table, primary key,
//! allowed fields, timestamps, soft deletes, validation rules and lifecycle
//! callbacks) into validated, event-wrapped statements against a [`Store`].
//!
//! Reads come back as [`Record`]s shaped by the configured return type;
//! entities track which fields changed so saving one writes only those.

pub mod config;
pub mod entity;
pub mod error;
pub mod event_error;
pub mod events;
pub mod model;
pub mod models;
pub mod query;
pub mod store;
pub mod timestamp;

pub use config::*;
pub use entity::Entity;
pub use error::*;
pub use event_error::EventError;
pub use events::*;
pub use model::*;
pub use query::*;
pub use store::{MemoryStore, Row, Store};
