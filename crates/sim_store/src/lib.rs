//! # sim_store
//!
//! The entity store — runtime entity-component storage with dynamic typing.
//!
//! Components are schema-defined (not Rust types), so they are stored as
//! `serde_json::Value` keyed by component type id. The [`ComponentRegistry`]
//! the store was constructed with validates incoming data at attach time.
//!
//! [`ComponentRegistry`]: sim_component::ComponentRegistry

pub mod store;

pub use store::{EntityStore, StoreError};
