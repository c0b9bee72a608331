//! # sim_component
//!
//! Component typing for the simulation runtime.
//!
//! Components are schema-defined (not Rust types): a [`ComponentDescriptor`]
//! declares a component type's unique id, its fields with defaults, and an
//! optional validation hook. Instances are plain `serde_json::Value` objects
//! produced by a [`ComponentFactory`] (defaults overlaid with caller fields).
//!
//! This crate provides:
//!
//! - [`Entity`] — lightweight `u64` entity identifiers.
//! - [`EntityAllocator`] — monotonically increasing ID allocator; ids are
//!   never reused within a process.
//! - [`ComponentDescriptor`] / [`FieldSpec`] — per-type schema and defaults.
//! - [`ComponentRegistry`] — explicit-instance registry of component types.
//!   Multiple registries can coexist in one process, so independent
//!   simulations stay fully isolated.

pub mod descriptor;
pub mod entity;
pub mod registry;

pub use descriptor::{ComponentDescriptor, ComponentError, ComponentFactory, FieldSpec};
pub use entity::{Entity, EntityAllocator};
pub use registry::ComponentRegistry;
