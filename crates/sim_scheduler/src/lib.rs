//! # sim_scheduler
//!
//! System scheduling for the simulation runtime.
//!
//! This crate provides:
//!
//! - [`System`] — the contract simulation systems implement: a required
//!   `update` plus optional `init`/`teardown` lifecycle hooks.
//! - [`SystemScheduler`] — an ordered system list driven once per tick;
//!   execution order within a tick is exactly registration order, which
//!   keeps simulation output reproducible for identical command sequences.
//! - [`SystemCatalog`] — named factories resolving system blueprints to
//!   concrete instances, used for dynamic system injection.

pub mod catalog;
pub mod scheduler;
pub mod system;

pub use catalog::{CatalogError, SystemCatalog};
pub use scheduler::{SchedulerError, SystemScheduler, TickReport};
pub use system::{System, SystemFault, SystemState, TickContext};
