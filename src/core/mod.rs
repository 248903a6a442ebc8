//! Core library components.
//!
//! Key parsing and generation, the shared export catalog, and the render and
//! apply steps that turn the catalog into trust files.

pub mod account;
pub mod apply;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod distributor;
pub mod domain;
pub mod keys;
pub mod orchestrator;
pub mod state;
pub mod types;
