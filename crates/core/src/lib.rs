//! Dulsan Core - Shared types library.
//!
//! This crate provides the domain types used across all Dulsan components:
//! - `data` - Local cache and remote synchronization session
//! - `storefront` - Public menu, reservation and admin HTTP API
//! - `cli` - Command-line tools for migrations, seeding and cache management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, image references and statuses
//! - [`models`] - Products, categories, singleton configs and reservations
//! - [`defaults`] - The seed dataset used as fallback and for remote bootstrap
//! - [`catalog`] - Catalog filtering, search and per-category counts
//! - [`access`] - Menu / admin page state machine and password gate
//! - [`manifest`] - Installability manifest generated from business config

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod access;
pub mod catalog;
pub mod defaults;
pub mod manifest;
pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
