//! Checkout Analytics Core - Shared types library.
//!
//! This crate provides the types shared by all checkout analytics components:
//! - `analytics` - Tracker fan-out and purchase extraction
//! - `loader` - Page bootstrap (tag manager, view selection, rendering)
//! - `cli` - Command-line tools for rendering pages and replaying events
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no trackers, no rendering.
//! Everything here is plain data that crosses crate boundaries.
//!
//! # Modules
//!
//! - [`types`] - IDs, money, order snapshots, purchase records, events and page config

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
