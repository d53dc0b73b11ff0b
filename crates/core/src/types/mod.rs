//! Core types for checkout analytics.
//!
//! This module provides type-safe wrappers for checkout domain concepts.

pub mod config;
pub mod event;
pub mod id;
pub mod money;
pub mod order;
pub mod purchase;

pub use config::{CheckoutConfig, SentryConfig};
pub use event::{BodlEventsPayload, CheckoutEvent, DataLayerEvent};
pub use id::*;
pub use money::Currency;
pub use order::{GiftCertificate, LineItem, LineItemMap, Order};
pub use purchase::{PurchaseItem, PurchaseRecord};
