//! ShopHub Core - Shared types library.
//!
//! This crate provides common types used across all ShopHub components:
//! - `storefront` - Cart, session, checkout and the REST API client
//! - `admin` - Back-office product, category and order management
//! - `cli` - Command-line front-end for both
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails and statuses, plus
//!   the catalog, order and user records exchanged with the REST API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
