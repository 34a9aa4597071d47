//! ShopHub storefront library.
//!
//! Client-side state and services for the ShopHub storefront:
//!
//! - [`cart`]: the client-local shopping cart and its change signal
//! - [`session`]: signed-in token/profile and route guards
//! - [`api`]: REST API client with a cached catalog
//! - [`checkout`]: WhatsApp order hand-off
//! - [`storage`]: the key-value port everything above persists through

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod format;
pub mod session;
pub mod storage;

pub use error::{AppError, Result};
