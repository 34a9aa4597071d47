//! ShopHub back-office library.
//!
//! Admin operations over the storefront's [`ApiClient`]:
//! dashboard statistics, product, category and order management.
//!
//! # Security
//!
//! Every operation here needs an administrator token. Call
//! [`require_admin`] before running any of them; the REST API rejects
//! non-admin tokens regardless.
//!
//! [`ApiClient`]: shophub_storefront::api::ApiClient

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod categories;
pub mod dashboard;
pub mod error;
pub mod guard;
pub mod orders;
pub mod products;

pub use dashboard::DashboardStats;
pub use error::AdminError;
pub use guard::require_admin;
