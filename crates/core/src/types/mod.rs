//! Core types for ShopHub.
//!
//! This module provides type-safe wrappers for common domain concepts and the
//! records the REST API exchanges.

pub mod catalog;
pub mod email;
pub mod envelope;
pub mod id;
pub mod order;
pub mod price;
pub mod status;
pub mod user;

pub use catalog::{Category, CategoryRef, CategorySummary, Product};
pub use email::{Email, EmailError};
pub use envelope::ApiEnvelope;
pub use id::*;
pub use order::{NewOrder, NewOrderItem, Order, OrderCustomer, OrderItem};
pub use price::{Price, PriceError};
pub use status::*;
pub use user::{AuthSession, Credentials, Registration, User};
