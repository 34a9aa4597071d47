//! Command implementations, one module per command group.

pub mod account;
pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
