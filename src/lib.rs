//! Shopfront
//!
//! Shopfront is the client-side core of an e-commerce storefront: a product
//! catalog with browse and admin operations, a cart store mirrored to
//! durable client-local storage, a pure pricing calculator, a checkout flow,
//! and a mock authentication collaborator behind a capability interface.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod fixtures;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod storage;
