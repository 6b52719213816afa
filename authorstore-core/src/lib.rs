//! Core of the authorstore project: a thin abstraction over JSON document databases.
//!
//! This crate provides:
//!
//! - **Document traits** ([`document`]) - Traits for defining and serializing stored documents
//! - **Store backend abstraction** ([`backend`]) - The wire operations a backend must offer
//! - **Query and filtering API** ([`query`]) - Filters, queries and in-place updates
//! - **Collections interface** ([`collection`]) - Typed access to a single collection
//! - **Document store** ([`store`]) - Owner of the backend handle
//! - **Error handling** ([`error`]) - Error and result types

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod query;
pub mod store;
