//! Core types and workflows for the classrep coursework tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies. Storage
//! backends implement [`store::ClassStore`]; the workflow modules
//! ([`activation`], [`scope`], [`assignments`], [`submissions`]) are generic
//! over it.

pub mod activation;
pub mod assignments;
pub mod auth;
pub mod coursework;
pub mod error;
pub mod roster;
pub mod scope;
pub mod semester;
pub mod store;
pub mod submissions;

pub use error::{Error, Result};
