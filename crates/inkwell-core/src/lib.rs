//! # Inkwell Core
//!
//! The domain layer of the Inkwell blog.
//! This crate contains the content model, save-time rules and the
//! content/query services, with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod rules;
pub mod services;
pub mod slug;

pub use error::{DomainError, RepoError};
pub use services::{BlogQueries, ContentStore, QueryConfig, Repositories};
