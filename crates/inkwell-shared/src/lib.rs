//! # Inkwell Shared
//!
//! Wire types for the blog: page contexts for the public site, admin
//! request/response bodies and the standard response envelopes.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
