//! # HTTP Client Adapter
//!
//! Outbound requests to the account service.
//!
//! This module provides the [`HttpAdapter`], which owns the cookie jar and
//! serializes form and multipart bodies.

mod client;
mod error;
mod stream;
mod types;

pub use client::{HttpAdapter, RequestBody, RequestDescriptor, ACCESS_TOKEN_COOKIE};
pub use error::{ApiError, ApiResult};
pub use stream::ProgressStream;
pub use types::{LoginForm, TokenResponse, WhoAmI};
