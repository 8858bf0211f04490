//! HTTP middleware.
//!
//! - [`cors::build_cors_layer`] -- tower-http CORS configured from `CORS_ORIGIN`.
//! - [`cors::options_no_content`] -- answers every `OPTIONS` request with 204.

pub mod cors;
