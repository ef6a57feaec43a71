//! Lead Console Library
//!
//! Client-side data synchronization layer for a lead-scoring backend. The
//! library wraps the backend's REST API in a typed gateway, keeps a
//! process-scoped query/mutation cache in front of it, and exposes pure
//! view models for the console front end. All scoring, enrichment, and
//! persistence happens in the backend; this crate only renders state and
//! issues requests.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `gateway_client`: Typed backend REST client.
//! - `models`: Core data models.
//! - `query_store`: Query/mutation cache with invalidation.
//! - `validation`: Client-side input validation.
//! - `views`: Presentational view models.

pub mod config;
pub mod errors;
pub mod gateway_client;
pub mod models;
pub mod query_store;
pub mod validation;
pub mod views;
