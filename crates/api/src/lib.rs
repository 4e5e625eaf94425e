//! Store Hub API library.
//!
//! This crate provides the Store Hub REST service as a library, allowing
//! the router and services to be driven in-process by integration tests.
//!
//! # Layers
//!
//! - [`db`] - generic keyed-document record store (in-memory and
//!   `PostgreSQL` JSONB backends) plus filter/sort composition and the
//!   partial-update builder
//! - [`models`] - persisted document shapes and their sparse patch types
//! - [`services`] - per-entity services enforcing the domain invariants
//! - [`routes`] - axum JSON handlers mapping services onto HTTP

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
