//! Store Hub Core - Shared domain types.
//!
//! This crate provides the value types used across the Store Hub components:
//! - `api` - REST service for users, stores, and products
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. Every invariant that can be enforced at the
//! type level lives here: bounded ratings, validated emails and usernames,
//! base64 image checks, and great-circle distance math.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, usernames, emails, ratings,
//!   coordinates, and base64 images

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
