//! Persisted document shapes and their sparse patch types.
//!
//! Documents serialize in camelCase, matching what the frontend sends and
//! what lives in the database. Patch types mirror the entity shape with
//! every field optional; an absent or blank field means "do not change".

pub mod product;
pub mod store;
pub mod user;

pub use product::{Product, ProductPatch};
pub use store::{Location, Store, StorePatch};
pub use user::{Profile, User, UserPatch};
