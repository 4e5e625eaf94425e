//! Domain value types.

pub mod email;
pub mod geo;
pub mod id;
pub mod image;
pub mod rating;
pub mod username;

pub use email::{Email, EmailError};
pub use geo::{Coordinates, EARTH_RADIUS_KM};
pub use id::{ProductId, StoreId};
pub use image::{ImageError, validate_base64_image};
pub use rating::{Rating, RatingAverage, RatingError};
pub use username::{Username, UsernameError};
