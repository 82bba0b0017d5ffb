//! Loading and validation of site assets.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
