pub mod error;
pub mod hash;

pub use error::HashError;
pub use hash::Hash;
