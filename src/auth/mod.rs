pub mod role;
pub mod token;

pub use role::{Role, UnknownRole};
pub use token::{decode_claims, Claims, DecodeError};
