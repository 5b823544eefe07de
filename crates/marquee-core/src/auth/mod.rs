pub mod bearer;
pub mod jwt;
pub mod password;
pub mod tokens;

pub use bearer::{authenticate, bearer_token};
pub use password::{hash_password, verify_password};
pub use tokens::{TokenError, TokenHandler, TokenSettings};
