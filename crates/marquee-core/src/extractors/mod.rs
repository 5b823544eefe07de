pub mod auth_user;
pub mod client_ip;
pub mod json;
pub mod pagination;
pub mod query;

pub use auth_user::AuthUser;
pub use client_ip::ClientIp;
pub use json::Json;
pub use pagination::Pagination;
pub use query::Query;
