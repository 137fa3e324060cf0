//! API middleware and extractors

pub mod auth;
pub mod client_ip;

pub use auth::RequireUser;
pub use client_ip::ClientIp;
