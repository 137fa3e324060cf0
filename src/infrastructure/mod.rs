//! Infrastructure layer - repositories, services, and external integrations

pub mod auth;
pub mod logging;
pub mod login_history;
pub mod storage;
pub mod team;
pub mod user;
