//! Login history domain: records of login attempts

mod entity;
mod repository;

pub use entity::{LoginRecord, LoginStatus};
pub use repository::LoginHistoryRepository;
