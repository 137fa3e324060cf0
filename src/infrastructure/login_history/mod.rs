//! Login history infrastructure: repositories and the audit service

pub mod postgres_repository;
pub mod repository;
pub mod service;

pub use postgres_repository::PostgresLoginHistoryRepository;
pub use repository::InMemoryLoginHistoryRepository;
pub use service::LoginAuditService;
