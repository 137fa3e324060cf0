//! Team infrastructure: repositories and the team service

pub mod postgres_repository;
pub mod repository;
pub mod service;

pub use postgres_repository::PostgresTeamRepository;
pub use repository::InMemoryTeamRepository;
pub use service::{CreateTeamRequest, EditTeamRequest, TeamMembership, TeamService};
