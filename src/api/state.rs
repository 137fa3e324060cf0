//! Application state for shared services

use std::sync::Arc;

use crate::domain::login_history::{LoginHistoryRepository, LoginRecord, LoginStatus};
use crate::domain::team::TeamRepository;
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::login_history::LoginAuditService;
use crate::infrastructure::team::{
    CreateTeamRequest, EditTeamRequest, TeamMembership, TeamService,
};
use crate::infrastructure::user::{
    PasswordHasher, RegisterRequest, UpdateProfileRequest, UserService,
};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub team_service: Arc<dyn TeamServiceTrait>,
    pub login_audit: Arc<dyn LoginAuditTrait>,
    pub jwt_service: Arc<dyn JwtGenerator>,
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, request: RegisterRequest) -> Result<User, DomainError>;
    async fn authenticate(
        &self,
        national_code: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError>;
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;
    async fn get_by_national_code(&self, national_code: &str)
        -> Result<Option<User>, DomainError>;
    async fn update_profile(
        &self,
        id: UserId,
        request: UpdateProfileRequest,
    ) -> Result<(User, Vec<&'static str>), DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

/// Trait for team service operations
#[async_trait::async_trait]
pub trait TeamServiceTrait: Send + Sync {
    async fn create_team(
        &self,
        leader: UserId,
        request: CreateTeamRequest,
    ) -> Result<crate::domain::team::Team, DomainError>;
    async fn edit_team(
        &self,
        leader: UserId,
        request: EditTeamRequest,
    ) -> Result<(crate::domain::team::Team, Vec<&'static str>), DomainError>;
    async fn my_team(&self, user: UserId) -> Result<Option<TeamMembership>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

/// Trait for login audit operations
#[async_trait::async_trait]
pub trait LoginAuditTrait: Send + Sync {
    async fn record_attempt(
        &self,
        user: Option<UserId>,
        national_code: &str,
        ip_address: &str,
        user_agent: Option<String>,
        status: LoginStatus,
    );
    async fn history_for_user(&self, user: UserId) -> Result<Vec<LoginRecord>, DomainError>;
}

// Implement traits for the actual services

#[async_trait::async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn register(&self, request: RegisterRequest) -> Result<User, DomainError> {
        UserService::register(self, request).await
    }

    async fn authenticate(
        &self,
        national_code: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        UserService::authenticate(self, national_code, password).await
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }

    async fn get_by_national_code(
        &self,
        national_code: &str,
    ) -> Result<Option<User>, DomainError> {
        UserService::get_by_national_code(self, national_code).await
    }

    async fn update_profile(
        &self,
        id: UserId,
        request: UpdateProfileRequest,
    ) -> Result<(User, Vec<&'static str>), DomainError> {
        UserService::update_profile(self, id, request).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        UserService::count(self).await
    }
}

#[async_trait::async_trait]
impl<T, U> TeamServiceTrait for TeamService<T, U>
where
    T: TeamRepository + 'static,
    U: UserRepository + 'static,
{
    async fn create_team(
        &self,
        leader: UserId,
        request: CreateTeamRequest,
    ) -> Result<crate::domain::team::Team, DomainError> {
        TeamService::create_team(self, leader, request).await
    }

    async fn edit_team(
        &self,
        leader: UserId,
        request: EditTeamRequest,
    ) -> Result<(crate::domain::team::Team, Vec<&'static str>), DomainError> {
        TeamService::edit_team(self, leader, request).await
    }

    async fn my_team(&self, user: UserId) -> Result<Option<TeamMembership>, DomainError> {
        TeamService::my_team(self, user).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        TeamService::count(self).await
    }
}

#[async_trait::async_trait]
impl<R: LoginHistoryRepository + 'static> LoginAuditTrait for LoginAuditService<R> {
    async fn record_attempt(
        &self,
        user: Option<UserId>,
        national_code: &str,
        ip_address: &str,
        user_agent: Option<String>,
        status: LoginStatus,
    ) {
        LoginAuditService::record_attempt(self, user, national_code, ip_address, user_agent, status)
            .await
    }

    async fn history_for_user(&self, user: UserId) -> Result<Vec<LoginRecord>, DomainError> {
        LoginAuditService::history_for_user(self, user).await
    }
}
