//! User service for registration, authentication, and profile edits

use chrono::NaiveDate;
use std::sync::Arc;

use crate::domain::user::{
    validate_email, validate_mobile, validate_national_code, validate_password,
    validate_required, EducationalLevel, NewUser, User, UserId, UserRepository,
    MIN_PASSWORD_LENGTH,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub family: String,
    pub birthdate: NaiveDate,
    pub national_code: String,
    pub mobile: String,
    pub email: String,
    pub university_name: String,
    pub student_number: String,
    pub field_of_study: String,
    pub educational_level: String,
    pub password: String,
}

/// Request for a partial profile update. Absent fields are left untouched;
/// blank strings are treated as absent.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub family: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub university_name: Option<String>,
    pub student_number: Option<String>,
    pub field_of_study: Option<String>,
    pub educational_level: Option<String>,
    pub password: Option<String>,
    pub current_password: Option<String>,
}

/// User service for registration and account management
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new user. All field validation failures are collected and
    /// reported together; the identity uniqueness check runs after.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, DomainError> {
        let mut errors = Vec::new();

        for (label, value) in [
            ("Name", &request.name),
            ("Family", &request.family),
            ("University name", &request.university_name),
            ("Student number", &request.student_number),
            ("Field of study", &request.field_of_study),
        ] {
            if let Err(e) = validate_required(label, value) {
                errors.push(e.to_string());
            }
        }

        if let Err(e) = validate_national_code(&request.national_code) {
            errors.push(e.to_string());
        }

        if let Err(e) = validate_mobile(&request.mobile) {
            errors.push(e.to_string());
        }

        let email = request.email.trim().to_lowercase();

        if let Err(e) = validate_email(&email) {
            errors.push(e.to_string());
        }

        let educational_level = match request.educational_level.trim() {
            "" => {
                errors.push("Educational level is required".to_string());
                None
            }
            level => match EducationalLevel::parse(level) {
                Ok(level) => Some(level),
                Err(e) => {
                    errors.push(e.to_string());
                    None
                }
            },
        };

        if let Err(e) = validate_password(&request.password) {
            errors.push(e.to_string());
        }

        if !errors.is_empty() {
            return Err(DomainError::validation_all(errors));
        }

        let exists = self
            .repository
            .identity_exists(
                &request.national_code,
                &email,
                &request.mobile,
                request.student_number.trim(),
            )
            .await?;

        if exists {
            return Err(DomainError::conflict(
                "User with this national code, email, mobile, or student number already exists",
            ));
        }

        let password_hash = self.hasher.hash(&request.password)?;

        let user = User::new(NewUser {
            name: request.name,
            family: request.family,
            birthdate: request.birthdate,
            national_code: request.national_code,
            mobile: request.mobile,
            email,
            university_name: request.university_name,
            student_number: request.student_number,
            field_of_study: request.field_of_study,
            // Validation above guarantees the level parsed
            educational_level: educational_level
                .ok_or_else(|| DomainError::internal("Educational level missing after validation"))?,
            password_hash,
        });

        self.repository.create(user).await
    }

    /// Authenticate by national code and password. Returns None for unknown
    /// accounts and wrong passwords alike, so callers cannot distinguish them.
    pub async fn authenticate(
        &self,
        national_code: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let user = match self.repository.get_by_national_code(national_code).await? {
            Some(u) => u,
            None => return Ok(None),
        };

        if !self.hasher.verify(password, user.password_hash()) {
            return Ok(None);
        }

        Ok(Some(user))
    }

    /// Get a user by ID
    pub async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        self.repository.get(id).await
    }

    /// Get a user by national code
    pub async fn get_by_national_code(
        &self,
        national_code: &str,
    ) -> Result<Option<User>, DomainError> {
        self.repository.get_by_national_code(national_code).await
    }

    /// Resolve several national codes at once
    pub async fn find_by_national_codes(
        &self,
        codes: &[String],
    ) -> Result<Vec<User>, DomainError> {
        self.repository.find_by_national_codes(codes).await
    }

    /// Count registered users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }

    /// Apply a partial profile update, returning the updated user and the
    /// labels of the fields that changed
    pub async fn update_profile(
        &self,
        id: UserId,
        request: UpdateProfileRequest,
    ) -> Result<(User, Vec<&'static str>), DomainError> {
        let mut user = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))?;

        let mut updated_fields = Vec::new();
        let mut errors = Vec::new();

        if let Some(name) = nonblank(request.name.as_deref()) {
            user.set_name(name);
            updated_fields.push("name");
        }

        if let Some(family) = nonblank(request.family.as_deref()) {
            user.set_family(family);
            updated_fields.push("family");
        }

        if let Some(birthdate) = request.birthdate {
            user.set_birthdate(birthdate);
            updated_fields.push("birthdate");
        }

        if let Some(university_name) = nonblank(request.university_name.as_deref()) {
            user.set_university_name(university_name);
            updated_fields.push("university name");
        }

        if let Some(field_of_study) = nonblank(request.field_of_study.as_deref()) {
            user.set_field_of_study(field_of_study);
            updated_fields.push("field of study");
        }

        if let Some(level) = nonblank(request.educational_level.as_deref()) {
            match EducationalLevel::parse(&level) {
                Ok(level) => {
                    user.set_educational_level(level);
                    updated_fields.push("educational level");
                }
                Err(e) => errors.push(e.to_string()),
            }
        }

        if let Some(mobile) = &request.mobile {
            if mobile != user.mobile() {
                let existing = self.repository.get_by_mobile(mobile).await?;

                if existing.is_some_and(|u| u.id() != id) {
                    return Err(DomainError::conflict("Mobile number already registered"));
                }

                if let Err(e) = validate_mobile(mobile) {
                    errors.push(e.to_string());
                }

                user.set_mobile(mobile.clone());
                updated_fields.push("mobile");
            }
        }

        if let Some(email) = &request.email {
            let email = email.trim().to_lowercase();

            if email != user.email() {
                let existing = self.repository.get_by_email(&email).await?;

                if existing.is_some_and(|u| u.id() != id) {
                    return Err(DomainError::conflict("Email already registered"));
                }

                if let Err(e) = validate_email(&email) {
                    errors.push(e.to_string());
                }

                user.set_email(email);
                updated_fields.push("email");
            }
        }

        if let Some(student_number) = nonblank(request.student_number.as_deref()) {
            if student_number != user.student_number() {
                let existing = self
                    .repository
                    .get_by_student_number(&student_number)
                    .await?;

                if existing.is_some_and(|u| u.id() != id) {
                    return Err(DomainError::conflict("Student number already registered"));
                }

                user.set_student_number(student_number);
                updated_fields.push("student number");
            }
        }

        if let Some(password) = nonblank(request.password.as_deref()) {
            let current = request
                .current_password
                .as_deref()
                .filter(|p| !p.is_empty())
                .ok_or_else(|| {
                    DomainError::validation("Current password is required to change password")
                })?;

            if !self.hasher.verify(current, user.password_hash()) {
                return Err(DomainError::unauthorized("Current password is incorrect"));
            }

            if password.len() < MIN_PASSWORD_LENGTH {
                return Err(DomainError::validation(format!(
                    "New password must be at least {} characters",
                    MIN_PASSWORD_LENGTH
                )));
            }

            let new_hash = self.hasher.hash(&password)?;
            user.set_password_hash(new_hash);
            updated_fields.push("password");
        }

        if !errors.is_empty() {
            return Err(DomainError::validation_all(errors));
        }

        if updated_fields.is_empty() {
            return Err(DomainError::validation("No valid updates provided"));
        }

        let user = self.repository.update(&user).await?;

        Ok((user, updated_fields))
    }
}

/// Treat absent and blank values alike, yielding the trimmed content
fn nonblank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::user::password::Argon2Hasher;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    fn create_service() -> UserService<InMemoryUserRepository, Argon2Hasher> {
        let repository = Arc::new(InMemoryUserRepository::new());
        let hasher = Arc::new(Argon2Hasher::new());
        UserService::new(repository, hasher)
    }

    fn make_request(n: u32) -> RegisterRequest {
        RegisterRequest {
            name: format!("Name{n}"),
            family: format!("Family{n}"),
            birthdate: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            national_code: format!("{:010}", n),
            mobile: format!("{:011}", 9_000_000_000u64 + u64::from(n)),
            email: format!("user{n}@example.com"),
            university_name: "Test University".to_string(),
            student_number: format!("S{n}"),
            field_of_study: "Computer Engineering".to_string(),
            educational_level: "Bachelor".to_string(),
            password: "secret123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register() {
        let service = create_service();

        let user = service.register(make_request(1)).await.unwrap();

        assert_eq!(user.national_code(), "0000000001");
        assert_eq!(user.educational_level(), EducationalLevel::Bachelor);
        // The stored hash must never equal the plaintext
        assert_ne!(user.password_hash(), "secret123");
    }

    #[tokio::test]
    async fn test_register_collects_all_validation_errors() {
        let service = create_service();

        let mut request = make_request(1);
        request.name = "  ".to_string();
        request.mobile = "123".to_string();
        request.password = "abc".to_string();

        let result = service.register(request).await;

        match result {
            Err(DomainError::Validation { errors }) => {
                assert_eq!(errors.len(), 3);
                assert!(errors.contains(&"Name is required".to_string()));
                assert!(errors.contains(&"Mobile must be exactly 11 digits".to_string()));
                assert!(errors.contains(&"Password must be at least 6 characters".to_string()));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_invalid_educational_level() {
        let service = create_service();

        let mut request = make_request(1);
        request.educational_level = "Diploma".to_string();

        let result = service.register(request).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_register_duplicate_identity() {
        let service = create_service();

        service.register(make_request(1)).await.unwrap();

        // Same national code, fresh everything else
        let mut request = make_request(2);
        request.national_code = "0000000001".to_string();

        let result = service.register(request).await;

        match result {
            Err(DomainError::Conflict { message }) => {
                assert_eq!(
                    message,
                    "User with this national code, email, mobile, or student number already exists"
                );
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_lowercases_email() {
        let service = create_service();

        let mut request = make_request(1);
        request.email = "User1@Example.COM".to_string();

        let user = service.register(request).await.unwrap();
        assert_eq!(user.email(), "user1@example.com");
    }

    #[tokio::test]
    async fn test_authenticate() {
        let service = create_service();

        service.register(make_request(1)).await.unwrap();

        let user = service
            .authenticate("0000000001", "secret123")
            .await
            .unwrap();
        assert!(user.is_some());

        let wrong = service
            .authenticate("0000000001", "wrong_password")
            .await
            .unwrap();
        assert!(wrong.is_none());

        let unknown = service.authenticate("9999999999", "secret123").await.unwrap();
        assert!(unknown.is_none());
    }

    #[tokio::test]
    async fn test_update_profile_basic_fields() {
        let service = create_service();
        let user = service.register(make_request(1)).await.unwrap();

        let request = UpdateProfileRequest {
            name: Some("  Reza ".to_string()),
            university_name: Some("Sharif University".to_string()),
            ..Default::default()
        };

        let (updated, fields) = service.update_profile(user.id(), request).await.unwrap();

        assert_eq!(updated.name(), "Reza");
        assert_eq!(updated.university_name(), "Sharif University");
        assert_eq!(fields, vec!["name", "university name"]);
    }

    #[tokio::test]
    async fn test_update_profile_blank_fields_ignored() {
        let service = create_service();
        let user = service.register(make_request(1)).await.unwrap();

        let request = UpdateProfileRequest {
            name: Some("   ".to_string()),
            ..Default::default()
        };

        let result = service.update_profile(user.id(), request).await;

        match result {
            Err(DomainError::Validation { errors }) => {
                assert_eq!(errors, vec!["No valid updates provided".to_string()]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_with_padded_password_authenticates_as_typed() {
        let service = create_service();

        let mut request = make_request(1);
        request.password = " secret123 ".to_string();
        service.register(request).await.unwrap();

        let user = service
            .authenticate("0000000001", " secret123 ")
            .await
            .unwrap();
        assert!(user.is_some());
    }

    #[tokio::test]
    async fn test_update_profile_blank_student_number_ignored() {
        let service = create_service();
        let user = service.register(make_request(1)).await.unwrap();

        let request = UpdateProfileRequest {
            student_number: Some("   ".to_string()),
            ..Default::default()
        };

        let result = service.update_profile(user.id(), request).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        let unchanged = service.get(user.id()).await.unwrap().unwrap();
        assert_eq!(unchanged.student_number(), "S1");
    }

    #[tokio::test]
    async fn test_update_profile_trims_student_number() {
        let service = create_service();
        let user = service.register(make_request(1)).await.unwrap();

        let request = UpdateProfileRequest {
            student_number: Some("  S900  ".to_string()),
            ..Default::default()
        };

        let (updated, fields) = service.update_profile(user.id(), request).await.unwrap();
        assert_eq!(updated.student_number(), "S900");
        assert_eq!(fields, vec!["student number"]);
    }

    #[tokio::test]
    async fn test_update_profile_invalid_educational_level_surfaces_error() {
        let service = create_service();
        let user = service.register(make_request(1)).await.unwrap();

        let request = UpdateProfileRequest {
            educational_level: Some("Diploma".to_string()),
            ..Default::default()
        };

        let result = service.update_profile(user.id(), request).await;

        match result {
            Err(DomainError::Validation { errors }) => {
                assert_eq!(
                    errors,
                    vec![
                        "Educational level must be one of Associate, Bachelor, Master, PhD"
                            .to_string()
                    ]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_profile_mobile_conflict() {
        let service = create_service();
        service.register(make_request(1)).await.unwrap();
        let user2 = service.register(make_request(2)).await.unwrap();

        let request = UpdateProfileRequest {
            mobile: Some(format!("{:011}", 9_000_000_001u64)),
            ..Default::default()
        };

        let result = service.update_profile(user2.id(), request).await;

        match result {
            Err(DomainError::Conflict { message }) => {
                assert_eq!(message, "Mobile number already registered");
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_profile_unchanged_mobile_not_counted() {
        let service = create_service();
        let user = service.register(make_request(1)).await.unwrap();

        // Setting the current value is a no-op, so nothing is updated
        let request = UpdateProfileRequest {
            mobile: Some(user.mobile().to_string()),
            ..Default::default()
        };

        let result = service.update_profile(user.id(), request).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_update_password_requires_current() {
        let service = create_service();
        let user = service.register(make_request(1)).await.unwrap();
        let original_hash = user.password_hash().to_string();

        let request = UpdateProfileRequest {
            password: Some("new_secret".to_string()),
            ..Default::default()
        };

        let result = service.update_profile(user.id(), request).await;

        match result {
            Err(DomainError::Validation { errors }) => {
                assert_eq!(
                    errors,
                    vec!["Current password is required to change password".to_string()]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        let unchanged = service.get(user.id()).await.unwrap().unwrap();
        assert_eq!(unchanged.password_hash(), original_hash);
    }

    #[tokio::test]
    async fn test_update_password_wrong_current() {
        let service = create_service();
        let user = service.register(make_request(1)).await.unwrap();

        let request = UpdateProfileRequest {
            password: Some("new_secret".to_string()),
            current_password: Some("not_the_password".to_string()),
            ..Default::default()
        };

        let result = service.update_profile(user.id(), request).await;
        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_update_password_too_short() {
        let service = create_service();
        let user = service.register(make_request(1)).await.unwrap();

        let request = UpdateProfileRequest {
            password: Some("abc".to_string()),
            current_password: Some("secret123".to_string()),
            ..Default::default()
        };

        let result = service.update_profile(user.id(), request).await;

        match result {
            Err(DomainError::Validation { errors }) => {
                assert_eq!(
                    errors,
                    vec!["New password must be at least 6 characters".to_string()]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_password_success() {
        let service = create_service();
        let user = service.register(make_request(1)).await.unwrap();

        let request = UpdateProfileRequest {
            password: Some("new_secret".to_string()),
            current_password: Some("secret123".to_string()),
            ..Default::default()
        };

        let (_, fields) = service.update_profile(user.id(), request).await.unwrap();
        assert_eq!(fields, vec!["password"]);

        let old_auth = service.authenticate("0000000001", "secret123").await.unwrap();
        assert!(old_auth.is_none());

        let new_auth = service
            .authenticate("0000000001", "new_secret")
            .await
            .unwrap();
        assert!(new_auth.is_some());
    }

    #[tokio::test]
    async fn test_update_profile_unknown_user() {
        let service = create_service();

        let request = UpdateProfileRequest {
            name: Some("Reza".to_string()),
            ..Default::default()
        };

        let result = service.update_profile(UserId::new(), request).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
