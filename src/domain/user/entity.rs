//! User entity and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::UserValidationError;

/// User identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse an identifier from its string form
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Educational level of a registered student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EducationalLevel {
    Associate,
    Bachelor,
    Master,
    PhD,
}

impl EducationalLevel {
    /// Parse from the wire form used by registration and profile edits
    pub fn parse(s: &str) -> Result<Self, UserValidationError> {
        match s.trim() {
            "Associate" => Ok(Self::Associate),
            "Bachelor" => Ok(Self::Bachelor),
            "Master" => Ok(Self::Master),
            "PhD" => Ok(Self::PhD),
            _ => Err(UserValidationError::InvalidEducationalLevel),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Associate => "Associate",
            Self::Bachelor => "Bachelor",
            Self::Master => "Master",
            Self::PhD => "PhD",
        }
    }
}

impl std::fmt::Display for EducationalLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Profile fields supplied when constructing a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub family: String,
    pub birthdate: NaiveDate,
    pub national_code: String,
    pub mobile: String,
    pub email: String,
    pub university_name: String,
    pub student_number: String,
    pub field_of_study: String,
    pub educational_level: EducationalLevel,
    pub password_hash: String,
}

/// Registered user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    id: UserId,
    name: String,
    family: String,
    birthdate: NaiveDate,
    /// Login username; globally unique, 10 digits
    national_code: String,
    /// Globally unique, 11 digits
    mobile: String,
    /// Globally unique, stored lowercased
    email: String,
    university_name: String,
    /// Globally unique
    student_number: String,
    field_of_study: String,
    educational_level: EducationalLevel,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user account
    pub fn new(fields: NewUser) -> Self {
        let now = Utc::now();

        Self {
            id: UserId::new(),
            name: fields.name.trim().to_string(),
            family: fields.family.trim().to_string(),
            birthdate: fields.birthdate,
            national_code: fields.national_code,
            mobile: fields.mobile,
            email: fields.email.trim().to_lowercase(),
            university_name: fields.university_name.trim().to_string(),
            student_number: fields.student_number.trim().to_string(),
            field_of_study: fields.field_of_study.trim().to_string(),
            educational_level: fields.educational_level,
            password_hash: fields.password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    // Getters

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn birthdate(&self) -> NaiveDate {
        self.birthdate
    }

    pub fn national_code(&self) -> &str {
        &self.national_code
    }

    pub fn mobile(&self) -> &str {
        &self.mobile
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn university_name(&self) -> &str {
        &self.university_name
    }

    pub fn student_number(&self) -> &str {
        &self.student_number
    }

    pub fn field_of_study(&self) -> &str {
        &self.field_of_study
    }

    pub fn educational_level(&self) -> EducationalLevel {
        self.educational_level
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    pub fn set_family(&mut self, family: impl Into<String>) {
        self.family = family.into();
        self.touch();
    }

    pub fn set_birthdate(&mut self, birthdate: NaiveDate) {
        self.birthdate = birthdate;
        self.touch();
    }

    /// Update the mobile number; uniqueness is checked by the caller
    pub fn set_mobile(&mut self, mobile: impl Into<String>) {
        self.mobile = mobile.into();
        self.touch();
    }

    /// Update the email address; stored lowercased
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into().trim().to_lowercase();
        self.touch();
    }

    pub fn set_university_name(&mut self, university_name: impl Into<String>) {
        self.university_name = university_name.into();
        self.touch();
    }

    pub fn set_student_number(&mut self, student_number: impl Into<String>) {
        self.student_number = student_number.into();
        self.touch();
    }

    pub fn set_field_of_study(&mut self, field_of_study: impl Into<String>) {
        self.field_of_study = field_of_study.into();
        self.touch();
    }

    pub fn set_educational_level(&mut self, level: EducationalLevel) {
        self.educational_level = level;
        self.touch();
    }

    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Build a user with distinct identifying fields derived from `n`
    pub fn sample_user(n: u32) -> User {
        User::new(NewUser {
            name: format!("Name{n}"),
            family: format!("Family{n}"),
            birthdate: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            national_code: format!("{:010}", n),
            mobile: format!("{:011}", 9_000_000_000u64 + u64::from(n)),
            email: format!("user{n}@example.com"),
            university_name: "Test University".to_string(),
            student_number: format!("S{n}"),
            field_of_study: "Computer Engineering".to_string(),
            educational_level: EducationalLevel::Bachelor,
            password_hash: "hashed_password".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::sample_user;
    use super::*;

    #[test]
    fn test_educational_level_parse() {
        assert_eq!(EducationalLevel::parse("Bachelor").unwrap(), EducationalLevel::Bachelor);
        assert_eq!(EducationalLevel::parse(" PhD ").unwrap(), EducationalLevel::PhD);
        assert!(EducationalLevel::parse("Diploma").is_err());
        assert!(EducationalLevel::parse("bachelor").is_err());
    }

    #[test]
    fn test_user_creation_normalizes_fields() {
        let user = User::new(NewUser {
            name: "  Sara ".to_string(),
            family: "Ahmadi".to_string(),
            birthdate: NaiveDate::from_ymd_opt(2001, 5, 20).unwrap(),
            national_code: "1234567890".to_string(),
            mobile: "09120000000".to_string(),
            email: "Sara@Example.COM".to_string(),
            university_name: " Tehran University ".to_string(),
            student_number: "S100".to_string(),
            field_of_study: "Physics".to_string(),
            educational_level: EducationalLevel::Master,
            password_hash: "hash".to_string(),
        });

        assert_eq!(user.name(), "Sara");
        assert_eq!(user.email(), "sara@example.com");
        assert_eq!(user.university_name(), "Tehran University");
    }

    #[test]
    fn test_user_serialization_excludes_password() {
        let user = sample_user(1);

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("hashed_password"));
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn test_set_email_lowercases() {
        let mut user = sample_user(1);

        user.set_email("NEW@Example.Com");
        assert_eq!(user.email(), "new@example.com");
    }

    #[test]
    fn test_mutation_touches_updated_at() {
        let mut user = sample_user(1);
        let original_updated = user.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(10));

        user.set_password_hash("new_hash");
        assert_eq!(user.password_hash(), "new_hash");
        assert!(user.updated_at() > original_updated);
    }

    #[test]
    fn test_user_id_roundtrip() {
        let id = UserId::new();
        let parsed = UserId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }
}
