use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;

use crate::account::errors::AccountIdError;
use crate::account::errors::CredentialsError;
use crate::account::errors::ProfileError;
use crate::account::errors::UserNameError;

/// Account aggregate entity.
///
/// A registered login identity. Soft-deleted or deactivated accounts stay in storage
/// but can neither log in nor refresh sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub user_name: UserName,
    pub password_hash: String,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Whether the account may authenticate.
    pub fn is_usable(&self) -> bool {
        self.is_active && !self.is_deleted
    }
}

/// Account unique identifier type (database serial)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(pub i64);

impl AccountId {
    /// Parse an account ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a positive integer
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        match s.parse::<i64>() {
            Ok(id) if id > 0 => Ok(AccountId(id)),
            Ok(id) => Err(AccountIdError::InvalidFormat(id.to_string())),
            Err(e) => Err(AccountIdError::InvalidFormat(format!("{}: {}", s, e))),
        }
    }
}

impl FromStr for AccountId {
    type Err = AccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Login name value type
///
/// User names are email addresses, validated with an RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserName(String);

impl UserName {
    /// Create a new validated user name.
    ///
    /// # Errors
    /// * `Empty` - Input is empty or whitespace
    /// * `InvalidFormat` - Input is not an email address
    pub fn new(user_name: impl Into<String>) -> Result<Self, UserNameError> {
        let user_name = user_name.into();
        if user_name.trim().is_empty() {
            return Err(UserNameError::Empty);
        }

        email_address::EmailAddress::from_str(&user_name)
            .map(|_| UserName(user_name))
            .map_err(|e| UserNameError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Login input, validated for shape only.
///
/// Exists for the duration of a single login call and is never persisted.
#[derive(Clone)]
pub struct Credentials {
    pub user_name: UserName,
    pub password: String,
}

impl Credentials {
    /// # Errors
    /// * `UserName` - Identifier is empty or not email-shaped
    /// * `EmptyPassword` - Password is empty
    pub fn new(user_name: &str, password: &str) -> Result<Self, CredentialsError> {
        let user_name = UserName::new(user_name)?;
        if password.is_empty() {
            return Err(CredentialsError::EmptyPassword);
        }

        Ok(Self {
            user_name,
            password: password.to_string(),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_name", &self.user_name)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl FromStr for Gender {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            other => Err(ProfileError::InvalidGender(other.to_string())),
        }
    }
}

/// Optional personal details captured at registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountProfile {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub gender: Option<Gender>,
}

impl AccountProfile {
    /// Validate raw profile fields.
    ///
    /// # Errors
    /// * `InvalidEmail` - Email is present but malformed
    /// * `InvalidGender` - Gender is not male, female or other
    /// * `InvalidPhone` - Phone contains non-digit characters
    pub fn new(
        name: Option<String>,
        phone: Option<String>,
        email: Option<String>,
        gender: Option<String>,
    ) -> Result<Self, ProfileError> {
        if let Some(phone) = &phone {
            if phone.is_empty() || !phone.chars().all(|c| c.is_ascii_digit()) {
                return Err(ProfileError::InvalidPhone);
            }
        }

        if let Some(email) = &email {
            email_address::EmailAddress::from_str(email)
                .map_err(|e| ProfileError::InvalidEmail(e.to_string()))?;
        }

        let gender = gender.as_deref().map(Gender::from_str).transpose()?;

        Ok(Self {
            name,
            phone,
            email,
            gender,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.email.is_none() && self.gender.is_none()
    }
}

/// Command to register an account with validated fields
#[derive(Clone)]
pub struct RegisterCommand {
    pub user_name: UserName,
    pub password: String,
    pub profile: AccountProfile,
}

impl RegisterCommand {
    /// Construct a new register command.
    ///
    /// # Arguments
    /// * `user_name` - Validated user name
    /// * `password` - Plain text password (will be hashed by service)
    /// * `profile` - Validated optional profile details
    ///
    /// # Errors
    /// * `EmptyPassword` - Password is empty
    pub fn new(
        user_name: UserName,
        password: String,
        profile: AccountProfile,
    ) -> Result<Self, CredentialsError> {
        if password.is_empty() {
            return Err(CredentialsError::EmptyPassword);
        }

        Ok(Self {
            user_name,
            password,
            profile,
        })
    }
}

impl fmt::Debug for RegisterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterCommand")
            .field("user_name", &self.user_name)
            .field("password", &"<redacted>")
            .field("profile", &self.profile)
            .finish()
    }
}

/// Account row to be written by a repository, password already hashed.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub user_name: UserName,
    pub password_hash: String,
    pub profile: AccountProfile,
}
