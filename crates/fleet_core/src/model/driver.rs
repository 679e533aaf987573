//! Driver entity.
//!
//! Passwords are opaque text compared verbatim by the login check. They are
//! skipped when a driver is serialized so they never leak into output.

use super::{require_text, ValidationError};
use serde::{Deserialize, Serialize};

pub type DriverId = i64;

/// Unsaved driver, e.g. from self-registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDriver {
    pub name: String,
    pub license_number: String,
    pub login: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl NewDriver {
    pub fn new(
        name: impl Into<String>,
        license_number: impl Into<String>,
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            license_number: license_number.into(),
            login: login.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.name, &self.license_number, &self.login, &self.password)
    }

    pub fn with_id(self, id: DriverId) -> Driver {
        Driver {
            id,
            name: self.name,
            license_number: self.license_number,
            login: self.login,
            password: self.password,
        }
    }
}

/// Persisted, active driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    pub license_number: String,
    /// Unique among active drivers.
    pub login: String,
    #[serde(skip_serializing, default)]
    pub password: String,
}

impl Driver {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.name, &self.license_number, &self.login, &self.password)
    }

    /// Verbatim comparison; no hashing is applied to stored passwords.
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}

fn validate_fields(
    name: &str,
    license_number: &str,
    login: &str,
    password: &str,
) -> Result<(), ValidationError> {
    require_text("driver", "name", name)?;
    require_text("driver", "license_number", license_number)?;
    require_text("driver", "login", login)?;
    require_text("driver", "password", password)
}

#[cfg(test)]
mod tests {
    use super::NewDriver;

    #[test]
    fn serialization_omits_password() {
        let driver = NewDriver::new("A. Smith", "LIC1", "asmith", "pw").with_id(100);
        let json = serde_json::to_value(&driver).unwrap();
        assert_eq!(json["login"], "asmith");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn password_match_is_exact() {
        let driver = NewDriver::new("A. Smith", "LIC1", "asmith", "pw").with_id(100);
        assert!(driver.password_matches("pw"));
        assert!(!driver.password_matches("PW"));
        assert!(!driver.password_matches("pw "));
    }

    #[test]
    fn blank_login_fails_validation() {
        assert!(NewDriver::new("A. Smith", "LIC1", "", "pw")
            .validate()
            .is_err());
    }
}
