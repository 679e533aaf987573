//! Credential check and request gate for driver sessions.
//!
//! # Responsibility
//! - Resolve a login/password pair to an active driver.
//! - Decide whether a request may proceed given the session's driver id.
//!
//! # Invariants
//! - Passwords are compared verbatim; unknown login and wrong password fail
//!   identically.
//! - Only allow-listed paths proceed without a session driver.

use crate::model::driver::{Driver, DriverId};
use crate::repo::driver_store::DriverStore;
use crate::service::driver_service::DriverService;
use crate::service::{ServiceError, ServiceResult};
use log::{info, warn};
use std::collections::BTreeSet;

pub const LOGIN_PATH: &str = "/login";
pub const DRIVER_REGISTRATION_PATH: &str = "/drivers/add";

/// Returns the active driver owning `login` when `password` matches.
pub fn authenticate<S: DriverStore>(
    drivers: &DriverService<S>,
    login: &str,
    password: &str,
) -> ServiceResult<Driver> {
    match drivers.find_by_login(login)? {
        Some(driver) if driver.password_matches(password) => {
            info!(
                "event=driver_login module=auth status=ok driver_id={}",
                driver.id
            );
            Ok(driver)
        }
        _ => {
            warn!("event=driver_login module=auth status=rejected");
            Err(ServiceError::InvalidCredentials)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Hand the request to its handler; carries the session driver, if any.
    Proceed(Option<DriverId>),
    RedirectToLogin,
}

/// Session gate placed in front of request handlers.
#[derive(Debug, Clone)]
pub struct AccessGate {
    open_paths: BTreeSet<String>,
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new([LOGIN_PATH, DRIVER_REGISTRATION_PATH])
    }
}

impl AccessGate {
    pub fn new<I, P>(open_paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            open_paths: open_paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn check(&self, path: &str, session_driver: Option<DriverId>) -> AccessDecision {
        if session_driver.is_some() || self.open_paths.contains(path) {
            return AccessDecision::Proceed(session_driver);
        }
        AccessDecision::RedirectToLogin
    }
}
