//! Credentials sourced from the process environment

use featline_core::ExtractError;

pub const USER_VAR: &str = "ARCGIS_USER";
pub const PASSWORD_VAR: &str = "ARCGIS_PASSWORD";

/// Username and password for token issuance.
///
/// `Debug` never prints the password.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Resolve both variables from the process environment.
    pub fn from_env() -> Result<Self, ExtractError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve both variables through `lookup`.
    ///
    /// `ARCGIS_USER` is checked first. Empty values count as absent.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ExtractError> {
        let require = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ExtractError::missing(name))
        };
        let username = require(USER_VAR)?;
        log::debug!("{USER_VAR} environment variable found");
        let password = require(PASSWORD_VAR)?;
        log::debug!("{PASSWORD_VAR} environment variable found");
        Ok(Self { username, password })
    }

    /// Remove both variables from the process environment so child
    /// processes do not inherit them.
    pub fn scrub_env() {
        std::env::remove_var(USER_VAR);
        std::env::remove_var(PASSWORD_VAR);
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn resolves_both() {
        let creds =
            Credentials::from_lookup(lookup(&[(USER_VAR, "alice"), (PASSWORD_VAR, "s3cret")]))
                .unwrap();
        assert_eq!(creds.username(), "alice");
        assert_eq!(creds.password(), "s3cret");
    }

    #[test]
    fn missing_user_named() {
        let err = Credentials::from_lookup(lookup(&[(PASSWORD_VAR, "s3cret")])).unwrap_err();
        match err {
            ExtractError::Configuration { var, .. } => assert_eq!(var, USER_VAR),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_password_named() {
        let err = Credentials::from_lookup(lookup(&[(USER_VAR, "alice")])).unwrap_err();
        match err {
            ExtractError::Configuration { var, .. } => assert_eq!(var, PASSWORD_VAR),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn user_reported_first_when_both_missing() {
        let err = Credentials::from_lookup(lookup(&[])).unwrap_err();
        assert!(format!("{err}").starts_with(USER_VAR));
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let err = Credentials::from_lookup(lookup(&[(USER_VAR, "alice"), (PASSWORD_VAR, "")]))
            .unwrap_err();
        assert!(format!("{err}").starts_with(PASSWORD_VAR));
    }

    #[test]
    fn debug_redacts_password() {
        let creds = Credentials::new("alice", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn scrub_env_removes_variables() {
        // Only test in this crate that touches the real environment
        std::env::set_var(USER_VAR, "alice");
        std::env::set_var(PASSWORD_VAR, "s3cret");
        Credentials::scrub_env();
        assert!(std::env::var(USER_VAR).is_err());
        assert!(std::env::var(PASSWORD_VAR).is_err());
    }
}
