use crate::error::HmpiError;
use crate::model::UserId;

/// Environment variable `EnvSession` reads by default.
pub const USER_ENV_VAR: &str = "HMPI_USER";

/// Source of the acting user's identity. The core only stamps ownership
/// with it and never inspects credentials.
pub trait SessionProvider {
    fn current_user(&self) -> Option<UserId>;
}

/// A fixed identity, or none.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    user: Option<UserId>,
}

impl StaticSession {
    pub fn new(user: impl Into<UserId>) -> Self {
        Self {
            user: Some(user.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

impl SessionProvider for StaticSession {
    fn current_user(&self) -> Option<UserId> {
        self.user.clone()
    }
}

/// Identity taken from an environment variable, read on every call.
#[derive(Debug, Clone)]
pub struct EnvSession {
    var: String,
}

impl EnvSession {
    pub fn new() -> Self {
        Self::with_var(USER_ENV_VAR)
    }

    pub fn with_var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionProvider for EnvSession {
    fn current_user(&self) -> Option<UserId> {
        std::env::var(&self.var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// The current user, or `Unauthenticated`.
pub fn require_user(session: &dyn SessionProvider) -> Result<UserId, HmpiError> {
    session
        .current_user()
        .filter(|u| !u.trim().is_empty())
        .ok_or(HmpiError::Unauthenticated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_session() {
        assert_eq!(StaticSession::new("alice").current_user().as_deref(), Some("alice"));
        assert!(matches!(
            require_user(&StaticSession::anonymous()),
            Err(HmpiError::Unauthenticated)
        ));
    }

    #[test]
    fn test_blank_identity_is_unauthenticated() {
        assert!(require_user(&StaticSession::new("   ")).is_err());
    }

    #[test]
    fn test_env_session_reads_variable() {
        let var = "HMPI_TEST_SESSION_USER";
        let session = EnvSession::with_var(var);
        std::env::remove_var(var);
        assert_eq!(session.current_user(), None);
        std::env::set_var(var, " field-team-3 ");
        assert_eq!(session.current_user().as_deref(), Some("field-team-3"));
        std::env::remove_var(var);
    }
}
