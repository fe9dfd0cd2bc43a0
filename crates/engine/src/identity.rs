use serde::Deserialize;

/// The signed-in user as reported by the identity boundary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserIdentity {
    pub name: String,
    pub email_or_username: String,
    pub id: String,
}

pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<UserIdentity>;
}

/// Fixed identity, typically read from the engine config.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Option<UserIdentity>,
}

impl StaticIdentity {
    pub fn new(user: Option<UserIdentity>) -> Self {
        Self { user }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<UserIdentity> {
        self.user.clone()
    }
}
