use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: String,
    pub avatar_url: String,
}

impl User {
    /// Builds the signed-in user from whatever was typed in the identifier
    /// field. An email address contributes only its local part to the name.
    pub fn from_identifier(identifier: &str) -> User {
        let name = match identifier.split_once('@') {
            Some((local, _)) => local,
            None => identifier,
        };
        User {
            id: "u1".to_string(),
            username: identifier.to_string(),
            name: name.to_string(),
            avatar_url: format!("https://ui-avatars.com/api/?name={identifier}&background=random"),
        }
    }

    /// Upper-cased first letter of the display name, for the avatar badge.
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next().map(|c| c.to_ascii_uppercase())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
}

#[derive(Debug, Default)]
pub struct AuthStore {
    state: AuthState,
}

impl AuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated
    }

    pub fn login(&mut self, identifier: &str) {
        let user = User::from_identifier(identifier);
        info!(username = %user.username, "signed in");
        self.state = AuthState {
            user: Some(user),
            is_authenticated: true,
        };
    }

    pub fn logout(&mut self) {
        info!("signed out");
        self.state = AuthState::default();
    }
}
