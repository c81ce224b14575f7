use serde::{Deserialize, Serialize};

/// The method that created an account.
///
/// Fixed at account creation and mirrored into session claims at mint time.
/// Governs the reconciliation rules (an OAuth sign-in never overwrites a
/// credentials account) and lets collaborators decide whether to offer
/// password management in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMethod {
    Credentials,
    EmailLink,
    Oauth,
}

impl AuthMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Credentials => "credentials",
            Self::EmailLink => "email-link",
            Self::Oauth => "oauth",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "credentials" => Some(Self::Credentials),
            "email-link" => Some(Self::EmailLink),
            "oauth" => Some(Self::Oauth),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
