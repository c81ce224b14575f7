/// Identity service configuration loaded from environment variables.
#[derive(Debug)]
pub struct IdentityConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing session tokens.
    pub session_secret: String,
    /// Cookie domain attribute (root domain, e.g. "example.com").
    pub cookie_domain: String,
    /// External base URL sign-in links are built against
    /// (e.g. "https://example.com").
    pub public_url: String,
    /// TCP port to listen on (default 3100). Env var: `IDENTITY_PORT`.
    pub identity_port: u16,
    /// Sign-in providers enabled by the environment.
    pub providers: ProviderRegistry,
}

impl IdentityConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            session_secret: std::env::var("SESSION_SECRET").expect("SESSION_SECRET"),
            cookie_domain: std::env::var("COOKIE_DOMAIN").expect("COOKIE_DOMAIN"),
            public_url: std::env::var("PUBLIC_URL").expect("PUBLIC_URL"),
            identity_port: std::env::var("IDENTITY_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3100),
            providers: ProviderRegistry::from_env(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProviderKind {
    Google,
    Apple,
    Github,
}

impl OAuthProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Apple => "apple",
            Self::Github => "github",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "google" => Some(Self::Google),
            "apple" => Some(Self::Apple),
            "github" => Some(Self::Github),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OAuthProviderConfig {
    pub kind: OAuthProviderKind,
    pub client_id: String,
    pub client_secret: String,
}

/// The set of sign-in methods this deployment accepts. A provider is
/// enabled by presence of its environment variables, nothing else.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    /// Emailed sign-in links, enabled by `EMAIL_SERVER`.
    pub email_link: bool,
    pub oauth: Vec<OAuthProviderConfig>,
}

impl ProviderRegistry {
    pub fn from_env() -> Self {
        Self::resolve(|name| std::env::var(name).ok())
    }

    fn resolve(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut oauth = Vec::new();
        for (kind, id_var, secret_var) in [
            (OAuthProviderKind::Google, "GOOGLE_CLIENT_ID", "GOOGLE_CLIENT_SECRET"),
            (OAuthProviderKind::Apple, "APPLE_ID", "APPLE_SECRET"),
            (OAuthProviderKind::Github, "GITHUB_ID", "GITHUB_SECRET"),
        ] {
            if let (Some(client_id), Some(client_secret)) = (get(id_var), get(secret_var)) {
                oauth.push(OAuthProviderConfig {
                    kind,
                    client_id,
                    client_secret,
                });
            }
        }
        Self {
            email_link: get("EMAIL_SERVER").is_some(),
            oauth,
        }
    }

    pub fn oauth_enabled(&self, kind: OAuthProviderKind) -> bool {
        self.oauth.iter().any(|p| p.kind == kind)
    }

    /// Provider names for the discovery endpoint, `credentials` always first.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = vec!["credentials"];
        if self.email_link {
            names.push("email-link");
        }
        names.extend(self.oauth.iter().map(|p| p.kind.as_str()));
        names
    }
}
