//! Bot credentials

use std::fmt;

/// Authorization scheme of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenType {
    /// `Bot {app_id}.{access_token}`
    #[default]
    Bot,
    /// `Bearer {access_token}`
    Bearer,
}

impl TokenType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bot => "Bot",
            Self::Bearer => "Bearer",
        }
    }
}

/// Credential used for both the OpenAPI and the gateway handshake
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    pub app_id: u64,
    pub access_token: String,
    pub token_type: TokenType,
}

impl Token {
    /// Bot token for an application
    pub fn bot(app_id: u64, access_token: impl Into<String>) -> Self {
        Self {
            app_id,
            access_token: access_token.into(),
            token_type: TokenType::Bot,
        }
    }

    /// Bearer token (OAuth access token)
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            app_id: 0,
            access_token: access_token.into(),
            token_type: TokenType::Bearer,
        }
    }

    /// Credential part without the scheme
    pub fn credential(&self) -> String {
        match self.token_type {
            TokenType::Bot => format!("{}.{}", self.app_id, self.access_token),
            TokenType::Bearer => self.access_token.clone(),
        }
    }

    /// Full `Authorization` value, also sent as the Identify/Resume token
    pub fn auth_value(&self) -> String {
        format!("{} {}", self.token_type.as_str(), self.credential())
    }
}

// Keep the secret out of logs
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("app_id", &self.app_id)
            .field("token_type", &self.token_type)
            .field("access_token", &"***")
            .finish()
    }
}
