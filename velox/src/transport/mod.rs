pub mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{fields::FormFields, session::Session};

/// Endpoint creating a new account.
pub const CREATE_ACCOUNT_PATH: &str = "/auth/create";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub username: String,
    pub token: String,
}

impl From<Account> for Session {
    fn from(account: Account) -> Self {
        Session {
            id: account.id,
            username: account.username,
            token: account.token,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpResponse {
    pub data: Account,
}

/// Body of a response refused by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    #[serde(skip)]
    pub http_status: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// The server provided message, if it is not blank.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

/// Resolution of a transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(SignUpResponse),
    /// The server answered with an error status.
    Rejected(ErrorBody),
    /// No usable answer was received (connection failure, timeout, malformed body).
    Fault(String),
}

/// Unauthenticated client of the authentication service.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn sign_up(&self, request: FormFields) -> Outcome;
}
