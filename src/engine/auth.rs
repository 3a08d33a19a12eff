// Authorization modes for the Engine API endpoint

use reqwest::RequestBuilder;
use reqwest::header::AUTHORIZATION;

#[derive(Clone, PartialEq, Eq)]
pub enum EngineAuth {
    /// Already-encoded basic token, sent as `Basic <token>`.
    Preshared(String),
    Credentials { username: String, password: String },
    Bearer(String),
}

impl EngineAuth {
    pub(crate) fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            EngineAuth::Preshared(token) => builder.header(AUTHORIZATION, format!("Basic {}", token)),
            EngineAuth::Credentials { username, password } => {
                builder.basic_auth(username, Some(password))
            }
            EngineAuth::Bearer(token) => builder.bearer_auth(token),
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            EngineAuth::Preshared(_) => "basic-token",
            EngineAuth::Credentials { .. } => "basic-credentials",
            EngineAuth::Bearer(_) => "bearer",
        }
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for EngineAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineAuth::Credentials { username, .. } => f
                .debug_struct("Credentials")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            other => write!(f, "{}(***)", other.mode()),
        }
    }
}
