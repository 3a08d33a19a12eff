// Build-time identity reported by /api/health

use serde::Serialize;

/// Package version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name (from Cargo.toml).
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub name: &'static str,
    pub version: &'static str,
}

impl Health {
    pub fn ok() -> Self {
        Self {
            status: "ok",
            name: NAME,
            version: VERSION,
        }
    }
}
