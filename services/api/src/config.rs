use lectio_auth::WorkFactor;
use lectio_core::config::Config;
use serde::Deserialize;

/// API service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing bearer tokens.
    pub jwt_secret: JwtSecret,
    /// TCP port to listen on. Env var: `API_PORT`.
    #[serde(default = "default_port")]
    pub api_port: u16,
    /// Argon2 memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub password_memory_kib: u32,
    #[serde(default = "default_iterations")]
    pub password_iterations: u32,
    #[serde(default = "default_parallelism")]
    pub password_parallelism: u32,
}

impl Config for ApiConfig {}

/// Shortest HMAC secret accepted, in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Token signing secret, rejected at load time when empty or shorter than
/// [`MIN_JWT_SECRET_LEN`].
#[derive(Clone, Deserialize)]
#[serde(try_from = "String")]
pub struct JwtSecret(String);

impl JwtSecret {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for JwtSecret {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err("JWT_SECRET must not be empty".into());
        }
        if value.len() < MIN_JWT_SECRET_LEN {
            return Err(format!("JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} bytes"));
        }
        Ok(Self(value))
    }
}

impl std::fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JwtSecret(..)")
    }
}

impl ApiConfig {
    pub fn work_factor(&self) -> WorkFactor {
        WorkFactor {
            memory_kib: self.password_memory_kib,
            iterations: self.password_iterations,
            parallelism: self.password_parallelism,
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_memory_kib() -> u32 {
    WorkFactor::RECOMMENDED.memory_kib
}

fn default_iterations() -> u32 {
    WorkFactor::RECOMMENDED.iterations
}

fn default_parallelism() -> u32 {
    WorkFactor::RECOMMENDED.parallelism
}
