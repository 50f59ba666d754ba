use serde::{Deserialize, Serialize};
use std::env;

/// One year
pub const MAX_JWT_EXPIRATION_SECONDS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub auth: AuthConfig,
    pub patient_auth: PatientAuthConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoreConfig {
    /// Load the demo offers on startup
    pub seed_demo_data: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
    /// Require a clinician or practice manager role for offer writes
    #[serde(default)]
    pub enforce_roles: bool,
}

/// Demo realism for the mock patient sign-in
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PatientAuthConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Probability that a failed sign-in is reported as "system busy"
    pub busy_rate: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig { port: 3000 },
            store: StoreConfig { seed_demo_data: true },
            auth: AuthConfig {
                jwt_secret: "practice-dev-secret".to_string(),
                jwt_expiration_seconds: 3600,
                enforce_roles: false,
            },
            patient_auth: PatientAuthConfig {
                min_delay_ms: 1000,
                max_delay_ms: 2000,
                busy_rate: 0.1,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::Config::try_from(&Config::default())?)
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `PRACTICE__SERVER__PORT=8080`
            .add_source(
                config::Environment::with_prefix("PRACTICE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Config = s.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Built-in defaults overlaid with a TOML document
    pub fn from_toml(toml: &str) -> Result<Self, config::ConfigError> {
        let s = config::Config::builder()
            .add_source(config::Config::try_from(&Config::default())?)
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;

        let cfg: Config = s.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "auth.jwt_secret must not be empty".into(),
            ));
        }
        if self.auth.jwt_expiration_seconds == 0
            || self.auth.jwt_expiration_seconds > MAX_JWT_EXPIRATION_SECONDS
        {
            return Err(config::ConfigError::Message(format!(
                "auth.jwt_expiration_seconds must be within 1..={}",
                MAX_JWT_EXPIRATION_SECONDS
            )));
        }
        if self.patient_auth.min_delay_ms > self.patient_auth.max_delay_ms {
            return Err(config::ConfigError::Message(
                "patient_auth.min_delay_ms must not exceed max_delay_ms".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.patient_auth.busy_rate) {
            return Err(config::ConfigError::Message(
                "patient_auth.busy_rate must be within 0..=1".into(),
            ));
        }
        Ok(())
    }
}
