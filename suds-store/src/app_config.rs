use serde::Deserialize;
use std::env;

use suds_booking::PricingConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    #[serde(default = "default_gst_rate")]
    pub gst_rate: f64,
    #[serde(default = "default_student_discount")]
    pub student_discount_percent: f64,
    #[serde(default)]
    pub per_item_student_discount: bool,
}

fn default_gst_rate() -> f64 {
    0.18
}

fn default_student_discount() -> f64 {
    20.0
}

impl BusinessRules {
    pub fn pricing(&self) -> PricingConfig {
        PricingConfig {
            gst_rate: self.gst_rate,
            student_discount_percent: self.student_discount_percent,
            per_item_student_discount: self.per_item_student_discount,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Environment-specific overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `SUDS__SERVER__PORT=8080`
            .add_source(config::Environment::with_prefix("SUDS").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
