use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_bus_capacity")]
    pub bus_capacity: usize,
}

fn default_port() -> u16 { 3005 }
fn default_data_dir() -> String { "./data".into() }
fn default_jwt_secret() -> String { "development-secret-change-in-production".into() }
fn default_bus_capacity() -> usize { 256 }

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("CIVICWATCH").separator("__"))
            .build()?;
        Ok(config.try_deserialize().unwrap_or_else(|_| Self {
            port: default_port(),
            data_dir: default_data_dir(),
            jwt_secret: default_jwt_secret(),
            bus_capacity: default_bus_capacity(),
        }))
    }
}
