use clap::Parser;
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/paisa.toml";

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Gateway {
    pub base_url: String,
    /// Upper bound on every gateway call; defaults to 10 seconds.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
    pub gateway: Option<Gateway>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Option<Server>,
}

#[derive(Debug, Parser)]
#[command(name = "paisa", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, config::ConfigError> {
        let args = Args::parse();

        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("PAISA").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }
}
