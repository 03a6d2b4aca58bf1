use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub cors: CorsConfig,
    pub weather: WeatherConfig,
    pub currency: CurrencyConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    pub show_headers: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
}

// Origin allow-list configuration. The deployed frontend origin is kept
// separate from the fixed development origins so it can be swapped per
// environment without restating the whole list.
#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub frontend_origin: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub default_city: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CurrencyConfig {
    pub base_url: String,
    pub base_currency: String,
    pub default_amount: f64,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("INFOHUB").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3001)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.show_headers", false)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "InfoHub/0.1")?
            .set_default(
                "cors.allowed_origins",
                vec![
                    "http://localhost:5173".to_string(),
                    "http://localhost:3000".to_string(),
                ],
            )?
            .set_default("cors.frontend_origin", "https://infohub-frontend.onrender.com")?
            .set_default(
                "weather.base_url",
                "https://api.openweathermap.org/data/2.5/weather",
            )?
            .set_default("weather.default_city", "Hyderabad")?
            .set_default(
                "currency.base_url",
                "https://api.exchangerate-api.com/v4/latest",
            )?
            .set_default("currency.base_currency", "INR")?
            .set_default("currency.default_amount", 100.0)?
            .build()?;

        let mut cfg: Self = settings.try_deserialize()?;
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    /// Apply the well-known deployment environment variables.
    ///
    /// These predate the structured `INFOHUB_*` source and are what hosting
    /// platforms actually inject, so they win over file values.
    fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(origin) = std::env::var("FRONTEND_URL") {
            if !origin.is_empty() {
                self.cors.frontend_origin = origin;
            }
        }
        if let Ok(key) = std::env::var("OPENWEATHER_API_KEY") {
            if !key.is_empty() {
                self.weather.api_key = Some(key);
            }
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Full origin allow-list: the configured dev origins plus the deployed
    /// frontend origin.
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = self.cors.allowed_origins.clone();
        if !origins.contains(&self.cors.frontend_origin) {
            origins.push(self.cors.frontend_origin.clone());
        }
        origins
    }
}

/// Immutable per-process state shared by all request tasks.
pub struct AppState {
    pub config: Config,
    pub allowed_origins: Vec<String>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("infohub/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            allowed_origins: config.allowed_origins(),
            config: config.clone(),
            http,
        })
    }
}

/// A fully defaulted config for tests, bypassing file and environment
/// sources.
#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3001,
            workers: None,
        },
        logging: LoggingConfig {
            level: "info".to_string(),
            access_log: false,
            show_headers: false,
        },
        performance: PerformanceConfig {
            keep_alive_timeout: 75,
            read_timeout: 30,
            write_timeout: 30,
        },
        http: HttpConfig {
            server_name: "InfoHub/0.1".to_string(),
        },
        cors: CorsConfig {
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
            ],
            frontend_origin: "https://infohub-frontend.onrender.com".to_string(),
        },
        weather: WeatherConfig {
            api_key: None,
            base_url: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            default_city: "Hyderabad".to_string(),
        },
        currency: CurrencyConfig {
            base_url: "https://api.exchangerate-api.com/v4/latest".to_string(),
            base_currency: "INR".to_string(),
            default_amount: 100.0,
        },
    }
}
