use std::{env, str::FromStr};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Staging,
    Production,
}

impl FromStr for AppEnv {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(AppEnv::Development),
            "staging" | "stage" => Ok(AppEnv::Staging),
            "production" | "prod" => Ok(AppEnv::Production),
            _ => Ok(AppEnv::Development), // default if unknown
        }
    }
}

/// What the binary does after loading config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Serve HTTP (default).
    Server,
    /// Drop and recreate every table, then exit.
    InitDb,
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "" | "server" => Ok(RunMode::Server),
            "init-db" | "init_db" => Ok(RunMode::InitDb),
            other => Err(format!("MODE must be 'server' or 'init-db', got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub env: AppEnv,
    pub mode: RunMode,
    pub database_url: String,
    pub http_port: u16,
    pub db_max_connections: u32,

    /// Adds `Secure` to the session cookie. Defaults to on in production only.
    pub session_cookie_secure: bool,
}

/// Entry point to load configuration
pub fn load() -> Result<Config> {
    load_dotenv()?;
    Config::from_env()
}

/// Load .env base, then .env.{APP_ENV}
fn load_dotenv() -> Result<()> {
    let _ = dotenvy::dotenv();

    let env_name = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

    let filename = format!(".env.{}", env_name);
    let _ = dotenvy::from_filename(&filename);

    Ok(())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. `from_env` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_str = lookup("APP_ENV").unwrap_or_else(|| "development".to_string());
        let env = AppEnv::from_str(&env_str).unwrap_or(AppEnv::Development);

        let mode = RunMode::from_str(&lookup("MODE").unwrap_or_default())?;

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://flaskr.sqlite".to_string());

        let http_port: u16 = lookup("HTTP_PORT")
            .unwrap_or_else(|| "5000".to_string())
            .parse()
            .map_err(|_| "HTTP_PORT must be a valid u16")?;

        let db_max_connections: u32 = lookup("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|| "5".to_string())
            .parse()
            .ok()
            .filter(|n| *n > 0)
            .ok_or("DB_MAX_CONNECTIONS must be a positive integer")?;

        let session_cookie_secure = match lookup("SESSION_COOKIE_SECURE") {
            Some(raw) => matches!(raw.to_lowercase().as_str(), "1" | "true" | "yes"),
            None => env == AppEnv::Production,
        };

        Ok(Self {
            env,
            mode,
            database_url,
            http_port,
            db_max_connections,
            session_cookie_secure,
        })
    }
}
