use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub openai_api_key: String,
    pub public_rps: u32,
    pub recruiter_rps: u32,
    pub calendar_client_id: Option<String>,
    pub calendar_client_secret: Option<String>,
    pub calendar_token_url: Option<String>,
    pub calendar_api_base: Option<String>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            jwt_secret: get_env("JWT_SECRET")?,
            openai_api_key: get_env("OPENAI_API_KEY")?,
            public_rps: get_env_parse("PUBLIC_RPS")?,
            recruiter_rps: get_env_parse("RECRUITER_RPS")?,
            calendar_client_id: env::var("CALENDAR_CLIENT_ID").ok(),
            calendar_client_secret: env::var("CALENDAR_CLIENT_SECRET").ok(),
            calendar_token_url: env::var("CALENDAR_TOKEN_URL").ok(),
            calendar_api_base: env::var("CALENDAR_API_BASE").ok(),
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(name)?;
    raw.parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
