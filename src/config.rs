use std::{env, str::FromStr};

use anyhow::Context;
use rust_decimal::Decimal;

use crate::domain::commission::CommissionRates;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub redis_url: Option<String>,
    pub frontend_base_url: String,
    pub commission: CommissionRates,
    pub rate_limit_max: u64,
    pub rate_limit_window_secs: u64,
    pub cache_ttl_secs: u64,
    pub courier_speed_kmh: f64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_or("APP_PORT", 3000);
        let redis_url = env::var("REDIS_URL").ok().filter(|url| !url.is_empty());
        let frontend_base_url =
            env::var("FRONTEND_BASE_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());

        let commission = CommissionRates::new(
            decimal_or("COMMISSION_HOTEL_PCT", 10)?,
            decimal_or("COMMISSION_ADMIN_PCT", 20)?,
            decimal_or("COMMISSION_RESTAURANT_PCT", 70)?,
        )
        .context("invalid commission percentages")?;

        Ok(Self {
            database_url,
            host,
            port,
            redis_url,
            frontend_base_url,
            commission,
            rate_limit_max: parse_or("RATE_LIMIT_MAX", 100),
            rate_limit_window_secs: parse_or("RATE_LIMIT_WINDOW_SECS", 60),
            cache_ttl_secs: parse_or("CACHE_TTL_SECS", 300),
            courier_speed_kmh: parse_or("COURIER_SPEED_KMH", 25.0),
        })
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn decimal_or(key: &str, default: i64) -> anyhow::Result<Decimal> {
    match env::var(key) {
        Ok(raw) => Decimal::from_str(raw.trim()).with_context(|| format!("{key} is not a number")),
        Err(_) => Ok(Decimal::from(default)),
    }
}
