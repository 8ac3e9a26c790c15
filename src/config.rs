use anyhow::{anyhow, Result};
use chrono_tz::Tz;
use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite:./data/birthdays.db";
const DEFAULT_TIMEZONE: &str = "Asia/Tashkent";

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub database_url: String,
    pub http_port: u16,
    pub admin_ids: Vec<u64>,
    pub timezone: Tz,
    pub notify_hour: u32,
    pub notify_minute: u32,
    /// SQLite file for conversation sessions; in-memory when unset.
    pub dialogue_db_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .or_else(|_| env::var("API_TOKEN"))
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let database_url = non_empty_var("DATABASE_URL")
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let http_port = non_empty_var("HTTP_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;

        let admin_ids = parse_admin_ids(&env::var("ADMIN_IDS").unwrap_or_default())?;

        let timezone_name = non_empty_var("BIRTHDAY_TIMEZONE")
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone = timezone_name
            .parse::<Tz>()
            .map_err(|e| anyhow!("Invalid BIRTHDAY_TIMEZONE '{}': {}", timezone_name, e))?;

        let notify_hour = parse_bounded("BIRTHDAY_HOUR", 9, 23)?;
        let notify_minute = parse_bounded("BIRTHDAY_MINUTE", 0, 59)?;

        Ok(Config {
            telegram_bot_token: token,
            database_url,
            http_port,
            admin_ids,
            timezone,
            notify_hour,
            notify_minute,
            dialogue_db_path: non_empty_var("DIALOGUE_DB_PATH"),
        })
    }

    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_ids.contains(&user_id)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bounded(key: &str, default: u32, max: u32) -> Result<u32> {
    let Some(raw) = non_empty_var(key) else {
        return Ok(default);
    };

    match raw.parse::<u32>() {
        Ok(value) if value <= max => Ok(value),
        _ => Err(anyhow!("Invalid {}: expected a number between 0 and {}", key, max)),
    }
}

/// Parses a comma-separated list of Telegram user ids.
pub fn parse_admin_ids(raw: &str) -> Result<Vec<u64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u64>().map_err(|_| anyhow!("Invalid ADMIN_IDS entry: '{}'", s)))
        .collect()
}
