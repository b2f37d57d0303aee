use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::kernel::Credentials;

const DEFAULT_TODAY_URL: &str =
    "https://lessing-gymnasium-karlsruhe.de/stundenplan/schueler/v_schueler_heute.pdf";
const DEFAULT_TOMORROW_URL: &str =
    "https://lessing-gymnasium-karlsruhe.de/stundenplan/schueler/v_schueler_morgen.pdf";

/// Every five minutes, on the minute.
pub const DEFAULT_REFRESH_SCHEDULE: &str = "0 */5 * * * *";

/// Which substitution extractor the server is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// Fixed-field line grammar
    Pattern,
    /// External LLM interpreter
    Interpreter,
}

impl FromStr for ExtractionStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pattern" | "regex" => Ok(Self::Pattern),
            "interpreter" | "ai" => Ok(Self::Interpreter),
            other => bail!("Unknown extraction strategy: {}", other),
        }
    }
}

/// Interpreter (OpenAI-compatible) settings
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// `development` exposes raw internal error messages in API responses
    pub environment: String,
    pub today_url: String,
    pub tomorrow_url: String,
    pub credentials: Option<Credentials>,
    pub fetch_timeout: Duration,
    pub accept_invalid_certs: bool,
    pub pdf_timeout: Duration,
    pub extraction_strategy: ExtractionStrategy,
    pub interpreter: Option<InterpreterConfig>,
    pub refresh_schedule: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let extraction_strategy: ExtractionStrategy = env::var("EXTRACTION_STRATEGY")
            .unwrap_or_else(|_| "pattern".to_string())
            .parse()
            .context("EXTRACTION_STRATEGY must be `pattern` or `interpreter`")?;

        let interpreter = match env::var("OPENAI_API_KEY") {
            Ok(api_key) if !api_key.trim().is_empty() => Some(InterpreterConfig {
                api_key,
                model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
                base_url: env::var("OPENAI_BASE_URL")
                    .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            }),
            _ => None,
        };

        if extraction_strategy == ExtractionStrategy::Interpreter && interpreter.is_none() {
            bail!("OPENAI_API_KEY must be set when EXTRACTION_STRATEGY=interpreter");
        }

        let credentials = Some(Credentials {
            username: env::var("PLAN_USERNAME").unwrap_or_else(|_| "vertretungsplan".to_string()),
            password: env::var("PLAN_PASSWORD").unwrap_or_else(|_| "ephraim".to_string()),
        })
        .filter(|c| !c.username.is_empty());

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            environment: env::var("APP_ENV").unwrap_or_else(|_| "production".to_string()),
            today_url: env::var("PLAN_TODAY_URL").unwrap_or_else(|_| DEFAULT_TODAY_URL.to_string()),
            tomorrow_url: env::var("PLAN_TOMORROW_URL")
                .unwrap_or_else(|_| DEFAULT_TOMORROW_URL.to_string()),
            credentials,
            fetch_timeout: Duration::from_secs(
                env::var("FETCH_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .context("FETCH_TIMEOUT_SECS must be a valid number")?,
            ),
            accept_invalid_certs: env::var("ACCEPT_INVALID_CERTS")
                .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(true),
            pdf_timeout: Duration::from_secs(
                env::var("PDF_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("PDF_TIMEOUT_SECS must be a valid number")?,
            ),
            extraction_strategy,
            interpreter,
            refresh_schedule: env::var("REFRESH_SCHEDULE")
                .unwrap_or_else(|_| DEFAULT_REFRESH_SCHEDULE.to_string()),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }
}
