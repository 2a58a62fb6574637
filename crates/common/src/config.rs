use serde::Deserialize;

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection string
    pub database_url: String,

    /// IANA timezone in which "today" is computed (default: UTC)
    pub timezone: String,

    /// Assignment statuses that are still reminder-eligible (default: incomplete, pending)
    pub active_statuses: Vec<String>,

    /// Days ahead of the due date for the early reminder (default: 3)
    pub reminder_lead_days: u32,

    /// Resend API key for email delivery
    pub resend_api_key: Option<String>,

    /// Email sender address
    pub email_from: Option<String>,

    /// Maximum number of PostgreSQL connections in the pool (default: 20)
    pub db_max_connections: u32,

    /// Port the API server binds to (default: 3000)
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            timezone: std::env::var("TIMEZONE").unwrap_or_else(|_| "UTC".to_string()),
            active_statuses: parse_list(
                &std::env::var("ACTIVE_STATUSES").unwrap_or_else(|_| "incomplete,pending".into()),
            ),
            reminder_lead_days: std::env::var("REMINDER_LEAD_DAYS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("REMINDER_LEAD_DAYS must be a valid u32"))?,
            resend_api_key: std::env::var("RESEND_API_KEY").ok(),
            email_from: std::env::var("EMAIL_FROM")
                .or_else(|_| std::env::var("MAIL_FROM"))
                .ok(),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DB_MAX_CONNECTIONS must be a valid u32"))?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid u16"))?,
        })
    }
}

/// Split a comma-separated list, dropping blank entries.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_trims_and_skips_blanks() {
        assert_eq!(
            parse_list(" incomplete, pending ,,"),
            vec!["incomplete".to_string(), "pending".to_string()]
        );
    }

    #[test]
    fn test_parse_list_empty() {
        assert!(parse_list("").is_empty());
    }
}
