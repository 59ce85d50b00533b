use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct EstimateConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub smtp: SmtpConfig,
    pub ai: AiConfig,
    pub memo: MemoConfig,
    pub notify: NotifyConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl AiConfig {
    /// The adjustment stage runs only when a key is configured; without one
    /// every quote falls back to the rule fee.
    pub fn enabled(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemoConfig {
    pub rest_api_key: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub authorize_endpoint: String,
    pub token_endpoint: String,
    pub send_endpoint: String,
    pub site_url: String,
}

impl MemoConfig {
    pub fn enabled(&self) -> bool {
        !self.rest_api_key.is_empty() && !self.redirect_uri.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    /// Staff addresses for the estimate summary mail. Empty list disables
    /// the email channel.
    pub email_recipients: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Allowed browser origins for the quote form. Empty list means any
    /// origin, matching the historical deployment behind Netlify previews.
    pub allowed_origins: Vec<String>,
}

impl EstimateConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(EstimateConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", Some("mongodb://localhost:27017"), is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("pleo_ops"), is_prod)?,
            },
            smtp: SmtpConfig {
                host: get_env("SMTP_HOST", Some("smtp.gmail.com"), is_prod)?,
                port: get_env("SMTP_PORT", Some("587"), is_prod)?
                    .parse()
                    .unwrap_or(587),
                user: env::var("SMTP_USER").unwrap_or_default(),
                password: env::var("SMTP_PASS").unwrap_or_default(),
                from_email: get_env("SMTP_FROM_EMAIL", Some("noreply@example.com"), is_prod)?,
                from_name: get_env("SMTP_FROM_NAME", Some("자동견적"), is_prod)?,
                enabled: env::var("SMTP_ENABLED")
                    .unwrap_or_else(|_| "false".to_string())
                    .parse()
                    .unwrap_or(false),
            },
            ai: AiConfig {
                api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
                api_base: get_env("OPENAI_API_BASE", Some("https://api.openai.com/v1"), is_prod)?,
                model: get_env("OPENAI_MODEL", Some("gpt-4.1-mini"), is_prod)?,
                timeout_secs: get_env("AI_TIMEOUT_SECS", Some("15"), is_prod)?
                    .parse()
                    .unwrap_or(15),
            },
            memo: MemoConfig {
                rest_api_key: env::var("KAKAO_REST_API_KEY").unwrap_or_default(),
                client_secret: env::var("KAKAO_CLIENT_SECRET").unwrap_or_default(),
                redirect_uri: env::var("KAKAO_REDIRECT_URI").unwrap_or_default(),
                authorize_endpoint: get_env(
                    "KAKAO_AUTHORIZE_ENDPOINT",
                    Some("https://kauth.kakao.com/oauth/authorize"),
                    is_prod,
                )?,
                token_endpoint: get_env(
                    "KAKAO_TOKEN_ENDPOINT",
                    Some("https://kauth.kakao.com/oauth/token"),
                    is_prod,
                )?,
                send_endpoint: get_env(
                    "KAKAO_MEMO_SEND_ENDPOINT",
                    Some("https://kapi.kakao.com/v2/api/talk/memo/default/send"),
                    is_prod,
                )?,
                site_url: get_env("SITE_URL", Some("https://xn--on3b27gxrdt6b.com"), is_prod)?,
            },
            notify: NotifyConfig {
                email_recipients: split_list(&env::var("ESTIMATE_MAIL_TO").unwrap_or_default()),
            },
            cors: CorsConfig {
                allowed_origins: split_list(&env::var("ALLOWED_ORIGIN").unwrap_or_default()),
            },
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::split_list;

    #[test]
    fn split_list_trims_and_drops_empties() {
        assert_eq!(
            split_list("a@x.com, b@y.com ,,"),
            vec!["a@x.com".to_string(), "b@y.com".to_string()]
        );
        assert!(split_list("").is_empty());
    }
}
