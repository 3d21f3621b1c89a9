// ABOUTME: Notification settings for the end-of-run report email.
// ABOUTME: SMTP host, credentials, and recipient.

use serde::Deserialize;
use std::time::Duration;

use super::EnvValue;

#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    /// Recipient of the run report.
    #[serde(default)]
    pub admin: String,

    /// Sender address, also the SMTP login.
    #[serde(default)]
    pub sender: String,

    #[serde(default)]
    pub password: EnvValue,

    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default = "default_subject")]
    pub subject: String,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_subject() -> String {
    "Deployment Status".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            admin: String::new(),
            sender: String::new(),
            password: EnvValue::default(),
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            subject: default_subject(),
            timeout: default_timeout(),
        }
    }
}
