use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Process configuration loaded once from environment variables (and `.env`).
/// Receipt geometry is not configured here; see `LayoutConfig`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory receipts are written to. Defaults to the system temp dir.
    pub output_dir: PathBuf,
    /// When false, receipts are rendered but never sent to the spooler.
    pub print_enabled: bool,
    /// When false, a receipt is deleted after it was printed successfully.
    pub keep_artifacts: bool,
    pub lp_command: String,
    pub lpstat_command: String,
    pub availability_interval_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let output_dir = std::env::var("OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir());

        Ok(Config {
            output_dir,
            print_enabled: env_flag("PRINT_ENABLED", true)?,
            keep_artifacts: env_flag("KEEP_ARTIFACTS", true)?,
            lp_command: std::env::var("LP_COMMAND").unwrap_or_else(|_| "lp".to_string()),
            lpstat_command: std::env::var("LPSTAT_COMMAND")
                .unwrap_or_else(|_| "lpstat".to_string()),
            availability_interval_secs: std::env::var("AVAILABILITY_INTERVAL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse::<u64>()
                .context("AVAILABILITY_INTERVAL_SECS must be a whole number of seconds")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn env_flag(key: &str, default: bool) -> Result<bool> {
    match std::env::var(key) {
        Ok(value) => parse_flag(&value).with_context(|| format!("{key} must be a boolean")),
        Err(_) => Ok(default),
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("unrecognised flag value '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_accepts_common_spellings() {
        assert!(parse_flag("true").unwrap());
        assert!(parse_flag(" YES ").unwrap());
        assert!(parse_flag("1").unwrap());
        assert!(!parse_flag("off").unwrap());
        assert!(!parse_flag("False").unwrap());
    }

    #[test]
    fn test_parse_flag_rejects_garbage() {
        assert!(parse_flag("maybe").is_err());
    }
}
