//! Environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use stockbook_auth::AdminPassphrase;
use stockbook_inventory::{
    DuplicateNamePolicy, InventoryPolicies, NumericPolicy, RecountKindPolicy,
    UsageWindow,
};

pub const DEFAULT_TABLE: &str = "inventory_data";
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const CATALOG_WORKSHEET: &str = "items";
pub const LEDGER_WORKSHEET: &str = "movements";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}' ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            var,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Everything the service reads from its environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials_path: Option<PathBuf>,
    pub data_dir: PathBuf,
    /// Explicit table name. When unset, the credential bundle's `table`
    /// (or [`DEFAULT_TABLE`]) applies.
    pub table: Option<String>,
    pub admin_passphrase: Option<AdminPassphrase>,
    pub policies: InventoryPolicies,
    pub usage_window: UsageWindow,
    pub bind: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let policies = InventoryPolicies {
            duplicate_names: parse_or_default::<DuplicateNamePolicy>(
                "STOCKBOOK_DUPLICATE_NAMES",
                get("STOCKBOOK_DUPLICATE_NAMES"),
            )?,
            numeric: parse_or_default::<NumericPolicy>(
                "STOCKBOOK_NUMERIC_POLICY",
                get("STOCKBOOK_NUMERIC_POLICY"),
            )?,
            recount_kind: parse_or_default::<RecountKindPolicy>(
                "STOCKBOOK_RECOUNT_KIND",
                get("STOCKBOOK_RECOUNT_KIND"),
            )?,
        };

        let usage_window = match get("STOCKBOOK_USAGE_WINDOW_DAYS") {
            None => UsageWindow::default(),
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|e| e.to_string())
                .and_then(|days| UsageWindow::new(days).map_err(|e| e.to_string()))
                .map_err(|reason| ConfigError::invalid("STOCKBOOK_USAGE_WINDOW_DAYS", &raw, reason))?,
        };

        let bind_raw = get("STOCKBOOK_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_raw
            .parse()
            .map_err(|e| ConfigError::invalid("STOCKBOOK_BIND", &bind_raw, e))?;

        Ok(Self {
            credentials_path: get("STOCKBOOK_CREDENTIALS").map(PathBuf::from),
            data_dir: PathBuf::from(get("STOCKBOOK_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())),
            table: get("STOCKBOOK_TABLE"),
            admin_passphrase: lookup("STOCKBOOK_ADMIN_PASSPHRASE").and_then(AdminPassphrase::new),
            policies,
            usage_window,
            bind,
        })
    }
}

fn parse_or_default<T>(var: &'static str, raw: Option<String>) -> Result<T, ConfigError>
where
    T: core::str::FromStr + Default,
    T::Err: core::fmt::Display,
{
    match raw {
        None => Ok(T::default()),
        Some(raw) => raw.parse().map_err(|e| ConfigError::invalid(var, &raw, e)),
    }
}
