//! Behaviour switches where earlier versions of the tracker disagreed.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockbook_core::InventoryError;

/// Whether `add_item` may create a second row with an existing name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateNamePolicy {
    #[default]
    Reject,
    Allow,
}

/// What the loader does with a numeric cell it cannot parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericPolicy {
    /// Treat it as zero and carry on.
    #[default]
    CoerceToZero,
    /// Fail the load with a validation error.
    Strict,
}

/// Ledger kind recorded for an absolute quantity set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecountKindPolicy {
    /// Always `recount`.
    #[default]
    Recount,
    /// `restock` when stock went up, `consume` when it went down.
    BySign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InventoryPolicies {
    pub duplicate_names: DuplicateNamePolicy,
    pub numeric: NumericPolicy,
    pub recount_kind: RecountKindPolicy,
}

impl FromStr for DuplicateNamePolicy {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "allow" => Ok(Self::Allow),
            other => Err(InventoryError::validation(format!(
                "duplicate-name policy must be 'reject' or 'allow', got '{other}'"
            ))),
        }
    }
}

impl FromStr for NumericPolicy {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coerce" | "coerce_to_zero" => Ok(Self::CoerceToZero),
            "strict" => Ok(Self::Strict),
            other => Err(InventoryError::validation(format!(
                "numeric policy must be 'coerce' or 'strict', got '{other}'"
            ))),
        }
    }
}

impl FromStr for RecountKindPolicy {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recount" => Ok(Self::Recount),
            "by_sign" | "by-sign" => Ok(Self::BySign),
            other => Err(InventoryError::validation(format!(
                "recount kind must be 'recount' or 'by_sign', got '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = InventoryPolicies::default();
        assert_eq!(p.duplicate_names, DuplicateNamePolicy::Reject);
        assert_eq!(p.numeric, NumericPolicy::CoerceToZero);
        assert_eq!(p.recount_kind, RecountKindPolicy::Recount);
    }

    #[test]
    fn parse_from_config_strings() {
        assert_eq!("ALLOW".parse::<DuplicateNamePolicy>().unwrap(), DuplicateNamePolicy::Allow);
        assert_eq!("strict".parse::<NumericPolicy>().unwrap(), NumericPolicy::Strict);
        assert_eq!("coerce".parse::<NumericPolicy>().unwrap(), NumericPolicy::CoerceToZero);
        assert_eq!("by-sign".parse::<RecountKindPolicy>().unwrap(), RecountKindPolicy::BySign);
        assert!("sometimes".parse::<DuplicateNamePolicy>().is_err());
    }
}
