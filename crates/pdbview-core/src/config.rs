//! # Resolver Configuration
//!
//! Knobs that change how [`PdbTypeReader`](crate::resolver::PdbTypeReader)
//! treats unexpected input.
//!
//! ## Environment Variables
//!
//! - `PDBVIEW_UNSUPPORTED_RECORDS`: `strict` or `lenient` (read by
//!   [`ResolverConfig::from_env`])

use std::env;
use std::str::FromStr;

/// What to do when a record kind outside the supported set reaches dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedRecordPolicy
{
    /// Fail with `PdbError::UnsupportedRecord` (default in debug builds)
    Strict,
    /// Produce a placeholder type and log a warning (default in release builds)
    Lenient,
}

impl Default for UnsupportedRecordPolicy
{
    fn default() -> Self
    {
        if cfg!(debug_assertions) {
            UnsupportedRecordPolicy::Strict
        } else {
            UnsupportedRecordPolicy::Lenient
        }
    }
}

impl FromStr for UnsupportedRecordPolicy
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "strict" | "fail" | "error" => Ok(UnsupportedRecordPolicy::Strict),
            "lenient" | "placeholder" | "ignore" => Ok(UnsupportedRecordPolicy::Lenient),
            _ => Err(format!("Unknown record policy: {s}. Use 'strict' or 'lenient'")),
        }
    }
}

/// Settings for a [`PdbTypeReader`](crate::resolver::PdbTypeReader) session.
///
/// ## Example
///
/// ```rust
/// use pdbview_core::config::{ResolverConfig, UnsupportedRecordPolicy};
///
/// let config = ResolverConfig::default()
///     .with_unsupported_records(UnsupportedRecordPolicy::Lenient)
///     .with_forward_reference_resolution(false);
/// assert!(!config.resolve_forward_references);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig
{
    pub unsupported_records: UnsupportedRecordPolicy,
    /// Replace forward declarations with their definitions
    pub resolve_forward_references: bool,
}

impl Default for ResolverConfig
{
    fn default() -> Self
    {
        Self {
            unsupported_records: UnsupportedRecordPolicy::default(),
            resolve_forward_references: true,
        }
    }
}

impl ResolverConfig
{
    /// Default configuration with overrides from the environment.
    ///
    /// Unparseable values are ignored.
    #[must_use]
    pub fn from_env() -> Self
    {
        let unsupported_records = env::var("PDBVIEW_UNSUPPORTED_RECORDS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();

        Self {
            unsupported_records,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_unsupported_records(mut self, policy: UnsupportedRecordPolicy) -> Self
    {
        self.unsupported_records = policy;
        self
    }

    #[must_use]
    pub fn with_forward_reference_resolution(mut self, enabled: bool) -> Self
    {
        self.resolve_forward_references = enabled;
        self
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_policy_from_str()
    {
        assert_eq!(UnsupportedRecordPolicy::from_str("strict").unwrap(), UnsupportedRecordPolicy::Strict);
        assert_eq!(UnsupportedRecordPolicy::from_str("LENIENT").unwrap(), UnsupportedRecordPolicy::Lenient);
        assert!(UnsupportedRecordPolicy::from_str("maybe").is_err());
    }

    #[test]
    fn test_default_policy_follows_build_profile()
    {
        let expected = if cfg!(debug_assertions) {
            UnsupportedRecordPolicy::Strict
        } else {
            UnsupportedRecordPolicy::Lenient
        };
        assert_eq!(ResolverConfig::default().unsupported_records, expected);
        assert!(ResolverConfig::default().resolve_forward_references);
    }
}
