//! Parser configuration.

use serde::{Deserialize, Serialize};

use crate::budget::Budget;

/// Duplicate key handling policy for mappings.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum DuplicateKeyPolicy {
    /// Error out on encountering a duplicate key.
    Error,
    /// First key wins: later duplicate pairs are dropped.
    FirstWins,
    /// Last key wins: later duplicate pairs replace earlier ones.
    LastWins,
}

/// Parser configuration options.
///
/// Use this to configure the strictness policies, the duplicate-key policy,
/// and an optional pre-parse YAML [`Budget`].
///
/// ```rust
/// use blockyaml::{DuplicateKeyPolicy, Parser};
///
/// let options = blockyaml::options! {
///     duplicate_keys: DuplicateKeyPolicy::LastWins,
///     strict_booleans: false,
/// };
///
/// let parser = Parser::with_options(options);
/// let value = parser.parse_str("a: 1\na: 2\nb: yes\n").unwrap();
/// assert_eq!(value.get("a").and_then(|v| v.as_i64()), Some(2));
/// assert_eq!(value.get("b").and_then(|v| v.as_bool()), Some(true));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Options {
    /// Optional YAML budget to enforce while scanning (counts raw parser
    /// events). `None` disables budget checks entirely.
    pub budget: Option<Budget>,
    /// Policy for duplicate mapping keys. Default: [`DuplicateKeyPolicy::Error`].
    pub duplicate_keys: DuplicateKeyPolicy,
    /// If true (the default), only the exact literals `true` and `false`
    /// (case-insensitive) are interpreted as booleans, and the YAML 1.1
    /// forms `yes`/`no`/`on`/`off`/`y`/`n` are rejected with an error
    /// unless quoted. If false, the YAML 1.1 forms resolve to booleans.
    pub strict_booleans: bool,
    /// Enable legacy octal parsing where plain scalars starting with `00`
    /// are treated as base-8. Deprecated in YAML 1.2. Default: false.
    pub legacy_octal_numbers: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            budget: Some(Budget::default()),
            duplicate_keys: DuplicateKeyPolicy::Error,
            strict_booleans: true,
            legacy_octal_numbers: false,
        }
    }
}
