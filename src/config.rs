use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How the adapter shapes normalized query words before they reach the
/// index.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum QueryMode {
    /// Append `*` to every word so partial words match.
    #[default]
    PrefixWildcard,
    /// Pass every word through unchanged.
    Literal,
}

/// What happens to previously rendered results when the input drops
/// below the minimum effective length.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ShortQueryPolicy {
    /// Leave the prior results visible.
    #[default]
    KeepPrevious,
    /// Empty the results container.
    Clear,
}

/// Tunables of one search dialog instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Minimum number of alphanumeric characters before a query is
    /// issued.
    pub min_query_len: usize,
    pub mode: QueryMode,
    pub short_query: ShortQueryPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: 3,
            mode: QueryMode::default(),
            short_query: ShortQueryPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_shipped_dialog() {
        let config = SearchConfig::default();
        assert_eq!(config.min_query_len, 3);
        assert_eq!(config.mode, QueryMode::PrefixWildcard);
        assert_eq!(config.short_query, ShortQueryPolicy::KeepPrevious);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"mode": "literal"}"#).unwrap();
        assert_eq!(config.mode, QueryMode::Literal);
        assert_eq!(config.min_query_len, 3);
        assert_eq!(config.short_query, ShortQueryPolicy::KeepPrevious);
    }

    #[test]
    fn policies_round_trip_through_serde() {
        let config = SearchConfig {
            min_query_len: 2,
            mode: QueryMode::Literal,
            short_query: ShortQueryPolicy::Clear,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""short_query":"clear""#));

        let restored: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.short_query, ShortQueryPolicy::Clear);
    }
}
