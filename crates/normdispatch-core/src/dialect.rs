//! Destination dialects understood by normalization

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// SQL/storage flavor of a destination
///
/// This set is closed: adding a dialect is a breaking change for every
/// consumer that matches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DestinationType {
    Bigquery,
    Clickhouse,
    Mssql,
    Mysql,
    Oracle,
    Postgres,
    Redshift,
    Snowflake,
    Tidb,
}

impl DestinationType {
    /// Every supported dialect, in declaration order
    pub const ALL: [DestinationType; 9] = [
        Self::Bigquery,
        Self::Clickhouse,
        Self::Mssql,
        Self::Mysql,
        Self::Oracle,
        Self::Postgres,
        Self::Redshift,
        Self::Snowflake,
        Self::Tidb,
    ];

    /// Stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bigquery => "BIGQUERY",
            Self::Clickhouse => "CLICKHOUSE",
            Self::Mssql => "MSSQL",
            Self::Mysql => "MYSQL",
            Self::Oracle => "ORACLE",
            Self::Postgres => "POSTGRES",
            Self::Redshift => "REDSHIFT",
            Self::Snowflake => "SNOWFLAKE",
            Self::Tidb => "TIDB",
        }
    }
}

impl std::fmt::Display for DestinationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned when a string does not name a known dialect
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown destination type: {0}")]
pub struct UnknownDestinationType(pub String);

impl FromStr for DestinationType {
    type Err = UnknownDestinationType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|dialect| dialect.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownDestinationType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_names_are_stable() {
        assert_eq!(DestinationType::Postgres.as_str(), "POSTGRES");
        assert_eq!(DestinationType::Tidb.to_string(), "TIDB");
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("mysql".parse::<DestinationType>(), Ok(DestinationType::Mysql));
        assert_eq!("BigQuery".parse::<DestinationType>(), Ok(DestinationType::Bigquery));
        assert!("duckdb".parse::<DestinationType>().is_err());
    }

    #[test]
    fn serializes_screaming_case() {
        let json = serde_json::to_string(&DestinationType::Clickhouse).unwrap();
        assert_eq!(json, "\"CLICKHOUSE\"");

        let parsed: DestinationType = serde_json::from_str("\"SNOWFLAKE\"").unwrap();
        assert_eq!(parsed, DestinationType::Snowflake);
    }

    #[test]
    fn display_roundtrips_through_from_str() {
        for dialect in DestinationType::ALL {
            assert_eq!(dialect.to_string().parse::<DestinationType>(), Ok(dialect));
        }
    }
}
