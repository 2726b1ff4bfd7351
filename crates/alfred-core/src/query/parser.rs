/// Query-string parser
///
/// Turns wire-level query parameters into a [`QueryOption`]. Parsing never
/// fails: malformed pagination degrades to "unbounded", unknown operators and
/// foreign keys are dropped.
use super::filter::{Filter, Filters, Operator};
use super::option::{Order, QueryOption};
use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Names of the recognized query parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub limit_key: String,
    pub offset_key: String,
    pub sort_key: String,
    pub order_key: String,
    /// Leading word of `<prefix>[<field>][<op>]` filter keys
    pub filter_prefix: String,
    /// Page size cap; a missing or unbounded limit becomes this value
    /// (`None` keeps the limit as given)
    pub max_limit: Option<usize>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            limit_key: "limit".to_string(),
            offset_key: "offset".to_string(),
            sort_key: "sortBy".to_string(),
            order_key: "orderBy".to_string(),
            filter_prefix: "filter".to_string(),
            max_limit: None,
        }
    }
}

impl ParserConfig {
    /// Clamp parsed limits to `max`
    pub fn with_max_limit(mut self, max: usize) -> Self {
        self.max_limit = Some(max);
        self
    }

    pub fn with_filter_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.filter_prefix = prefix.into();
        self
    }
}

static DEFAULT_PARSER: LazyLock<QueryParser> = LazyLock::new(|| {
    let config = ParserConfig::default();
    let pattern =
        filter_key_pattern(&config.filter_prefix).expect("Invalid default filter key pattern");
    QueryParser { config, pattern }
});

fn filter_key_pattern(prefix: &str) -> std::result::Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"^{}\[([A-Za-z0-9_-]+)\]\[([A-Za-z0-9_-]+)\]$",
        regex::escape(prefix)
    ))
}

/// Parser for list query parameters
#[derive(Debug, Clone)]
pub struct QueryParser {
    config: ParserConfig,
    pattern: Regex,
}

impl Default for QueryParser {
    fn default() -> Self {
        DEFAULT_PARSER.clone()
    }
}

impl QueryParser {
    /// Create a parser from a configuration
    pub fn new(config: ParserConfig) -> Result<Self> {
        if config.filter_prefix.is_empty() {
            return Err(Error::InvalidConfig("filter prefix cannot be empty".into()));
        }
        let pattern = filter_key_pattern(&config.filter_prefix)
            .map_err(|err| Error::InvalidConfig(err.to_string()))?;
        Ok(Self { config, pattern })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse an ordered sequence of `(key, value)` pairs.
    ///
    /// Keys may repeat; only the first occurrence of a key is used. Filters
    /// keep the order in which their keys first appear.
    pub fn parse_pairs<I, K, V>(&self, pairs: I) -> QueryOption
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut option = QueryOption::new();
        let mut filters = Filters::new();
        let mut seen = HashSet::new();

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            if !seen.insert(key.to_string()) {
                continue;
            }

            if key == self.config.limit_key {
                option.limit = parse_bound(key, value);
            } else if key == self.config.offset_key {
                option.offset = parse_bound(key, value);
            } else if key == self.config.sort_key {
                option.sort_by = value.to_string();
            } else if key == self.config.order_key {
                option.order = Order::from_token(value).unwrap_or_else(|| {
                    tracing::debug!(token = value, "unknown sort order, using ascending");
                    Order::Asc
                });
            } else if let Some(filter) = self.parse_filter(key, value) {
                filters.push(filter);
            }
        }

        if let Some(max) = self.config.max_limit {
            if option.limit == 0 || option.limit > max {
                option.limit = max;
            }
        }

        option.filters = filters;
        tracing::debug!(
            limit = option.limit,
            offset = option.offset,
            sort_by = %option.sort_by,
            order = %option.order,
            filters = option.filters.len(),
            "parsed query option"
        );
        option
    }

    /// Parse a raw `a=b&c=d` query string, with or without a leading `?`.
    ///
    /// Undecodable input yields the default option.
    pub fn parse_query_string(&self, query: &str) -> QueryOption {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = match serde_urlencoded::from_str(query) {
            Ok(pairs) => pairs,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring undecodable query string");
                Vec::new()
            }
        };
        self.parse_pairs(pairs)
    }

    fn parse_filter(&self, key: &str, value: &str) -> Option<Filter> {
        let captures = self.pattern.captures(key)?;
        let (field, op) = (&captures[1], &captures[2]);
        match op.parse::<Operator>() {
            Ok(operator) => Some(Filter::new(operator, field, value)),
            Err(()) => {
                tracing::debug!(field, operator = op, "dropping filter with unknown operator");
                None
            }
        }
    }
}

/// Non-negative pagination bound; anything unparsable or negative is 0.
fn parse_bound(key: &str, value: &str) -> usize {
    match value.parse::<i64>() {
        Ok(n) => usize::try_from(n).unwrap_or(0),
        Err(_) => {
            if !value.is_empty() {
                tracing::debug!(key, value, "invalid pagination value, using 0");
            }
            0
        }
    }
}

/// Parse `(key, value)` pairs with the default parameter names.
pub fn parse_pairs<I, K, V>(pairs: I) -> QueryOption
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    DEFAULT_PARSER.parse_pairs(pairs)
}

/// Parse a raw query string with the default parameter names.
pub fn parse_query_string(query: &str) -> QueryOption {
    DEFAULT_PARSER.parse_query_string(query)
}
