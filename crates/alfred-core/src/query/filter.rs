/// Filter variants
///
/// A filter pairs an operator with a target field and the client's textual
/// value. The value stays text until it meets a concrete field, either in
/// [`Filter::keep`] against an in-memory record or in [`Filter::to_sql`].
use super::sql::Quoter;
use crate::error::{CoercionError, Error, Result};
use crate::record::{matching_fields, FieldDef, Record};
use crate::value::{parse_bool, parse_timestamp, Value};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Comparison operators accepted in `filter[<field>][<op>]` keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Case-insensitive substring match
    #[serde(rename = "like")]
    Like,
    #[serde(rename = "eq")]
    Equal,
    #[serde(rename = "gt")]
    GreaterThan,
    #[serde(rename = "gte")]
    GreaterOrEqual,
    #[serde(rename = "lt")]
    LessThan,
    #[serde(rename = "lte")]
    LessOrEqual,
    /// Membership in a comma-delimited list
    #[serde(rename = "contain")]
    Contain,
}

impl Operator {
    /// All operators, in wire-token order
    pub const ALL: [Operator; 7] = [
        Operator::Like,
        Operator::Equal,
        Operator::GreaterThan,
        Operator::GreaterOrEqual,
        Operator::LessThan,
        Operator::LessOrEqual,
        Operator::Contain,
    ];

    /// Token used in query parameters
    pub fn token(&self) -> &'static str {
        match self {
            Operator::Like => "like",
            Operator::Equal => "eq",
            Operator::GreaterThan => "gt",
            Operator::GreaterOrEqual => "gte",
            Operator::LessThan => "lt",
            Operator::LessOrEqual => "lte",
            Operator::Contain => "contain",
        }
    }

    fn sql_symbol(&self) -> &'static str {
        match self {
            Operator::Like => "ILIKE",
            Operator::Equal => "=",
            Operator::GreaterThan => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessOrEqual => "<=",
            Operator::Contain => "@>",
        }
    }

    fn is_ordering(&self) -> bool {
        matches!(
            self,
            Operator::GreaterThan
                | Operator::GreaterOrEqual
                | Operator::LessThan
                | Operator::LessOrEqual
        )
    }

    /// Whether `field <op> value` holds given `field.cmp(value)`.
    ///
    /// `Contain` on scalar fields degrades to equality.
    fn holds(&self, ordering: Ordering) -> bool {
        match self {
            Operator::Equal | Operator::Contain => ordering == Ordering::Equal,
            Operator::GreaterThan => ordering == Ordering::Greater,
            Operator::GreaterOrEqual => ordering != Ordering::Less,
            Operator::LessThan => ordering == Ordering::Less,
            Operator::LessOrEqual => ordering != Ordering::Greater,
            Operator::Like => false,
        }
    }
}

impl FromStr for Operator {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.token() == s)
            .ok_or(())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// One filter: `param <operator> value`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filter {
    pub operator: Operator,
    /// Target field name or alias
    pub param: String,
    /// Raw client value, coerced lazily
    pub value: String,
}

impl Filter {
    pub fn new(operator: Operator, param: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            operator,
            param: param.into(),
            value: value.into(),
        }
    }

    pub fn like(param: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(Operator::Like, param, value)
    }

    pub fn eq(param: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(Operator::Equal, param, value)
    }

    pub fn gt(param: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(Operator::GreaterThan, param, value)
    }

    pub fn gte(param: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(Operator::GreaterOrEqual, param, value)
    }

    pub fn lt(param: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(Operator::LessThan, param, value)
    }

    pub fn lte(param: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(Operator::LessOrEqual, param, value)
    }

    pub fn contain(param: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(Operator::Contain, param, value)
    }

    /// Whether `record` satisfies this filter.
    ///
    /// Every field whose name or alias equals `param` must pass. A record
    /// without such a field is kept.
    pub fn keep<R: Record>(&self, record: &R) -> Result<bool> {
        for (index, field) in matching_fields(R::FIELDS, &self.param) {
            let Some(value) = record.value(index) else {
                continue;
            };
            if !self.test(field, value)? {
                tracing::trace!(
                    param = %self.param,
                    operator = %self.operator,
                    field = field.name,
                    "filter rejected record"
                );
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn test(&self, field: &FieldDef, value: Value<'_>) -> Result<bool> {
        let op = self.operator;
        match value {
            Value::Text(text) => match op {
                Operator::Like => Ok(contains_ignore_case(text, &self.value)),
                Operator::Equal => Ok(text == self.value),
                Operator::Contain => Ok(text.split(',').any(|item| item == self.value)),
                _ => Err(self.unsupported(field, value)),
            },
            Value::List(items) if op == Operator::Contain => {
                Ok(items.iter().any(|item| *item == self.value))
            }
            Value::Integer(n) if op != Operator::Like => {
                let wanted = self.coerce(self.value.parse::<i64>())?;
                Ok(op.holds(n.cmp(&wanted)))
            }
            Value::Float(x) if op != Operator::Like => {
                let wanted = self.coerce(self.value.parse::<f64>())?;
                Ok(x.partial_cmp(&wanted).is_some_and(|ord| op.holds(ord)))
            }
            Value::Boolean(b) if op == Operator::Equal => {
                let wanted = self.coerce(parse_bool(&self.value))?;
                Ok(b == wanted)
            }
            Value::Timestamp(t) if op == Operator::Equal || op.is_ordering() => {
                let wanted = self.coerce(parse_timestamp(&self.value))?;
                Ok(op.holds(t.cmp(&wanted)))
            }
            _ => Err(self.unsupported(field, value)),
        }
    }

    fn coerce<T, E: Into<CoercionError>>(&self, parsed: std::result::Result<T, E>) -> Result<T> {
        parsed.map_err(|err| Error::ParamType {
            param: self.param.clone(),
            source: err.into(),
        })
    }

    fn unsupported(&self, field: &FieldDef, value: Value<'_>) -> Error {
        Error::UnsupportedFieldType {
            field: field.name.to_string(),
            kind: value.kind(),
            operator: self.operator,
        }
    }

    /// SQL predicate for this filter.
    ///
    /// `Like` renders as `ILIKE '%value%'` with the value's pattern
    /// characters escaped, `Contain` as an array containment test on the
    /// comma-split column with the value as a single array element.
    pub fn to_sql(&self, quoter: &dyn Quoter) -> String {
        let column = quoter.quote_identifier(&self.param);
        match self.operator {
            Operator::Like => format!(
                "{} ILIKE {}",
                column,
                quoter.quote_literal(&format!("%{}%", escape_like_pattern(&self.value)))
            ),
            Operator::Contain => format!(
                "string_to_array({}, ',') @> {}",
                column,
                quoter.quote_literal(&format!("{{{}}}", array_element(&self.value)))
            ),
            op => format!(
                "{} {} {}",
                column,
                op.sql_symbol(),
                quoter.quote_literal(&self.value)
            ),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:?}", self.param, self.operator, self.value)
    }
}

/// Ordered conjunction of filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters(Vec<Filter>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filter: Filter) {
        self.0.push(filter);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Filter> {
        self.0.iter()
    }

    /// Whether `record` passes every filter.
    ///
    /// Filters run in order; the first rejection or the first error ends the
    /// evaluation.
    pub fn keep<R: Record>(&self, record: &R) -> Result<bool> {
        for filter in &self.0 {
            if !filter.keep(record)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// SQL predicates joined with `AND`, or `None` without filters
    pub fn to_sql(&self, quoter: &dyn Quoter) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        let predicates: Vec<String> = self.0.iter().map(|f| f.to_sql(quoter)).collect();
        Some(predicates.join(" AND "))
    }
}

impl std::ops::Index<usize> for Filters {
    type Output = Filter;

    fn index(&self, index: usize) -> &Filter {
        &self.0[index]
    }
}

impl From<Vec<Filter>> for Filters {
    fn from(filters: Vec<Filter>) -> Self {
        Self(filters)
    }
}

impl FromIterator<Filter> for Filters {
    fn from_iter<I: IntoIterator<Item = Filter>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Filters {
    type Item = &'a Filter;
    type IntoIter = std::slice::Iter<'a, Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Escape LIKE pattern characters so the value matches literally
fn escape_like_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Render `value` as one element of an array literal.
///
/// Elements holding delimiters, braces, quotes, backslashes or whitespace,
/// and the bare word `NULL`, are double-quoted with `"` and `\` escaped.
fn array_element(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value.eq_ignore_ascii_case("null")
        || value
            .chars()
            .any(|c| matches!(c, ',' | '{' | '}' | '"' | '\\') || c.is_whitespace());
    if !needs_quotes {
        return value.to_string();
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::sql::PostgresQuoter;
    use crate::value::{IntoValue, ValueKind};
    use chrono::{DateTime, TimeZone, Utc};

    struct Hero {
        name: String,
        alive: bool,
        age: i64,
        score: f64,
        born: DateTime<Utc>,
        powers: Vec<String>,
    }

    impl Record for Hero {
        const FIELDS: &'static [FieldDef] = &[
            FieldDef::new("Name").with_alias("name"),
            FieldDef::new("Alive").with_alias("alive"),
            FieldDef::new("Age").with_alias("age"),
            FieldDef::new("Score").with_alias("score"),
            FieldDef::new("Born").with_alias("born"),
            FieldDef::new("Powers").with_alias("powers"),
        ];

        fn value(&self, index: usize) -> Option<Value<'_>> {
            match index {
                0 => Some(self.name.to_value()),
                1 => Some(self.alive.to_value()),
                2 => Some(self.age.to_value()),
                3 => Some(self.score.to_value()),
                4 => Some(self.born.to_value()),
                5 => Some(self.powers.to_value()),
                _ => None,
            }
        }
    }

    fn bruce() -> Hero {
        Hero {
            name: "Bruce,Wayne".to_string(),
            alive: true,
            age: 39,
            score: 9.5,
            born: Utc.with_ymd_and_hms(1985, 2, 19, 0, 0, 0).unwrap(),
            powers: vec!["money".to_string(), "gadgets".to_string()],
        }
    }

    fn keep(filter: Filter) -> Result<bool> {
        filter.keep(&bruce())
    }

    #[test]
    fn test_like() {
        assert_eq!(keep(Filter::like("name", "bruce")), Ok(true));
        assert_eq!(keep(Filter::like("name", "WAYNE")), Ok(true));
        assert_eq!(keep(Filter::like("name", "diana")), Ok(false));
    }

    #[test]
    fn test_equal_per_kind() {
        assert_eq!(keep(Filter::eq("name", "Bruce,Wayne")), Ok(true));
        assert_eq!(keep(Filter::eq("name", "bruce,wayne")), Ok(false));
        assert_eq!(keep(Filter::eq("alive", "1")), Ok(true));
        assert_eq!(keep(Filter::eq("alive", "0")), Ok(false));
        assert_eq!(keep(Filter::eq("age", "39")), Ok(true));
        assert_eq!(keep(Filter::eq("score", "9.5")), Ok(true));
        assert_eq!(keep(Filter::eq("born", "1985-02-19T01:00:00+01:00")), Ok(true));
    }

    #[test]
    fn test_integer_ordering() {
        assert_eq!(keep(Filter::gt("age", "32")), Ok(true));
        assert_eq!(keep(Filter::gt("age", "39")), Ok(false));
        assert_eq!(keep(Filter::gte("age", "39")), Ok(true));
        assert_eq!(keep(Filter::gte("age", "42")), Ok(false));
        assert_eq!(keep(Filter::lt("age", "42")), Ok(true));
        assert_eq!(keep(Filter::lt("age", "39")), Ok(false));
        assert_eq!(keep(Filter::lte("age", "39")), Ok(true));
        assert_eq!(keep(Filter::lte("age", "24")), Ok(false));
    }

    #[test]
    fn test_float_ordering() {
        assert_eq!(keep(Filter::gt("score", "9.4")), Ok(true));
        assert_eq!(keep(Filter::lt("score", "9.5")), Ok(false));
        assert_eq!(keep(Filter::lte("score", "9.5")), Ok(true));
    }

    #[test]
    fn test_timestamp_boundaries() {
        assert_eq!(keep(Filter::gte("born", "1985-02-19T00:00:00Z")), Ok(true));
        assert_eq!(keep(Filter::gt("born", "1985-02-19T00:00:00Z")), Ok(false));
        assert_eq!(keep(Filter::lte("born", "1985-02-19T00:00:00Z")), Ok(true));
        assert_eq!(keep(Filter::lt("born", "2000-01-01T00:00:00Z")), Ok(true));
    }

    #[test]
    fn test_contain() {
        assert_eq!(keep(Filter::contain("name", "Bruce")), Ok(true));
        assert_eq!(keep(Filter::contain("name", "Diana")), Ok(false));
        assert_eq!(keep(Filter::contain("powers", "gadgets")), Ok(true));
        assert_eq!(keep(Filter::contain("powers", "flight")), Ok(false));
    }

    #[test]
    fn test_numeric_contain_is_equality() {
        assert_eq!(keep(Filter::contain("age", "39")), Ok(true));
        assert_eq!(keep(Filter::contain("age", "3")), Ok(false));
    }

    #[test]
    fn test_declared_name_matches_too() {
        assert_eq!(keep(Filter::gte("Age", "39")), Ok(true));
    }

    #[test]
    fn test_unknown_param_is_noop() {
        assert_eq!(keep(Filter::eq("planet", "Krypton")), Ok(true));
        assert_eq!(keep(Filter::gt("planet", "not a number")), Ok(true));
    }

    #[test]
    fn test_param_type_errors() {
        let err = keep(Filter::gt("age", "old")).unwrap_err();
        assert!(matches!(err, Error::ParamType { ref param, .. } if param == "age"));

        let err = keep(Filter::eq("alive", "maybe")).unwrap_err();
        assert!(matches!(
            err,
            Error::ParamType {
                source: CoercionError::Boolean(_),
                ..
            }
        ));

        let err = keep(Filter::gte("born", "yesterday")).unwrap_err();
        assert!(err.to_string().contains("supported format RFC3339"));
    }

    #[test]
    fn test_unsupported_operator_for_kind() {
        let err = keep(Filter::gt("name", "Bruce")).unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedFieldType {
                field: "Name".to_string(),
                kind: ValueKind::Text,
                operator: Operator::GreaterThan,
            }
        );
        assert!(keep(Filter::lt("alive", "true")).is_err());
        assert!(keep(Filter::like("age", "3")).is_err());
        assert!(keep(Filter::eq("powers", "money")).is_err());
        assert!(matches!(
            keep(Filter::contain("born", "1985-02-19T00:00:00Z")),
            Err(Error::UnsupportedFieldType {
                kind: ValueKind::Timestamp,
                ..
            })
        ));
    }

    #[test]
    fn test_keep_is_deterministic() {
        let hero = bruce();
        let filter = Filter::gte("age", "39");
        assert_eq!(filter.keep(&hero), filter.keep(&hero));
    }

    #[test]
    fn test_filters_short_circuit_in_order() {
        // The rejection comes first, so the bad value is never coerced.
        let filters: Filters = vec![Filter::eq("age", "40"), Filter::gt("age", "old")].into();
        assert_eq!(filters.keep(&bruce()), Ok(false));

        let filters: Filters = vec![Filter::gt("age", "old"), Filter::eq("age", "40")].into();
        assert!(filters.keep(&bruce()).is_err());

        assert_eq!(Filters::new().keep(&bruce()), Ok(true));
    }

    #[test]
    fn test_to_sql() {
        let q = PostgresQuoter;
        assert_eq!(
            Filter::like("name", "batman").to_sql(&q),
            r#""name" ILIKE '%batman%'"#
        );
        assert_eq!(Filter::eq("name", "batman").to_sql(&q), r#""name" = 'batman'"#);
        assert_eq!(Filter::gt("age", "42").to_sql(&q), r#""age" > '42'"#);
        assert_eq!(Filter::gte("age", "42").to_sql(&q), r#""age" >= '42'"#);
        assert_eq!(Filter::lt("age", "42").to_sql(&q), r#""age" < '42'"#);
        assert_eq!(Filter::lte("age", "42").to_sql(&q), r#""age" <= '42'"#);
        assert_eq!(
            Filter::contain("tags", "Bruce").to_sql(&q),
            r#"string_to_array("tags", ',') @> '{Bruce}'"#
        );
    }

    #[test]
    fn test_like_sql_escapes_pattern_characters() {
        let sql = Filter::like("name", "50%_off").to_sql(&PostgresQuoter);
        assert_eq!(sql, r#""name" ILIKE E'%50\\%\\_off%'"#);
    }

    #[test]
    fn test_contain_sql_keeps_value_as_one_element() {
        let q = PostgresQuoter;
        assert_eq!(
            Filter::contain("tags", "a,b").to_sql(&q),
            r#"string_to_array("tags", ',') @> '{"a,b"}'"#
        );
        assert_eq!(
            Filter::contain("tags", "x}").to_sql(&q),
            r#"string_to_array("tags", ',') @> '{"x}"}'"#
        );
        assert_eq!(
            Filter::contain("tags", "two words").to_sql(&q),
            r#"string_to_array("tags", ',') @> '{"two words"}'"#
        );
        assert_eq!(
            Filter::contain("tags", "NULL").to_sql(&q),
            r#"string_to_array("tags", ',') @> '{"NULL"}'"#
        );
        assert_eq!(
            Filter::contain("tags", r#"a"b"#).to_sql(&q),
            r#"string_to_array("tags", ',') @> E'{"a\\"b"}'"#
        );

        // A delimiter inside the value never matches in memory either.
        assert_eq!(keep(Filter::contain("name", "Bruce,Wayne")), Ok(false));
    }

    #[test]
    fn test_filters_to_sql_joins_with_and() {
        let filters: Filters = vec![Filter::gt("age", "18"), Filter::like("name", "a")].into();
        assert_eq!(
            filters.to_sql(&PostgresQuoter).unwrap(),
            r#""age" > '18' AND "name" ILIKE '%a%'"#
        );
        assert_eq!(Filters::new().to_sql(&PostgresQuoter), None);
    }

    #[test]
    fn test_operator_tokens_round_trip() {
        for op in Operator::ALL {
            assert_eq!(op.token().parse::<Operator>(), Ok(op));
        }
        assert!("ne".parse::<Operator>().is_err());
    }
}
