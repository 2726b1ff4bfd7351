/// Parsed list directive
///
/// Pagination, sort and filters for one request. Built once by the parser
/// (or by hand) and then only read.
use super::filter::{Filter, Filters};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    /// Parse a client order token.
    ///
    /// `desc`/`descending` in any case select [`Order::Desc`]; `asc`,
    /// `ascending` and the empty string select [`Order::Asc`]. Anything else
    /// is `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "" | "asc" | "ascending" => Some(Order::Asc),
            "desc" | "descending" => Some(Order::Desc),
            _ => None,
        }
    }

    pub fn is_desc(&self) -> bool {
        matches!(self, Order::Desc)
    }

    /// SQL keyword
    pub fn as_sql(&self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Filtering, sorting and pagination parameters for one list request.
///
/// `limit == 0` means no limit and `offset == 0` means no offset. An empty
/// `sort_by` leaves the order untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOption {
    pub limit: usize,
    pub offset: usize,
    /// Field name to sort by
    pub sort_by: String,
    pub order: Order,
    pub filters: Filters,
}

impl QueryOption {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_sort<S: Into<String>>(mut self, sort_by: S, order: Order) -> Self {
        self.sort_by = sort_by.into();
        self.order = order;
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Limit, or `None` when unbounded
    pub fn page_limit(&self) -> Option<usize> {
        (self.limit > 0).then_some(self.limit)
    }

    pub fn has_sort(&self) -> bool {
        !self.sort_by.is_empty()
    }
}
