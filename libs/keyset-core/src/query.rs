//! Validation of raw list parameters into a typed [`ListQuery`].

use serde::{Deserialize, Serialize};

use crate::catalog::{SortCatalog, SortKey};
use crate::cursor::{decode_cursor, Cursor, Direction};
use crate::error::{Error, Result};
use crate::order::SortDir;

/// Raw list parameters exactly as they arrive on the query string.
///
/// Every field is kept as text so that validation errors can name the
/// offending parameter instead of failing inside the deserializer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub after_value: Option<String>,
    #[serde(default)]
    pub before_value: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

/// Page size policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitCfg {
    pub default: u64,
    pub max: u64,
}

impl Default for LimitCfg {
    fn default() -> Self {
        Self {
            default: 25,
            max: 1000,
        }
    }
}

/// Validate a raw `limit`. Out-of-range values are rejected, never clamped.
pub fn parse_limit(raw: Option<&str>, cfg: LimitCfg) -> Result<u64> {
    let Some(raw) = raw else {
        return Ok(cfg.default);
    };
    let n: i64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::invalid_parameter("limit", format!("'{raw}' is not an integer")))?;
    if n < 1 || n as u64 > cfg.max {
        return Err(Error::invalid_parameter(
            "limit",
            format!("must be between 1 and {}, got {n}", cfg.max),
        ));
    }
    Ok(n as u64)
}

/// A validated list request for one resource type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub sort: SortKey,
    pub order: SortDir,
    pub limit: u64,
    pub search: Option<String>,
    /// `None` starts at the beginning of the ordering (After) or the end (Before).
    pub cursor: Option<Cursor>,
    pub direction: Direction,
}

impl ListQuery {
    /// First page in the catalog's default ordering.
    pub fn first(catalog: &SortCatalog, limit: u64) -> Self {
        Self {
            sort: catalog.default_key(),
            order: catalog.default_order(),
            limit,
            search: None,
            cursor: None,
            direction: Direction::After,
        }
    }

    pub fn parse(params: &ListParams, catalog: &SortCatalog, limits: LimitCfg) -> Result<Self> {
        let sort = match params.sort_by.as_deref() {
            None | Some("") => catalog.default_key(),
            Some(name) => catalog.resolve(name).ok_or_else(|| {
                let supported: Vec<_> = catalog.supported_sort_bys().collect();
                Error::invalid_parameter(
                    "sortBy",
                    format!("unsupported field '{name}', expected one of {}", supported.join(", ")),
                )
            })?,
        };

        let order = match params.sort_order.as_deref() {
            None | Some("") => catalog.default_order(),
            Some(raw) => raw
                .parse::<SortDir>()
                .map_err(|reason| Error::invalid_parameter("sortOrder", reason))?,
        };

        let limit = parse_limit(params.limit.as_deref(), limits)?;

        let search = params
            .q
            .as_deref()
            .filter(|q| !q.is_empty())
            .map(str::to_owned);

        if params.after_value.is_some() && params.after.is_none() {
            return Err(Error::invalid_parameter(
                "afterValue",
                "only allowed together with 'after'",
            ));
        }
        if params.before_value.is_some() && params.before.is_none() {
            return Err(Error::invalid_parameter(
                "beforeValue",
                "only allowed together with 'before'",
            ));
        }

        let anchor = match (&params.after, &params.before) {
            (Some(_), Some(_)) => {
                return Err(Error::invalid_parameter(
                    "after",
                    "'after' and 'before' are mutually exclusive",
                ))
            }
            (Some(id), None) => Some(("after", id.as_str(), params.after_value.as_deref())),
            (None, Some(id)) => Some(("before", id.as_str(), params.before_value.as_deref())),
            (None, None) => None,
        };

        let (direction, cursor) = match anchor {
            Some((marker, id, value)) => {
                let (direction, cursor) = decode_cursor(catalog, sort, marker, id, value)?;
                (direction, Some(cursor))
            }
            None => (Direction::After, None),
        };

        Ok(Self {
            sort,
            order,
            limit,
            search,
            cursor,
            direction,
        })
    }

    pub fn with_sort(mut self, sort: SortKey, order: SortDir) -> Self {
        self.sort = sort;
        self.order = order;
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = (!term.is_empty()).then_some(term);
        self
    }

    pub fn after(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self.direction = Direction::After;
        self
    }

    pub fn before(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self.direction = Direction::Before;
        self
    }

    /// Last page of the ordering (a `Before` traversal with no anchor).
    pub fn from_end(mut self) -> Self {
        self.cursor = None;
        self.direction = Direction::Before;
        self
    }
}
