use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{SortFieldSpec, SortKey};
use crate::cursor::Direction;
use crate::predicate::KeysetRow;

#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn reverse(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

impl FromStr for SortDir {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortDir::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortDir::Desc)
        } else {
            Err(format!("expected 'asc' or 'desc', got '{s}'"))
        }
    }
}

/// Where null values land in a scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NullPlacement {
    First,
    Last,
}

/// One ORDER BY key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderTerm {
    pub field: &'static str,
    pub dir: SortDir,
}

impl OrderTerm {
    pub fn new(field: &'static str, dir: SortDir) -> Self {
        Self { field, dir }
    }

    /// Null is the least value: ascending scans meet nulls first, descending scans last.
    pub fn nulls(&self) -> NullPlacement {
        match self.dir {
            SortDir::Asc => NullPlacement::First,
            SortDir::Desc => NullPlacement::Last,
        }
    }

    pub fn reversed(self) -> Self {
        Self {
            field: self.field,
            dir: self.dir.reverse(),
        }
    }
}

/// Physical scan order for one list request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderPlan {
    pub terms: Vec<OrderTerm>,
    /// Set when the scan runs against the logical order and the fetched page
    /// must be reversed before it is returned.
    pub reverse_after_fetch: bool,
}

impl OrderPlan {
    /// Logical presentation order: the sort field, then the identifier in the same direction.
    pub fn logical(identifier: &SortFieldSpec, sort: SortKey, order: SortDir) -> Vec<OrderTerm> {
        match sort {
            SortKey::Identifier(_) => vec![OrderTerm::new(identifier.name, order)],
            SortKey::Attribute(field) => vec![
                OrderTerm::new(field.name, order),
                OrderTerm::new(identifier.name, order),
            ],
        }
    }

    pub fn new(
        identifier: &SortFieldSpec,
        sort: SortKey,
        order: SortDir,
        direction: Direction,
    ) -> Self {
        let logical = Self::logical(identifier, sort, order);
        match direction {
            Direction::After => Self {
                terms: logical,
                reverse_after_fetch: false,
            },
            Direction::Before => Self {
                terms: logical.into_iter().map(OrderTerm::reversed).collect(),
                reverse_after_fetch: true,
            },
        }
    }
}

/// Compare two rows under `terms`, nulls placed per [`OrderTerm::nulls`].
pub fn compare_rows<R>(terms: &[OrderTerm], a: &R, b: &R) -> Ordering
where
    R: KeysetRow + ?Sized,
{
    for term in terms {
        let ord = a.keyset_value(term.field).cmp(&b.keyset_value(term.field));
        let ord = match term.dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
