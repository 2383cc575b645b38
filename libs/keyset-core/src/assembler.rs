//! Assembles a range request from a validated [`ListQuery`] and runs the
//! caller-side pagination pipeline around a storage-provided [`RangeScan`].

use std::time::Duration;

use async_trait::async_trait;

use crate::catalog::SortCatalog;
use crate::error::{Error, Result};
use crate::order::{OrderPlan, OrderTerm};
use crate::page::{Page, PageInfo};
use crate::predicate::{boundary_predicate, Predicate};
use crate::query::ListQuery;

/// One bounded, ordered scan handed to storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeRequest {
    pub search: Option<Predicate>,
    pub boundary: Option<Predicate>,
    /// Physical scan order.
    pub order: Vec<OrderTerm>,
    /// Number of rows to fetch.
    pub limit: u64,
}

impl RangeRequest {
    /// Build the physical request for `query`; `limit` is taken as given.
    pub fn assemble(catalog: &SortCatalog, query: &ListQuery, limit: u64) -> (Self, OrderPlan) {
        let identifier = catalog.default_field();
        let plan = OrderPlan::new(identifier, query.sort, query.order, query.direction);
        let boundary = query.cursor.as_ref().map(|cursor| {
            boundary_predicate(identifier, query.sort, cursor, query.direction, query.order)
        });
        let search = query
            .search
            .as_deref()
            .and_then(|term| search_predicate(catalog, term));

        let req = Self {
            search,
            boundary,
            order: plan.terms.clone(),
            limit,
        };
        (req, plan)
    }

    /// Search and boundary combined with AND; `None` selects every row.
    pub fn filter(&self) -> Option<Predicate> {
        match (self.search.clone(), self.boundary.clone()) {
            (Some(s), Some(b)) => Some(s.and(b)),
            (Some(p), None) | (None, Some(p)) => Some(p),
            (None, None) => None,
        }
    }
}

/// `term` contained in any of the catalog's search fields.
pub fn search_predicate(catalog: &SortCatalog, term: &str) -> Option<Predicate> {
    if term.is_empty() || catalog.search_fields().is_empty() {
        return None;
    }
    Some(Predicate::Any(
        catalog
            .search_fields()
            .iter()
            .copied()
            .map(|field| Predicate::Contains {
                field,
                term: term.to_owned(),
            })
            .collect(),
    ))
}

/// Storage collaborator executing a [`RangeRequest`].
///
/// Rows must come back in the request's physical order, at most `limit` of them.
#[async_trait]
pub trait RangeScan: Send + Sync {
    type Row: Send;

    async fn scan(&self, req: &RangeRequest) -> Result<Vec<Self::Row>>;
}

/// Fetch one page for `query`.
///
/// Over-fetches a single row to learn whether more rows follow, then restores
/// presentation order when the scan ran backwards. A scan that outlives
/// `deadline` fails with [`Error::Storage`]; no partial page is returned.
pub async fn paginate<S>(
    scan: &S,
    catalog: &SortCatalog,
    query: &ListQuery,
    deadline: Option<Duration>,
) -> Result<Page<S::Row>>
where
    S: RangeScan + ?Sized,
{
    let fetch = query.limit.saturating_add(1);
    let (req, plan) = RangeRequest::assemble(catalog, query, fetch);

    tracing::debug!(
        sort = query.sort.name(),
        order = query.order.as_str(),
        direction = query.direction.marker(),
        limit = query.limit,
        has_cursor = query.cursor.is_some(),
        has_search = query.search.is_some(),
        "keyset scan"
    );

    let mut rows = match deadline {
        Some(d) => tokio::time::timeout(d, scan.scan(&req))
            .await
            .map_err(|_| Error::storage(format!("range scan exceeded {}ms", d.as_millis())))??,
        None => scan.scan(&req).await?,
    };

    let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
    let has_more = rows.len() > limit;
    if has_more {
        rows.truncate(limit);
    }
    if plan.reverse_after_fetch {
        rows.reverse();
    }

    Ok(Page::new(
        rows,
        PageInfo {
            limit: query.limit,
            has_more,
        },
    ))
}
