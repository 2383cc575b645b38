//! Keyset range request → SeaORM `Select` (filter, order, limit).
//!
//! Dialect-neutral predicates and order terms come from `keyset-core`; this
//! module maps API field names onto entity columns and picks the null-ordering
//! form the connected backend understands.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use keyset_core::{
    CompareOp, ListQuery, NullPlacement, OrderTerm, Page, Predicate, RangeRequest, RangeScan,
    SortCatalog, SortDir, TypedValue,
};
use sea_orm::{
    sea_query::{Expr, Func, LikeExpr, NullOrdering, Order},
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Select,
};
use thiserror::Error;

use crate::dialect::{Dialect, NullStrategy};

#[derive(Clone)]
pub struct Field<E: EntityTrait> {
    pub col: E::Column,
    pub nullable: bool,
}

/// Whitelist of API field names and the columns behind them.
#[derive(Clone)]
pub struct FieldMap<E: EntityTrait> {
    map: HashMap<&'static str, Field<E>>,
}

impl<E: EntityTrait> Default for FieldMap<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityTrait> FieldMap<E> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn insert(mut self, api_name: &'static str, col: E::Column) -> Self {
        self.map.insert(
            api_name,
            Field {
                col,
                nullable: false,
            },
        );
        self
    }

    pub fn insert_nullable(mut self, api_name: &'static str, col: E::Column) -> Self {
        self.map.insert(
            api_name,
            Field {
                col,
                nullable: true,
            },
        );
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field<E>> {
        self.map.get(name)
    }

    /// Catalog fields (sortable or searchable) without a mapped column.
    pub fn missing_for(&self, catalog: &SortCatalog) -> Vec<&'static str> {
        let mut missing: Vec<&'static str> = Vec::new();
        for name in catalog
            .supported_sort_bys()
            .chain(catalog.search_fields().iter().copied())
        {
            if !self.map.contains_key(name) && !missing.contains(&name) {
                missing.push(name);
            }
        }
        missing
    }

    fn resolve(&self, name: &str) -> KeysetBuildResult<&Field<E>> {
        self.get(name)
            .ok_or_else(|| KeysetBuildError::UnknownField(name.to_owned()))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeysetBuildError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("null comparison on field {0}")]
    NullComparison(&'static str),
}

pub type KeysetBuildResult<T> = Result<T, KeysetBuildError>;

impl From<KeysetBuildError> for keyset_core::Error {
    fn from(e: KeysetBuildError) -> Self {
        keyset_core::Error::storage(e)
    }
}

/* ---------- value / LIKE helpers ---------- */

pub fn to_sea_value(v: &TypedValue) -> Option<sea_orm::Value> {
    match v {
        TypedValue::Null => None,
        TypedValue::String(s) => Some(sea_orm::Value::String(Some(Box::new(s.clone())))),
        TypedValue::Timestamp(ts) => Some(sea_orm::Value::ChronoDateTimeUtc(Some(Box::new(*ts)))),
    }
}

fn like_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '%' | '_' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            c => out.push(c),
        }
    }
    out
}

fn like_contains(s: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", like_escape(s))).escape('\\')
}

/* ---------- Predicate -> Condition ---------- */

pub fn predicate_to_condition<E>(p: &Predicate, fmap: &FieldMap<E>) -> KeysetBuildResult<Condition>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    Ok(match p {
        Predicate::Any(parts) => {
            let mut cond = Condition::any();
            for part in parts {
                cond = cond.add(predicate_to_condition(part, fmap)?);
            }
            cond
        }
        Predicate::All(parts) => {
            let mut cond = Condition::all();
            for part in parts {
                cond = cond.add(predicate_to_condition(part, fmap)?);
            }
            cond
        }
        Predicate::Compare { field, op, value } => {
            let col = fmap.resolve(field)?.col;
            let v = to_sea_value(value).ok_or(KeysetBuildError::NullComparison(*field))?;
            let e = match op {
                CompareOp::Eq => Expr::col(col).eq(v),
                CompareOp::Gt => Expr::col(col).gt(v),
                CompareOp::Lt => Expr::col(col).lt(v),
            };
            Condition::all().add(e)
        }
        Predicate::IsNull(field) => Condition::all().add(Expr::col(fmap.resolve(field)?.col).is_null()),
        Predicate::IsNotNull(field) => {
            Condition::all().add(Expr::col(fmap.resolve(field)?.col).is_not_null())
        }
        Predicate::Contains { field, term } => {
            // LIKE is case-sensitive on PostgreSQL only; lower both sides everywhere.
            let lowered = Func::lower(Expr::col(fmap.resolve(field)?.col));
            Condition::all().add(Expr::expr(lowered).like(like_contains(&term.to_lowercase())))
        }
    })
}

/* ---------- OrderTerm -> ORDER BY ---------- */

/// Apply order terms with nulls placed per [`OrderTerm::nulls`] on any backend.
pub fn apply_order<E, Q>(
    query: Q,
    terms: &[OrderTerm],
    fmap: &FieldMap<E>,
    dialect: Dialect,
) -> KeysetBuildResult<Q>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
    Q: QueryOrder,
{
    let mut query = query;
    for term in terms {
        let field = fmap.resolve(term.field)?;
        let asc = term.dir == SortDir::Asc;
        let ord = if asc { Order::Asc } else { Order::Desc };
        if !field.nullable {
            query = query.order_by(field.col, ord);
            continue;
        }
        query = match dialect.strategy(asc, term.nulls()) {
            NullStrategy::Native => query.order_by(field.col, ord),
            NullStrategy::Clause => {
                let nulls = match term.nulls() {
                    NullPlacement::First => NullOrdering::First,
                    NullPlacement::Last => NullOrdering::Last,
                };
                query.order_by_with_nulls(field.col, ord, nulls)
            }
            NullStrategy::IsNullTerm => {
                // (col IS NULL) is 1 for nulls: DESC puts them first.
                let null_ord = match term.nulls() {
                    NullPlacement::First => Order::Desc,
                    NullPlacement::Last => Order::Asc,
                };
                query
                    .order_by(Expr::col(field.col).is_null(), null_ord)
                    .order_by(field.col, ord)
            }
        };
    }
    Ok(query)
}

/// Build the full `Select` for a range request on top of `base`.
pub fn build_range_select<E>(
    base: Select<E>,
    req: &RangeRequest,
    fmap: &FieldMap<E>,
    dialect: Dialect,
) -> KeysetBuildResult<Select<E>>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    let mut select = base;
    if let Some(filter) = req.filter() {
        select = select.filter(predicate_to_condition(&filter, fmap)?);
    }
    select = apply_order(select, &req.order, fmap, dialect)?;
    Ok(select.limit(req.limit))
}

/* ---------- RangeScan over a connection ---------- */

/// Range scan running on a pooled connection or an open transaction.
pub struct SeaOrmScan<'a, E: EntityTrait, C> {
    conn: &'a C,
    fields: &'a FieldMap<E>,
    base: Select<E>,
}

impl<'a, E, C> SeaOrmScan<'a, E, C>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    pub fn new(conn: &'a C, fields: &'a FieldMap<E>) -> Self {
        Self {
            conn,
            fields,
            base: E::find(),
        }
    }

    /// Scope the scan with a pre-filtered select (e.g. by owner).
    pub fn with_base(mut self, base: Select<E>) -> Self {
        self.base = base;
        self
    }
}

#[async_trait]
impl<'a, E, C> RangeScan for SeaOrmScan<'a, E, C>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
    C: ConnectionTrait,
{
    type Row = E::Model;

    async fn scan(&self, req: &RangeRequest) -> keyset_core::Result<Vec<E::Model>> {
        let dialect = Dialect::of(self.conn.get_database_backend());
        let select = build_range_select(self.base.clone(), req, self.fields, dialect)?;
        select
            .all(self.conn)
            .await
            .map_err(|e| keyset_core::Error::storage(e.to_string()))
    }
}

/// One-shot keyset pagination over `base`.
pub async fn paginate_select<E, C>(
    conn: &C,
    base: Select<E>,
    fields: &FieldMap<E>,
    catalog: &SortCatalog,
    query: &ListQuery,
    deadline: Option<Duration>,
) -> keyset_core::Result<Page<E::Model>>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
    C: ConnectionTrait,
{
    let scan = SeaOrmScan::new(conn, fields).with_base(base);
    keyset_core::paginate(&scan, catalog, query, deadline).await
}
