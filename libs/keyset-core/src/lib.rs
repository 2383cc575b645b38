//! Keyset (cursor) pagination engine.
//!
//! Rows are ordered by `(sort value, identifier)` with null as the least
//! value. A page is selected by a boundary predicate relative to an anchor
//! row, which keeps traversal stable under arbitrary sort fields, nullable
//! values and backward navigation.
//!
//! The engine is storage-agnostic: it produces a [`RangeRequest`] made of a
//! [`Predicate`] tree and [`OrderTerm`]s, and delegates execution to a
//! [`RangeScan`]. `keyset-db` translates the request for SeaORM;
//! [`MemoryScan`] evaluates it in process.
//!
//! ```rust
//! use keyset_core::{ListParams, ListQuery, LimitCfg, SortCatalog, SortFieldSpec};
//!
//! let catalog = SortCatalog::new(SortFieldSpec::identifier("userId"))
//!     .with_field(SortFieldSpec::string("email"))
//!     .with_search_field("email");
//!
//! let params = ListParams {
//!     sort_by: Some("email".into()),
//!     after: Some("u-17".into()),
//!     after_value: Some("ann@example.com".into()),
//!     ..Default::default()
//! };
//! let query = ListQuery::parse(&params, &catalog, LimitCfg::default()).unwrap();
//! assert_eq!(query.limit, 25);
//! ```

pub mod assembler;
pub mod catalog;
pub mod cursor;
pub mod error;
pub mod memory;
pub mod order;
pub mod page;
pub mod predicate;
pub mod query;
pub mod value;

pub use assembler::{paginate, search_predicate, RangeRequest, RangeScan};
pub use catalog::{SortCatalog, SortFieldSpec, SortKey};
pub use cursor::{decode_cursor, Cursor, Direction};
pub use error::{Error, Result};
pub use memory::MemoryScan;
pub use order::{compare_rows, NullPlacement, OrderPlan, OrderTerm, SortDir};
pub use page::{Page, PageInfo};
pub use predicate::{boundary_predicate, CompareOp, KeysetRow, Predicate, Relation};
pub use query::{parse_limit, LimitCfg, ListParams, ListQuery};
pub use value::{TypedValue, ValueKind};
