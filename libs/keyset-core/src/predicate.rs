//! Dialect-neutral filter model and the keyset boundary builder.
//!
//! Ordering is on `(sort value, id)` with null as the least value. The
//! boundary of a page is expressed as a disjunction of mutually exclusive
//! cases so that rows sharing a sort value (null included) are neither
//! skipped nor repeated across pages.

use crate::catalog::{SortFieldSpec, SortKey};
use crate::cursor::{Cursor, Direction};
use crate::order::SortDir;
use crate::value::TypedValue;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gt,
    Lt,
}

/// Boolean condition over named fields.
///
/// `Compare` always carries a non-null value; null tests are explicit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    Any(Vec<Predicate>),
    All(Vec<Predicate>),
    Compare {
        field: &'static str,
        op: CompareOp,
        value: TypedValue,
    },
    IsNull(&'static str),
    IsNotNull(&'static str),
    /// Case-insensitive substring match; never true for a null field.
    Contains { field: &'static str, term: String },
}

/// Row access used when a predicate or ordering is evaluated in process.
pub trait KeysetRow {
    fn keyset_value(&self, field: &str) -> TypedValue;
}

impl Predicate {
    pub fn compare(field: &'static str, op: CompareOp, value: TypedValue) -> Self {
        debug_assert!(!value.is_null(), "null comparisons must use IsNull/IsNotNull");
        Predicate::Compare { field, op, value }
    }

    /// AND two predicates, flattening nested conjunctions.
    pub fn and(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::All(mut a), Predicate::All(b)) => {
                a.extend(b);
                Predicate::All(a)
            }
            (Predicate::All(mut a), p) => {
                a.push(p);
                Predicate::All(a)
            }
            (p, Predicate::All(mut b)) => {
                b.insert(0, p);
                Predicate::All(b)
            }
            (a, b) => Predicate::All(vec![a, b]),
        }
    }

    /// Evaluate against a row. Comparisons involving null are false, as in SQL.
    pub fn matches<R>(&self, row: &R) -> bool
    where
        R: KeysetRow + ?Sized,
    {
        match self {
            Predicate::Any(ps) => ps.iter().any(|p| p.matches(row)),
            Predicate::All(ps) => ps.iter().all(|p| p.matches(row)),
            Predicate::Compare { field, op, value } => {
                let actual = row.keyset_value(field);
                if actual.is_null() || value.is_null() || actual.kind() != value.kind() {
                    return false;
                }
                match op {
                    CompareOp::Eq => actual == *value,
                    CompareOp::Gt => actual > *value,
                    CompareOp::Lt => actual < *value,
                }
            }
            Predicate::IsNull(field) => row.keyset_value(field).is_null(),
            Predicate::IsNotNull(field) => !row.keyset_value(field).is_null(),
            Predicate::Contains { field, term } => match row.keyset_value(field) {
                TypedValue::String(s) => s.to_lowercase().contains(&term.to_lowercase()),
                _ => false,
            },
        }
    }
}

/// Which side of the anchor a page lies on, in ascending key order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    Greater,
    Less,
}

impl Relation {
    pub fn of(direction: Direction, order: SortDir) -> Self {
        match (direction, order) {
            (Direction::After, SortDir::Asc) => Relation::Greater,
            (Direction::After, SortDir::Desc) => Relation::Less,
            (Direction::Before, SortDir::Asc) => Relation::Less,
            (Direction::Before, SortDir::Desc) => Relation::Greater,
        }
    }

    fn op(self) -> CompareOp {
        match self {
            Relation::Greater => CompareOp::Gt,
            Relation::Less => CompareOp::Lt,
        }
    }
}

/// Condition selecting rows strictly beyond the cursor in traversal order.
pub fn boundary_predicate(
    identifier: &SortFieldSpec,
    sort: SortKey,
    cursor: &Cursor,
    direction: Direction,
    order: SortDir,
) -> Predicate {
    let rel = Relation::of(direction, order);
    let id_beyond = Predicate::compare(identifier.name, rel.op(), cursor.anchor_id.clone());

    let field = match sort {
        // Unique and never null: one comparison is the whole boundary.
        SortKey::Identifier(_) => return id_beyond,
        SortKey::Attribute(field) => field.name,
    };

    match (&cursor.anchor_value, rel) {
        // Every non-null value is greater than null; among nulls the id decides.
        (TypedValue::Null, Relation::Greater) => Predicate::Any(vec![
            Predicate::IsNotNull(field),
            Predicate::All(vec![Predicate::IsNull(field), id_beyond]),
        ]),
        // Nothing is less than null, so only the tie on null remains.
        (TypedValue::Null, Relation::Less) => {
            Predicate::All(vec![Predicate::IsNull(field), id_beyond])
        }
        (value, Relation::Greater) => Predicate::Any(vec![
            Predicate::compare(field, CompareOp::Gt, value.clone()),
            Predicate::All(vec![
                Predicate::compare(field, CompareOp::Eq, value.clone()),
                id_beyond,
            ]),
        ]),
        (value, Relation::Less) => Predicate::Any(vec![
            Predicate::compare(field, CompareOp::Lt, value.clone()),
            Predicate::IsNull(field),
            Predicate::All(vec![
                Predicate::compare(field, CompareOp::Eq, value.clone()),
                id_beyond,
            ]),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const ID: SortFieldSpec = SortFieldSpec::identifier("id");
    const NAME: SortFieldSpec = SortFieldSpec::string("name");

    struct Row(HashMap<&'static str, TypedValue>);

    impl KeysetRow for Row {
        fn keyset_value(&self, field: &str) -> TypedValue {
            self.0.get(field).cloned().unwrap_or(TypedValue::Null)
        }
    }

    fn row(id: &str, name: Option<&str>) -> Row {
        let mut m = HashMap::new();
        m.insert("id", TypedValue::from(id));
        m.insert("name", TypedValue::from(name));
        Row(m)
    }

    fn rows() -> Vec<Row> {
        vec![
            row("a", None),
            row("b", Some("x")),
            row("c", None),
            row("d", Some("y")),
            row("e", Some("x")),
        ]
    }

    fn ids_matching(p: &Predicate) -> Vec<String> {
        rows()
            .iter()
            .filter(|r| p.matches(*r))
            .map(|r| r.keyset_value("id").to_raw().unwrap())
            .collect()
    }

    fn by_name(anchor_id: &str, anchor_name: Option<&str>, dir: Direction, order: SortDir) -> Predicate {
        let cursor = Cursor {
            anchor_id: anchor_id.into(),
            anchor_value: anchor_name.into(),
        };
        boundary_predicate(&ID, SortKey::Attribute(NAME), &cursor, dir, order)
    }

    fn by_id(anchor_id: &str, dir: Direction, order: SortDir) -> Predicate {
        let cursor = Cursor {
            anchor_id: anchor_id.into(),
            anchor_value: TypedValue::Null,
        };
        boundary_predicate(&ID, SortKey::Identifier(ID), &cursor, dir, order)
    }

    #[test]
    fn relation_table_is_exhaustive() {
        assert_eq!(Relation::of(Direction::After, SortDir::Asc), Relation::Greater);
        assert_eq!(Relation::of(Direction::After, SortDir::Desc), Relation::Less);
        assert_eq!(Relation::of(Direction::Before, SortDir::Asc), Relation::Less);
        assert_eq!(Relation::of(Direction::Before, SortDir::Desc), Relation::Greater);
    }

    // Ascending key order of the fixture: a, c (nulls) < b, e ("x") < d ("y").

    #[test]
    fn identifier_after_asc() {
        let p = by_id("b", Direction::After, SortDir::Asc);
        assert_eq!(p, Predicate::compare("id", CompareOp::Gt, "b".into()));
        assert_eq!(ids_matching(&p), vec!["c", "d", "e"]);
    }

    #[test]
    fn identifier_after_desc() {
        let p = by_id("b", Direction::After, SortDir::Desc);
        assert_eq!(ids_matching(&p), vec!["a"]);
    }

    #[test]
    fn identifier_before_asc() {
        let p = by_id("d", Direction::Before, SortDir::Asc);
        assert_eq!(ids_matching(&p), vec!["a", "b", "c"]);
    }

    #[test]
    fn identifier_before_desc() {
        let p = by_id("d", Direction::Before, SortDir::Desc);
        assert_eq!(ids_matching(&p), vec!["e"]);
    }

    #[test]
    fn value_after_asc() {
        // beyond (x, b): e, d
        let p = by_name("b", Some("x"), Direction::After, SortDir::Asc);
        assert_eq!(ids_matching(&p), vec!["d", "e"]);
    }

    #[test]
    fn value_after_desc() {
        // descending traversal past (x, e) visits b, then nulls c, a
        let p = by_name("e", Some("x"), Direction::After, SortDir::Desc);
        assert_eq!(ids_matching(&p), vec!["a", "b", "c"]);
    }

    #[test]
    fn value_before_asc() {
        // everything ahead of (x, e) ascending: a, c, b
        let p = by_name("e", Some("x"), Direction::Before, SortDir::Asc);
        assert_eq!(ids_matching(&p), vec!["a", "b", "c"]);
    }

    #[test]
    fn value_before_desc() {
        // descending order d, e, b, c, a; rows before (x, b): d, e
        let p = by_name("b", Some("x"), Direction::Before, SortDir::Desc);
        assert_eq!(ids_matching(&p), vec!["d", "e"]);
    }

    #[test]
    fn null_after_asc() {
        // past (null, a): c then every non-null row
        let p = by_name("a", None, Direction::After, SortDir::Asc);
        assert_eq!(ids_matching(&p), vec!["b", "c", "d", "e"]);
    }

    #[test]
    fn null_after_desc() {
        // nulls come last descending; past (null, c) only a remains
        let p = by_name("c", None, Direction::After, SortDir::Desc);
        assert_eq!(
            p,
            Predicate::All(vec![
                Predicate::IsNull("name"),
                Predicate::compare("id", CompareOp::Lt, "c".into()),
            ])
        );
        assert_eq!(ids_matching(&p), vec!["a"]);
    }

    #[test]
    fn null_before_asc() {
        // nothing is less than null: only (null, a) precedes (null, c)
        let p = by_name("c", None, Direction::Before, SortDir::Asc);
        assert_eq!(ids_matching(&p), vec!["a"]);
    }

    #[test]
    fn null_before_desc() {
        // descending d, e, b, c, a: before (null, a) is everything else
        let p = by_name("a", None, Direction::Before, SortDir::Desc);
        assert_eq!(ids_matching(&p), vec!["b", "c", "d", "e"]);
    }

    #[test]
    fn boundary_on_first_null_has_nothing_before_it() {
        let p = by_name("a", None, Direction::Before, SortDir::Asc);
        assert!(ids_matching(&p).is_empty());
    }

    #[test]
    fn contains_never_matches_null() {
        let p = Predicate::Contains {
            field: "name",
            term: String::new(),
        };
        assert_eq!(ids_matching(&p), vec!["b", "d", "e"]);
    }

    #[test]
    fn contains_ignores_case() {
        let p = Predicate::Contains {
            field: "name",
            term: "X".into(),
        };
        assert_eq!(ids_matching(&p), vec!["b", "e"]);
    }

    #[test]
    fn and_flattens() {
        let p = Predicate::IsNull("a")
            .and(Predicate::IsNull("b"))
            .and(Predicate::IsNull("c"));
        assert_eq!(
            p,
            Predicate::All(vec![
                Predicate::IsNull("a"),
                Predicate::IsNull("b"),
                Predicate::IsNull("c"),
            ])
        );
    }
}
