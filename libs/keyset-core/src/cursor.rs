use std::str::FromStr;

use crate::catalog::{SortCatalog, SortKey};
use crate::error::{Error, Result};
use crate::value::TypedValue;

/// Traversal direction relative to the anchor row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    After,
    Before,
}

impl Direction {
    pub fn marker(self) -> &'static str {
        match self {
            Direction::After => "after",
            Direction::Before => "before",
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "after" => Ok(Direction::After),
            "before" => Ok(Direction::Before),
            other => Err(Error::invalid_cursor(format!(
                "unknown direction marker '{other}'"
            ))),
        }
    }
}

/// Position in the ordering: the anchor row's identifier and sort value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cursor {
    /// Never null.
    pub anchor_id: TypedValue,
    /// Null when sorting by the identifier or when the anchor row had no value.
    pub anchor_value: TypedValue,
}

impl Cursor {
    /// Validate and type raw anchor text for `sort`.
    ///
    /// The anchor value is ignored when sorting by the identifier; an omitted
    /// value for an attribute sort means the anchor row itself was null.
    pub fn decode(
        catalog: &SortCatalog,
        sort: SortKey,
        raw_anchor_id: &str,
        raw_anchor_value: Option<&str>,
    ) -> Result<Self> {
        if raw_anchor_id.is_empty() {
            return Err(Error::invalid_cursor("anchor identifier must not be empty"));
        }
        let anchor_id = catalog
            .parse_value(raw_anchor_id, catalog.default_sort_by())
            .map_err(into_cursor_error)?;

        let anchor_value = match (sort, raw_anchor_value) {
            (SortKey::Identifier(_), _) => TypedValue::Null,
            (SortKey::Attribute(_), None) => TypedValue::Null,
            (SortKey::Attribute(field), Some(raw)) => catalog
                .parse_value(raw, field.name)
                .map_err(into_cursor_error)?,
        };

        Ok(Self {
            anchor_id,
            anchor_value,
        })
    }
}

/// Decode a cursor together with its direction marker (`after` / `before`).
pub fn decode_cursor(
    catalog: &SortCatalog,
    sort: SortKey,
    marker: &str,
    raw_anchor_id: &str,
    raw_anchor_value: Option<&str>,
) -> Result<(Direction, Cursor)> {
    let direction = marker.parse::<Direction>()?;
    let cursor = Cursor::decode(catalog, sort, raw_anchor_id, raw_anchor_value)?;
    Ok((direction, cursor))
}

fn into_cursor_error(e: Error) -> Error {
    match e {
        Error::InvalidSortValue { field, reason } => {
            Error::InvalidCursor(format!("anchor value for '{field}': {reason}"))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SortFieldSpec;

    fn catalog() -> SortCatalog {
        SortCatalog::new(SortFieldSpec::identifier("roleId"))
            .with_field(SortFieldSpec::string("name"))
            .with_field(SortFieldSpec::timestamp("createdAt"))
    }

    #[test]
    fn decodes_attribute_anchor() {
        let c = catalog();
        let sort = c.resolve("name").unwrap();
        let cur = Cursor::decode(&c, sort, "admin", Some("Administrator")).unwrap();
        assert_eq!(cur.anchor_id, TypedValue::from("admin"));
        assert_eq!(cur.anchor_value, TypedValue::from("Administrator"));
    }

    #[test]
    fn omitted_value_means_null_anchor() {
        let c = catalog();
        let sort = c.resolve("name").unwrap();
        let cur = Cursor::decode(&c, sort, "admin", None).unwrap();
        assert!(cur.anchor_value.is_null());
    }

    #[test]
    fn value_is_ignored_for_identifier_sort() {
        let c = catalog();
        let cur = Cursor::decode(&c, c.default_key(), "admin", Some("whatever")).unwrap();
        assert!(cur.anchor_value.is_null());
    }

    #[test]
    fn empty_anchor_id_is_rejected() {
        let c = catalog();
        let err = Cursor::decode(&c, c.default_key(), "", None).unwrap_err();
        assert!(matches!(err, Error::InvalidCursor(_)));
    }

    #[test]
    fn bad_timestamp_anchor_is_an_invalid_cursor() {
        let c = catalog();
        let sort = c.resolve("createdAt").unwrap();
        let err = Cursor::decode(&c, sort, "admin", Some("13/13/2024")).unwrap_err();
        assert!(matches!(err, Error::InvalidCursor(msg) if msg.contains("createdAt")));
    }

    #[test]
    fn marker_selects_direction() {
        let c = catalog();
        let (dir, _) = decode_cursor(&c, c.default_key(), "before", "r1", None).unwrap();
        assert_eq!(dir, Direction::Before);
        assert!(decode_cursor(&c, c.default_key(), "around", "r1", None).is_err());
    }
}
