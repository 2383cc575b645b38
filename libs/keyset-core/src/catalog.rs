//! Per-resource declaration of sortable fields.

use crate::error::{Error, Result};
use crate::order::SortDir;
use crate::value::{TypedValue, ValueKind};

/// A sortable field and its typed value parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortFieldSpec {
    pub name: &'static str,
    pub kind: ValueKind,
    pub nullable: bool,
}

impl SortFieldSpec {
    /// The resource's natural unique identifier: a non-null string.
    pub const fn identifier(name: &'static str) -> Self {
        Self {
            name,
            kind: ValueKind::String,
            nullable: false,
        }
    }

    /// An optional string attribute.
    pub const fn string(name: &'static str) -> Self {
        Self {
            name,
            kind: ValueKind::String,
            nullable: true,
        }
    }

    /// A timestamp attribute that is always set.
    pub const fn timestamp(name: &'static str) -> Self {
        Self {
            name,
            kind: ValueKind::Timestamp,
            nullable: false,
        }
    }

    pub const fn nullable(self, nullable: bool) -> Self {
        Self { nullable, ..self }
    }

    pub fn parse(&self, raw: &str) -> std::result::Result<TypedValue, String> {
        self.kind.parse(raw)
    }
}

/// How the engine treats the chosen sort field.
///
/// The identifier is unique and never null, so it is a total order by itself;
/// an attribute always needs the identifier as a tie-breaker and may be null.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Identifier(SortFieldSpec),
    Attribute(SortFieldSpec),
}

impl SortKey {
    pub fn field(&self) -> &SortFieldSpec {
        match self {
            SortKey::Identifier(f) | SortKey::Attribute(f) => f,
        }
    }

    pub fn name(&self) -> &'static str {
        self.field().name
    }

    pub fn is_identifier(&self) -> bool {
        matches!(self, SortKey::Identifier(_))
    }
}

/// Immutable, process-wide catalog of sort fields for one resource type.
#[derive(Clone, Debug)]
pub struct SortCatalog {
    default_field: SortFieldSpec,
    fields: Vec<SortFieldSpec>,
    search_fields: Vec<&'static str>,
    default_order: SortDir,
}

impl SortCatalog {
    /// Start a catalog whose default sort (and tie-breaker) is `identifier`.
    ///
    /// The identifier is forced non-nullable regardless of how it was declared.
    pub fn new(identifier: SortFieldSpec) -> Self {
        Self {
            default_field: identifier.nullable(false),
            fields: Vec::new(),
            search_fields: Vec::new(),
            default_order: SortDir::Asc,
        }
    }

    pub fn with_field(mut self, field: SortFieldSpec) -> Self {
        if field.name != self.default_field.name
            && !self.fields.iter().any(|f| f.name == field.name)
        {
            self.fields.push(field);
        }
        self
    }

    pub fn with_search_field(mut self, name: &'static str) -> Self {
        if !self.search_fields.contains(&name) {
            self.search_fields.push(name);
        }
        self
    }

    pub fn with_default_order(mut self, order: SortDir) -> Self {
        self.default_order = order;
        self
    }

    pub fn default_field(&self) -> &SortFieldSpec {
        &self.default_field
    }

    pub fn default_sort_by(&self) -> &'static str {
        self.default_field.name
    }

    pub fn default_order(&self) -> SortDir {
        self.default_order
    }

    pub fn default_key(&self) -> SortKey {
        SortKey::Identifier(self.default_field)
    }

    /// Every accepted `sortBy` value, the default field first.
    pub fn supported_sort_bys(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.default_field.name).chain(self.fields.iter().map(|f| f.name))
    }

    pub fn search_fields(&self) -> &[&'static str] {
        &self.search_fields
    }

    pub fn resolve(&self, name: &str) -> Option<SortKey> {
        if name == self.default_field.name {
            return Some(SortKey::Identifier(self.default_field));
        }
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| SortKey::Attribute(*f))
    }

    /// Parse raw text for `field`.
    ///
    /// Empty text means "no value" for an attribute but is rejected for the
    /// identifier, which is never null.
    pub fn parse_value(&self, raw: &str, field: &str) -> Result<TypedValue> {
        let key = self.resolve(field).ok_or_else(|| Error::InvalidSortValue {
            field: field.to_owned(),
            reason: "field is not sortable".to_owned(),
        })?;
        match key {
            SortKey::Identifier(_) if raw.is_empty() => Err(Error::InvalidSortValue {
                field: field.to_owned(),
                reason: "identifier must not be empty".to_owned(),
            }),
            SortKey::Attribute(_) if raw.is_empty() => Ok(TypedValue::Null),
            _ => key.field().parse(raw).map_err(|reason| Error::InvalidSortValue {
                field: field.to_owned(),
                reason,
            }),
        }
    }
}
