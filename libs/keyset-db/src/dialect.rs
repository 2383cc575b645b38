use keyset_core::NullPlacement;
use sea_orm::DatabaseBackend;

/// Null-ordering capabilities of a SQL backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dialect {
    /// Nulls compare below every value in a plain `ORDER BY`.
    pub nulls_sort_low: bool,
    /// Accepts `NULLS FIRST` / `NULLS LAST`.
    pub supports_nulls_clause: bool,
}

/// How one ORDER BY term gets its null placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NullStrategy {
    Native,
    Clause,
    IsNullTerm,
}

impl Dialect {
    pub const SQLITE: Dialect = Dialect {
        nulls_sort_low: true,
        supports_nulls_clause: true,
    };
    pub const POSTGRES: Dialect = Dialect {
        nulls_sort_low: false,
        supports_nulls_clause: true,
    };
    pub const MYSQL: Dialect = Dialect {
        nulls_sort_low: true,
        supports_nulls_clause: false,
    };

    pub fn of(backend: DatabaseBackend) -> Self {
        match backend {
            DatabaseBackend::Sqlite => Self::SQLITE,
            DatabaseBackend::Postgres => Self::POSTGRES,
            DatabaseBackend::MySql => Self::MYSQL,
        }
    }

    /// Placement a plain ascending (`asc = true`) or descending term gets natively.
    pub fn native_placement(&self, asc: bool) -> NullPlacement {
        match (self.nulls_sort_low, asc) {
            (true, true) | (false, false) => NullPlacement::First,
            (true, false) | (false, true) => NullPlacement::Last,
        }
    }

    pub fn strategy(&self, asc: bool, wanted: NullPlacement) -> NullStrategy {
        if self.native_placement(asc) == wanted {
            NullStrategy::Native
        } else if self.supports_nulls_clause {
            NullStrategy::Clause
        } else {
            NullStrategy::IsNullTerm
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_and_mysql_match_natively() {
        for d in [Dialect::SQLITE, Dialect::MYSQL] {
            assert_eq!(d.strategy(true, NullPlacement::First), NullStrategy::Native);
            assert_eq!(d.strategy(false, NullPlacement::Last), NullStrategy::Native);
        }
    }

    #[test]
    fn postgres_needs_the_clause() {
        let d = Dialect::of(DatabaseBackend::Postgres);
        assert_eq!(d.strategy(true, NullPlacement::First), NullStrategy::Clause);
        assert_eq!(d.strategy(false, NullPlacement::Last), NullStrategy::Clause);
    }

    #[test]
    fn no_clause_support_falls_back_to_is_null_term() {
        let d = Dialect {
            nulls_sort_low: false,
            supports_nulls_clause: false,
        };
        assert_eq!(d.strategy(true, NullPlacement::First), NullStrategy::IsNullTerm);
        assert_eq!(Dialect::MYSQL.strategy(true, NullPlacement::Last), NullStrategy::IsNullTerm);
    }
}
