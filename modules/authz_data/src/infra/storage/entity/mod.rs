//! One SeaORM entity per table, each mapped onto its domain record.

pub mod permission;
pub mod role;
pub mod tenant;
pub mod user;
