//! Row mapping and queries, one file per table.
//!
//! Each query is a plain function over `&Connection` so several of them can
//! share one transaction; the `Database` methods wrap them for one-off calls.

pub mod badges;
pub mod sessions;
pub mod users;
