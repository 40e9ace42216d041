//! Subscription registry: the shape-indexed database and its groups.

pub(crate) mod database;
pub(crate) mod group;

pub(crate) use database::Database;
