//! Row types mapped from the database with `sqlx::FromRow`.

pub mod issue;
