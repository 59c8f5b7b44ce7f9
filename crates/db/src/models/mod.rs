//! Row types for the `users` table.

pub mod user;
