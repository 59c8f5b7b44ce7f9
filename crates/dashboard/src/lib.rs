//! Live fraud dashboard.
//!
//! Consumes verdicts from the alerts topic ([`feed::AlertFeed`]) and relays
//! each one to every connected browser through the [`ws::Hub`]. The library
//! exposes the building blocks so the binary and integration tests assemble
//! the same router.

pub mod config;
pub mod feed;
pub mod router;
pub mod routes;
pub mod state;
pub mod ws;
