//! Generated route glue compiled against an in-memory runtime.
//!
//! `build.rs` runs the generator over `routes.json`; the result is included
//! into [`routes`] next to the route-data types it implements, and
//! [`route_runtime`] provides the calls it makes.

pub mod route_runtime;
pub mod routes;
