//! Core business logic - framework-agnostic reporting and seeding operations.
//!
//! Every operation takes the database connection explicitly and returns plain
//! serializable data; the HTTP layer only maps parameters and errors.

/// Month names, the IST month key, and month-filtered loading
pub mod month;

/// Product listing with search and pagination
pub mod listing;

/// Monthly sales totals, price histogram and category breakdown
pub mod statistics;

/// All three monthly reports in one response
pub mod report;

/// Destructive reseed from the remote dataset
pub mod seed;
