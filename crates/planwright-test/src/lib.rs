//! Shared test fixtures for Planwright crates.
//!
//! Plain data types and pure score functions. This crate depends only on
//! `planwright-core`, so every other crate can take it as a dev-dependency.
//!
//! - [`nqueens`] - plain planning variable: one row per queen
//! - [`routing`] - chained planning variable: customers chained behind depots

pub mod nqueens;
pub mod routing;

pub use nqueens::{NQueensSolution, Queen};
pub use routing::RoutingSolution;
