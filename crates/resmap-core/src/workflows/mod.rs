//! # Workflows Module
//!
//! High-level entry points that run the correspondence engine over a whole
//! [`Entry`](crate::core::models::entry::Entry).
//!
//! - **Correspondence Workflow** ([`correspond`]) - Maps every model of every chain,
//!   memoizing per model and reporting progress, and derives alpha-carbon
//!   views and report rows from the results.

pub mod correspond;
