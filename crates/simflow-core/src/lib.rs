//! Core library for simflow.
//!
//! Holds everything that does not touch the terminal: the flow endpoint
//! client and its two-step fetch protocol, derived usage metrics, the liquid
//! gauge model, the key-value persistence capability, and the query state
//! machine that ties them together.

pub mod flow;
pub mod gauge;
pub mod query;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;
