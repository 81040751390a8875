//! Persistent numeric counters for game economies.
//!
//! This crate is a thin layer over a synchronous key-value string store. It
//! exposes three building blocks that a game or application wires together:
//!
//! * [`store`] — the [`store::KeyValueStore`] backend trait with an
//!   in-memory implementation and a JSON-file-backed one.
//! * [`amount`] — operands for the arithmetic operations: a fixed number, or
//!   an inclusive integer range resolved to one uniform draw at call time.
//! * [`ledger`] — the [`ledger::Ledger`] façade with scalar and batch
//!   get/set/add/sub/mul/div over the store.
//!
//! The ledger owns no state of its own; every value lives in the injected
//! store as its canonical decimal text. Faults are absorbed at each operation
//! boundary and logged: reads degrade to `0.0`, writes are dropped, and
//! callers never see an error.

pub mod amount;
pub mod ledger;
pub mod store;

mod error;

pub use error::LedgerError;
