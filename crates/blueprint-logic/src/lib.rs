//! Circuit wiring and signal logic for blueprint entities.
//!
//! - [`graph`] -- the [`graph::ConnectionGraph`] holding every wire once,
//!   with per-entity adjacency derived from it.
//! - [`wire`] -- wire colors and terminal sides, including the symbolic
//!   `"in"` / `"out"` side names.
//! - [`condition`] -- decider, arithmetic and circuit conditions and their
//!   mapping to the external schema.
//! - [`filter`] -- sparse index-keyed signal tables.

pub mod condition;
pub mod filter;
pub mod graph;
pub mod wire;

pub use condition::{ArithmeticOp, ComparisonOp, Condition, Operand, Operator, ReadMode};
pub use filter::{ConstantTable, SignalCount, SlotTable};
pub use graph::{Connection, ConnectionGraph, End, Wire, WireEnd};
pub use wire::{Side, SideSpec, WireColor};
