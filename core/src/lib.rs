//! The core of the Merl language front-end.
//!
//! Merl is a small ML-family functional language. This crate hosts the pieces of the front-end
//! that are independent from parsing: the abstract syntax tree, the Hindley-Milner type inference
//! engine (see [typecheck]), the primitive operator environment and error diagnostics.

pub mod environment;
pub mod error;
pub mod identifier;
pub(crate) mod metrics;
pub mod position;
pub mod pretty;
pub mod stdlib;
pub mod term;
pub mod typ;
pub mod typecheck;
