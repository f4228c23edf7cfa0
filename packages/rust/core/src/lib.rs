//! Menu assembly, output writing, and pipeline orchestration for menuforge.
//!
//! This crate ties together scanning, article indexing, and link flattening
//! into the end-to-end `generate` workflow, plus a read-back `check`.

pub mod assembler;
pub mod check;
pub mod menu;
pub mod pipeline;
