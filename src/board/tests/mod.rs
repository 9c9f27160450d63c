//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `perft.rs` - Move generation node counts
//! - `draw.rs` - Draw detection (50-move, repetition, insufficient material)
//! - `make_unmake.rs` - Make/unmake move correctness
//! - `eval.rs` - Evaluation symmetry and sanity
//! - `proptest.rs` - Property-based tests

mod draw;
mod perft;
