//! R1CS gadgets for the BLS12-377 optimal ate Miller loop.
//!
//! BLS12-377 sits under BW6-761: its base field Fq is BW6-761's scalar
//! field, so a Miller loop arithmetized over Fq verifies BLS12-377 pairing
//! equations natively inside a BW6-761 proof. This crate provides the
//! constraint-system substrate ([`r1cs`]), extension-field gadgets for the
//! Fq2/Fq6/Fq12 tower, and the per-bit ate machinery up to the unreduced
//! Miller value ([`circuits::pairing`]).
//!
//! All gadgets separate constraint declaration from witness assignment, so
//! one synthesized topology can be reused across input pairs. The final
//! exponentiation is out of scope; the loop output is the raw
//! `f_{x,Q}(P)` matching `multi_miller_loop` of the arkworks backend.

pub mod circuits;
pub mod r1cs;

pub use circuits::pairing::{AteParams, MillerLoopGadget};
pub use r1cs::{ConstraintSystem, SynthesisError};
