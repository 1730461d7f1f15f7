//! The BLS12-377 optimal ate Miller loop, arithmetized over Fq.
//!
//! BLS12-377's base field is the scalar field of BW6-761, so every
//! constraint here is native field arithmetic when the enclosing proof
//! system runs over BW6-761. The loop is decomposed the classical way:
//! per-bit doubling/addition steps over the G2 accumulator
//! ([`AteDoubleGadget`], [`AteAdditionGadget`]), a precomputation pass that
//! chains them ([`AtePrecomputeGadget`]), and the Fq12 accumulator loop that
//! folds the resulting line evaluations ([`MillerLoopGadget`]).

pub mod add;
pub mod double;
pub mod g2;
pub mod miller;
pub mod params;
pub mod precompute;

pub use add::AteAdditionGadget;
pub use double::AteDoubleGadget;
pub use g2::{AteEllCoeffsVar, G2HomProjective, G2ProjectiveVar};
pub use miller::{LineEvalGadget, MillerLoopGadget, MillerOp};
pub use params::AteParams;
pub use precompute::{AtePrecomputeGadget, AteStep};
