//! Extension-field variables and product gadgets for the BLS12-377 tower
//! Fq2 → Fq6 → Fq12.
//!
//! Every element type is a bundle of linear combinations, so addition,
//! negation and multiplication by constants are free. Only cross-variable
//! products allocate witnesses and emit constraints.

pub mod fp12_2over3over2;
pub mod fp2;
pub mod fp6_3over2;

pub use fp12_2over3over2::{Fp12MulBy034Gadget, Fp12SqrGadget, Fp12Var};
pub use fp2::{Fp2MulByLcGadget, Fp2MulGadget, Fp2SqrGadget, Fp2Var};
pub use fp6_3over2::{Fp6MulBy01Gadget, Fp6MulGadget, Fp6Var};
