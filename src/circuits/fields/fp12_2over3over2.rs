//! Degree-12 extension (2-over-3-over-2) variables, squaring and the sparse
//! product used by line evaluation.

use super::fp2::{Fp2MulGadget, Fp2Var};
use super::fp6_3over2::{Fp6MulBy01Gadget, Fp6MulGadget, Fp6Var};
use crate::r1cs::{ConstraintSystem, SynthesisError};
use ark_bls12_377::{Fq, Fq12};
use ark_ff::One;

/// Symbolic element of Fq12 = Fq6\[w\]/(w² − v).
#[derive(Clone, Debug)]
pub struct Fp12Var {
    pub c0: Fp6Var,
    pub c1: Fp6Var,
}

impl Fp12Var {
    pub fn new(c0: Fp6Var, c1: Fp6Var) -> Self {
        Self { c0, c1 }
    }

    pub fn alloc(cs: &mut ConstraintSystem<Fq>, label: &str) -> Self {
        Self::new(
            Fp6Var::alloc(cs, &format!("{label}.c0")),
            Fp6Var::alloc(cs, &format!("{label}.c1")),
        )
    }

    pub fn constant(value: Fq12) -> Self {
        Self::new(Fp6Var::constant(value.c0), Fp6Var::constant(value.c1))
    }

    pub fn one() -> Self {
        Self::constant(Fq12::one())
    }

    pub fn value(&self, cs: &ConstraintSystem<Fq>) -> Result<Fq12, SynthesisError> {
        Ok(Fq12::new(self.c0.value(cs)?, self.c1.value(cs)?))
    }

    pub fn assign(&self, cs: &mut ConstraintSystem<Fq>, value: Fq12) -> Result<(), SynthesisError> {
        self.c0.assign(cs, value.c0)?;
        self.c1.assign(cs, value.c1)
    }
}

/// Squares an Fq12 accumulator with two Fq6 products. For `f = a + b·w`
/// with `w² = v`:
///
/// ```text
/// ab          = a·b
/// m           = (a + b)(a + v·b)
/// result.c0   = m − ab − v·ab
/// result.c1   = 2·ab
/// ```
#[derive(Clone, Debug)]
pub struct Fp12SqrGadget {
    ab: Fp6MulGadget,
    m: Fp6MulGadget,
    result: Fp12Var,
}

impl Fp12SqrGadget {
    pub fn new(cs: &mut ConstraintSystem<Fq>, f: Fp12Var, label: &str) -> Self {
        let ab = Fp6MulGadget::new(cs, f.c0.clone(), f.c1.clone(), &format!("{label}.ab"));
        let m = Fp6MulGadget::new(
            cs,
            f.c0.add(&f.c1),
            f.c0.add(&f.c1.mul_by_nonresidue()),
            &format!("{label}.m"),
        );

        let ab_shifted = ab.result().mul_by_nonresidue();
        let c0 = m.result().sub(ab.result()).sub(&ab_shifted);
        let c1 = ab.result().double();

        Self {
            ab,
            m,
            result: Fp12Var::new(c0, c1),
        }
    }

    pub fn result(&self) -> &Fp12Var {
        &self.result
    }

    pub fn generate_constraints(&self, cs: &mut ConstraintSystem<Fq>) {
        self.ab.generate_constraints(cs);
        self.m.generate_constraints(cs);
    }

    pub fn generate_witness(&self, cs: &mut ConstraintSystem<Fq>) -> Result<(), SynthesisError> {
        self.ab.generate_witness(cs)?;
        self.m.generate_witness(cs)
    }
}

/// Multiplies an Fq12 accumulator by the 034-sparse element
/// `c0 + (c3 + c4·v)·w` with thirteen Fq2 products (three for the dense
/// half, five each for the two sparse halves) instead of the eighteen a
/// dense product costs:
///
/// ```text
/// a           = f.c0 · c0          (componentwise Fq2 products)
/// b           = f.c1 · (c3 + c4·v)
/// e           = (f.c0 + f.c1) · (c0 + c3 + c4·v)
/// result.c0   = a + v·b
/// result.c1   = e − a − b
/// ```
#[derive(Clone, Debug)]
pub struct Fp12MulBy034Gadget {
    a0: Fp2MulGadget,
    a1: Fp2MulGadget,
    a2: Fp2MulGadget,
    b: Fp6MulBy01Gadget,
    e: Fp6MulBy01Gadget,
    result: Fp12Var,
}

impl Fp12MulBy034Gadget {
    pub fn new(
        cs: &mut ConstraintSystem<Fq>,
        f: Fp12Var,
        c0: Fp2Var,
        c3: Fp2Var,
        c4: Fp2Var,
        label: &str,
    ) -> Self {
        let a0 = Fp2MulGadget::new(cs, f.c0.c0.clone(), c0.clone(), &format!("{label}.a0"));
        let a1 = Fp2MulGadget::new(cs, f.c0.c1.clone(), c0.clone(), &format!("{label}.a1"));
        let a2 = Fp2MulGadget::new(cs, f.c0.c2.clone(), c0.clone(), &format!("{label}.a2"));
        let a = Fp6Var::new(
            a0.result().clone(),
            a1.result().clone(),
            a2.result().clone(),
        );

        let b = Fp6MulBy01Gadget::new(
            cs,
            f.c1.clone(),
            c3.clone(),
            c4.clone(),
            &format!("{label}.b"),
        );
        let e = Fp6MulBy01Gadget::new(
            cs,
            f.c0.add(&f.c1),
            c0.add(&c3),
            c4,
            &format!("{label}.e"),
        );

        let r0 = a.add(&b.result().mul_by_nonresidue());
        let r1 = e.result().sub(&a).sub(b.result());

        Self {
            a0,
            a1,
            a2,
            b,
            e,
            result: Fp12Var::new(r0, r1),
        }
    }

    pub fn result(&self) -> &Fp12Var {
        &self.result
    }

    pub fn generate_constraints(&self, cs: &mut ConstraintSystem<Fq>) {
        self.a0.generate_constraints(cs);
        self.a1.generate_constraints(cs);
        self.a2.generate_constraints(cs);
        self.b.generate_constraints(cs);
        self.e.generate_constraints(cs);
    }

    pub fn generate_witness(&self, cs: &mut ConstraintSystem<Fq>) -> Result<(), SynthesisError> {
        self.a0.generate_witness(cs)?;
        self.a1.generate_witness(cs)?;
        self.a2.generate_witness(cs)?;
        self.b.generate_witness(cs)?;
        self.e.generate_witness(cs)
    }
}
