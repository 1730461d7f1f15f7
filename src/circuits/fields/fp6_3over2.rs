//! Degree-6 extension (3-over-2) variables and product gadgets.

use super::fp2::{Fp2MulGadget, Fp2Var};
use crate::r1cs::{ConstraintSystem, SynthesisError};
use ark_bls12_377::{Fq, Fq2, Fq6, Fq6Config};
use ark_ff::Fp6Config;

/// The cubic nonresidue `v³ = ξ` of the Fq6 tower.
pub(crate) fn fp6_nonresidue() -> Fq2 {
    Fq6Config::NONRESIDUE
}

/// Symbolic element of Fq6 = Fq2\[v\]/(v³ − ξ).
#[derive(Clone, Debug)]
pub struct Fp6Var {
    pub c0: Fp2Var,
    pub c1: Fp2Var,
    pub c2: Fp2Var,
}

impl Fp6Var {
    pub fn new(c0: Fp2Var, c1: Fp2Var, c2: Fp2Var) -> Self {
        Self { c0, c1, c2 }
    }

    pub fn alloc(cs: &mut ConstraintSystem<Fq>, label: &str) -> Self {
        Self::new(
            Fp2Var::alloc(cs, &format!("{label}.c0")),
            Fp2Var::alloc(cs, &format!("{label}.c1")),
            Fp2Var::alloc(cs, &format!("{label}.c2")),
        )
    }

    pub fn constant(value: Fq6) -> Self {
        Self::new(
            Fp2Var::constant(value.c0),
            Fp2Var::constant(value.c1),
            Fp2Var::constant(value.c2),
        )
    }

    pub fn zero() -> Self {
        Self::new(Fp2Var::zero(), Fp2Var::zero(), Fp2Var::zero())
    }

    pub fn add(&self, other: &Self) -> Self {
        Self::new(
            self.c0.add(&other.c0),
            self.c1.add(&other.c1),
            self.c2.add(&other.c2),
        )
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self::new(
            self.c0.sub(&other.c0),
            self.c1.sub(&other.c1),
            self.c2.sub(&other.c2),
        )
    }

    pub fn double(&self) -> Self {
        Self::new(self.c0.double(), self.c1.double(), self.c2.double())
    }

    /// Multiplication by `v`: `(c0, c1, c2) ↦ (ξ·c2, c0, c1)`. Linear.
    pub fn mul_by_nonresidue(&self) -> Self {
        Self::new(
            self.c2.mul_by_fq2_constant(fp6_nonresidue()),
            self.c0.clone(),
            self.c1.clone(),
        )
    }

    pub fn value(&self, cs: &ConstraintSystem<Fq>) -> Result<Fq6, SynthesisError> {
        Ok(Fq6::new(
            self.c0.value(cs)?,
            self.c1.value(cs)?,
            self.c2.value(cs)?,
        ))
    }

    pub fn assign(&self, cs: &mut ConstraintSystem<Fq>, value: Fq6) -> Result<(), SynthesisError> {
        self.c0.assign(cs, value.c0)?;
        self.c1.assign(cs, value.c1)?;
        self.c2.assign(cs, value.c2)
    }
}

/// Full Fq6 product via six Fq2 products (Toom/Karatsuba):
///
/// ```text
/// r0 = v0 + ξ(m12 − v1 − v2)
/// r1 = m01 − v0 − v1 + ξ·v2
/// r2 = m02 − v0 − v2 + v1
/// ```
///
/// with `v_i = a_i·b_i` and `m_ij = (a_i+a_j)(b_i+b_j)`. The result is a
/// linear combination of the allocated products; no extra variables.
#[derive(Clone, Debug)]
pub struct Fp6MulGadget {
    v0: Fp2MulGadget,
    v1: Fp2MulGadget,
    v2: Fp2MulGadget,
    m01: Fp2MulGadget,
    m02: Fp2MulGadget,
    m12: Fp2MulGadget,
    result: Fp6Var,
}

impl Fp6MulGadget {
    pub fn new(cs: &mut ConstraintSystem<Fq>, a: Fp6Var, b: Fp6Var, label: &str) -> Self {
        let v0 = Fp2MulGadget::new(cs, a.c0.clone(), b.c0.clone(), &format!("{label}.v0"));
        let v1 = Fp2MulGadget::new(cs, a.c1.clone(), b.c1.clone(), &format!("{label}.v1"));
        let v2 = Fp2MulGadget::new(cs, a.c2.clone(), b.c2.clone(), &format!("{label}.v2"));
        let m01 = Fp2MulGadget::new(
            cs,
            a.c0.add(&a.c1),
            b.c0.add(&b.c1),
            &format!("{label}.m01"),
        );
        let m02 = Fp2MulGadget::new(
            cs,
            a.c0.add(&a.c2),
            b.c0.add(&b.c2),
            &format!("{label}.m02"),
        );
        let m12 = Fp2MulGadget::new(
            cs,
            a.c1.add(&a.c2),
            b.c1.add(&b.c2),
            &format!("{label}.m12"),
        );

        let xi = fp6_nonresidue();
        let r0 = v0.result().add(
            &m12.result()
                .sub(v1.result())
                .sub(v2.result())
                .mul_by_fq2_constant(xi),
        );
        let r1 = m01
            .result()
            .sub(v0.result())
            .sub(v1.result())
            .add(&v2.result().mul_by_fq2_constant(xi));
        let r2 = m02
            .result()
            .sub(v0.result())
            .sub(v2.result())
            .add(v1.result());

        Self {
            v0,
            v1,
            v2,
            m01,
            m02,
            m12,
            result: Fp6Var::new(r0, r1, r2),
        }
    }

    pub fn result(&self) -> &Fp6Var {
        &self.result
    }

    pub fn generate_constraints(&self, cs: &mut ConstraintSystem<Fq>) {
        self.v0.generate_constraints(cs);
        self.v1.generate_constraints(cs);
        self.v2.generate_constraints(cs);
        self.m01.generate_constraints(cs);
        self.m02.generate_constraints(cs);
        self.m12.generate_constraints(cs);
    }

    pub fn generate_witness(&self, cs: &mut ConstraintSystem<Fq>) -> Result<(), SynthesisError> {
        self.v0.generate_witness(cs)?;
        self.v1.generate_witness(cs)?;
        self.v2.generate_witness(cs)?;
        self.m01.generate_witness(cs)?;
        self.m02.generate_witness(cs)?;
        self.m12.generate_witness(cs)
    }
}

/// Sparse Fq6 product `e · (d0 + d1 v)` via five Fq2 products:
///
/// ```text
/// r0 = v0 + ξ(t12 − v1)            (= e0·d0 + ξ·e2·d1)
/// r1 = t01 − v0 − v1               (= e0·d1 + e1·d0)
/// r2 = t02 − v0 + v1               (= e2·d0 + e1·d1)
/// ```
#[derive(Clone, Debug)]
pub struct Fp6MulBy01Gadget {
    v0: Fp2MulGadget,
    v1: Fp2MulGadget,
    t01: Fp2MulGadget,
    t02: Fp2MulGadget,
    t12: Fp2MulGadget,
    result: Fp6Var,
}

impl Fp6MulBy01Gadget {
    pub fn new(
        cs: &mut ConstraintSystem<Fq>,
        e: Fp6Var,
        d0: Fp2Var,
        d1: Fp2Var,
        label: &str,
    ) -> Self {
        let v0 = Fp2MulGadget::new(cs, e.c0.clone(), d0.clone(), &format!("{label}.v0"));
        let v1 = Fp2MulGadget::new(cs, e.c1.clone(), d1.clone(), &format!("{label}.v1"));
        let t01 = Fp2MulGadget::new(cs, e.c0.add(&e.c1), d0.add(&d1), &format!("{label}.t01"));
        let t02 = Fp2MulGadget::new(cs, e.c0.add(&e.c2), d0, &format!("{label}.t02"));
        let t12 = Fp2MulGadget::new(cs, e.c1.add(&e.c2), d1, &format!("{label}.t12"));

        let r0 = v0.result().add(
            &t12.result()
                .sub(v1.result())
                .mul_by_fq2_constant(fp6_nonresidue()),
        );
        let r1 = t01.result().sub(v0.result()).sub(v1.result());
        let r2 = t02.result().sub(v0.result()).add(v1.result());

        Self {
            v0,
            v1,
            t01,
            t02,
            t12,
            result: Fp6Var::new(r0, r1, r2),
        }
    }

    pub fn result(&self) -> &Fp6Var {
        &self.result
    }

    pub fn generate_constraints(&self, cs: &mut ConstraintSystem<Fq>) {
        self.v0.generate_constraints(cs);
        self.v1.generate_constraints(cs);
        self.t01.generate_constraints(cs);
        self.t02.generate_constraints(cs);
        self.t12.generate_constraints(cs);
    }

    pub fn generate_witness(&self, cs: &mut ConstraintSystem<Fq>) -> Result<(), SynthesisError> {
        self.v0.generate_witness(cs)?;
        self.v1.generate_witness(cs)?;
        self.t01.generate_witness(cs)?;
        self.t02.generate_witness(cs)?;
        self.t12.generate_witness(cs)
    }
}
