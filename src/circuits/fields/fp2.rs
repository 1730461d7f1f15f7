//! Degree-2 extension field variables and product gadgets.
//!
//! An [`Fp2Var`] is a pair of linear combinations over the constraint field,
//! so additive arithmetic and multiplication by constants cost no
//! constraints. Products between variables go through the gadgets below,
//! which follow the Karatsuba/complex layout of
//! "Multiplication and Squaring on Pairing-Friendly Fields"
//! (Devegili, OhEigeartaigh, Scott, Dahab).

use crate::r1cs::{ConstraintSystem, SynthesisError, Variable, LC};
use ark_bls12_377::{Fq, Fq2, Fq2Config};
use ark_ff::{Field, Fp2Config, One};

/// The quadratic nonresidue `u²` of the Fq2 tower.
pub(crate) fn fp2_nonresidue() -> Fq {
    Fq2Config::NONRESIDUE
}

/// Symbolic element of Fq2: a pair of linear combinations.
#[derive(Clone, Debug)]
pub struct Fp2Var {
    pub c0: LC<Fq>,
    pub c1: LC<Fq>,
}

impl Fp2Var {
    pub fn new(c0: LC<Fq>, c1: LC<Fq>) -> Self {
        Self { c0, c1 }
    }

    /// Allocates a fresh variable-backed element.
    pub fn alloc(cs: &mut ConstraintSystem<Fq>, label: &str) -> Self {
        let c0 = cs.alloc(format!("{label}.c0"));
        let c1 = cs.alloc(format!("{label}.c1"));
        Self::new(LC::from(c0), LC::from(c1))
    }

    pub fn constant(value: Fq2) -> Self {
        Self::new(LC::constant(value.c0), LC::constant(value.c1))
    }

    pub fn zero() -> Self {
        Self::new(LC::zero(), LC::zero())
    }

    pub fn one() -> Self {
        Self::constant(Fq2::one())
    }

    pub fn add(&self, other: &Self) -> Self {
        Self::new(
            self.c0.clone() + &other.c0,
            self.c1.clone() + &other.c1,
        )
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self::new(
            self.c0.clone() - &other.c0,
            self.c1.clone() - &other.c1,
        )
    }

    pub fn neg(&self) -> Self {
        Self::new(-self.c0.clone(), -self.c1.clone())
    }

    pub fn double(&self) -> Self {
        self.scale(Fq::from(2u64))
    }

    pub fn triple(&self) -> Self {
        self.scale(Fq::from(3u64))
    }

    /// Multiplication by a constraint-field constant.
    pub fn scale(&self, k: Fq) -> Self {
        Self::new(&self.c0 * k, &self.c1 * k)
    }

    /// Multiplication by an Fq2 constant `k = (a, b)`:
    /// `(c0 + c1 u)(a + b u) = (c0 a + c1 b u²) + (c0 b + c1 a) u`.
    pub fn mul_by_fq2_constant(&self, k: Fq2) -> Self {
        let nr = fp2_nonresidue();
        Self::new(
            &self.c0 * k.c0 + &(&self.c1 * (k.c1 * nr)),
            &self.c0 * k.c1 + &(&self.c1 * k.c0),
        )
    }

    pub fn value(&self, cs: &ConstraintSystem<Fq>) -> Result<Fq2, SynthesisError> {
        Ok(Fq2::new(cs.eval(&self.c0)?, cs.eval(&self.c1)?))
    }

    /// Stores a witness value. Only legal on variable-backed elements (the
    /// kind produced by [`Fp2Var::alloc`]); derived linear combinations are
    /// computed, not assigned.
    pub fn assign(&self, cs: &mut ConstraintSystem<Fq>, value: Fq2) -> Result<(), SynthesisError> {
        let (c0, c1) = self.unit_variables()?;
        cs.assign(c0, value.c0)?;
        cs.assign(c1, value.c1)
    }

    fn unit_variables(&self) -> Result<(Variable, Variable), SynthesisError> {
        match (self.c0.as_unit_variable(), self.c1.as_unit_variable()) {
            (Some(c0), Some(c1)) => Ok((c0, c1)),
            _ => Err(SynthesisError::PreconditionViolation(
                "assignment target is a derived linear combination",
            )),
        }
    }

    /// Enforces `self = other` with two linear constraints.
    pub fn enforce_equal(&self, cs: &mut ConstraintSystem<Fq>, other: &Self, label: &str) {
        cs.enforce_linear(self.c0.clone(), other.c0.clone(), format!("{label}.c0"));
        cs.enforce_linear(self.c1.clone(), other.c1.clone(), format!("{label}.c1"));
    }
}

/// Checks `a · b = result` over Fq2 with three constraints:
///
/// ```text
/// a.c1 * b.c1                  = v1
/// a.c0 * b.c0                  = result.c0 − u²·v1
/// (a.c0+a.c1) * (b.c0+b.c1)    = result.c1 + result.c0 + (1−u²)·v1
/// ```
///
/// The result slot may be an arbitrary linear combination supplied by the
/// caller (e.g. `2·A`), in which case the caller owns result assignment and
/// witness generation here only fills the internal cross-term.
#[derive(Clone, Debug)]
pub struct Fp2MulGadget {
    pub a: Fp2Var,
    pub b: Fp2Var,
    result: Fp2Var,
    v1: Variable,
    owns_result: bool,
    label: String,
}

impl Fp2MulGadget {
    /// Allocates the result internally.
    pub fn new(cs: &mut ConstraintSystem<Fq>, a: Fp2Var, b: Fp2Var, label: &str) -> Self {
        let result = Fp2Var::alloc(cs, &format!("{label}.result"));
        let v1 = cs.alloc(format!("{label}.v1"));
        Self {
            a,
            b,
            result,
            v1,
            owns_result: true,
            label: label.to_string(),
        }
    }

    /// Checks the product against a caller-supplied result slot.
    pub fn with_result(
        cs: &mut ConstraintSystem<Fq>,
        a: Fp2Var,
        b: Fp2Var,
        result: Fp2Var,
        label: &str,
    ) -> Self {
        let v1 = cs.alloc(format!("{label}.v1"));
        Self {
            a,
            b,
            result,
            v1,
            owns_result: false,
            label: label.to_string(),
        }
    }

    pub fn result(&self) -> &Fp2Var {
        &self.result
    }

    pub fn generate_constraints(&self, cs: &mut ConstraintSystem<Fq>) {
        let nr = fp2_nonresidue();
        let v1 = LC::from(self.v1);
        cs.enforce(
            self.a.c1.clone(),
            self.b.c1.clone(),
            v1.clone(),
            format!("{}.v1", self.label),
        );
        cs.enforce(
            self.a.c0.clone(),
            self.b.c0.clone(),
            self.result.c0.clone() - &(&v1 * nr),
            format!("{}.c0", self.label),
        );
        cs.enforce(
            self.a.c0.clone() + &self.a.c1,
            self.b.c0.clone() + &self.b.c1,
            self.result.c1.clone() + &self.result.c0 + &(&v1 * (Fq::one() - nr)),
            format!("{}.c1", self.label),
        );
    }

    pub fn generate_witness(&self, cs: &mut ConstraintSystem<Fq>) -> Result<(), SynthesisError> {
        let a = self.a.value(cs)?;
        let b = self.b.value(cs)?;
        cs.assign(self.v1, a.c1 * b.c1)?;
        if self.owns_result {
            self.result.assign(cs, a * b)?;
        }
        Ok(())
    }
}

/// Checks `a² = result` over Fq2 with two product constraints and one linear
/// constraint. Same result-slot discipline as [`Fp2MulGadget`].
#[derive(Clone, Debug)]
pub struct Fp2SqrGadget {
    pub a: Fp2Var,
    result: Fp2Var,
    v1: Variable,
    owns_result: bool,
    label: String,
}

impl Fp2SqrGadget {
    pub fn new(cs: &mut ConstraintSystem<Fq>, a: Fp2Var, label: &str) -> Self {
        let result = Fp2Var::alloc(cs, &format!("{label}.result"));
        let v1 = cs.alloc(format!("{label}.v1"));
        Self {
            a,
            result,
            v1,
            owns_result: true,
            label: label.to_string(),
        }
    }

    pub fn with_result(
        cs: &mut ConstraintSystem<Fq>,
        a: Fp2Var,
        result: Fp2Var,
        label: &str,
    ) -> Self {
        let v1 = cs.alloc(format!("{label}.v1"));
        Self {
            a,
            result,
            v1,
            owns_result: false,
            label: label.to_string(),
        }
    }

    pub fn result(&self) -> &Fp2Var {
        &self.result
    }

    pub fn generate_constraints(&self, cs: &mut ConstraintSystem<Fq>) {
        let nr = fp2_nonresidue();
        let v1 = LC::from(self.v1);
        // v1 = c0*c1, then (c0+c1)(c0+u²c1) = r.c0 + (1+u²)v1 and r.c1 = 2v1.
        cs.enforce(
            self.a.c0.clone(),
            self.a.c1.clone(),
            v1.clone(),
            format!("{}.v1", self.label),
        );
        cs.enforce(
            self.a.c0.clone() + &self.a.c1,
            self.a.c0.clone() + &(&self.a.c1 * nr),
            self.result.c0.clone() + &(&v1 * (Fq::one() + nr)),
            format!("{}.c0", self.label),
        );
        cs.enforce_linear(
            &v1 * Fq::from(2u64),
            self.result.c1.clone(),
            format!("{}.c1", self.label),
        );
    }

    pub fn generate_witness(&self, cs: &mut ConstraintSystem<Fq>) -> Result<(), SynthesisError> {
        let a = self.a.value(cs)?;
        cs.assign(self.v1, a.c0 * a.c1)?;
        if self.owns_result {
            self.result.assign(cs, a.square())?;
        }
        Ok(())
    }
}

/// Computes `a · s` for a scalar linear combination `s`, with two product
/// constraints. This is the cheap form used when a line coefficient is
/// scaled by a G1 coordinate.
#[derive(Clone, Debug)]
pub struct Fp2MulByLcGadget {
    pub a: Fp2Var,
    pub s: LC<Fq>,
    result: Fp2Var,
    label: String,
}

impl Fp2MulByLcGadget {
    pub fn new(cs: &mut ConstraintSystem<Fq>, a: Fp2Var, s: LC<Fq>, label: &str) -> Self {
        let result = Fp2Var::alloc(cs, &format!("{label}.result"));
        Self {
            a,
            s,
            result,
            label: label.to_string(),
        }
    }

    pub fn result(&self) -> &Fp2Var {
        &self.result
    }

    pub fn generate_constraints(&self, cs: &mut ConstraintSystem<Fq>) {
        cs.enforce(
            self.a.c0.clone(),
            self.s.clone(),
            self.result.c0.clone(),
            format!("{}.c0", self.label),
        );
        cs.enforce(
            self.a.c1.clone(),
            self.s.clone(),
            self.result.c1.clone(),
            format!("{}.c1", self.label),
        );
    }

    pub fn generate_witness(&self, cs: &mut ConstraintSystem<Fq>) -> Result<(), SynthesisError> {
        let mut value = self.a.value(cs)?;
        let s = cs.eval(&self.s)?;
        value.mul_assign_by_fp(&s);
        self.result.assign(cs, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::{Field, UniformRand};
    use ark_std::test_rng;

    fn alloc_assigned(cs: &mut ConstraintSystem<Fq>, label: &str, value: Fq2) -> Fp2Var {
        let var = Fp2Var::alloc(cs, label);
        var.assign(cs, value).unwrap();
        var
    }

    #[test]
    fn mul_matches_reference() {
        let mut rng = test_rng();
        let mut cs = ConstraintSystem::<Fq>::new();
        let a_val = Fq2::rand(&mut rng);
        let b_val = Fq2::rand(&mut rng);

        let a = alloc_assigned(&mut cs, "a", a_val);
        let b = alloc_assigned(&mut cs, "b", b_val);
        let mul = Fp2MulGadget::new(&mut cs, a, b, "mul");
        mul.generate_constraints(&mut cs);
        mul.generate_witness(&mut cs).unwrap();

        assert!(cs.is_satisfied().unwrap());
        assert_eq!(mul.result().value(&cs).unwrap(), a_val * b_val);
    }

    #[test]
    fn mul_with_scaled_result_slot() {
        // The `R.X · R.Y = 2A` pattern: the gadget checks the product
        // against a doubled slot and the caller assigns the halved value.
        let mut rng = test_rng();
        let mut cs = ConstraintSystem::<Fq>::new();
        let x_val = Fq2::rand(&mut rng);
        let y_val = Fq2::rand(&mut rng);
        let half = Fq::from(2u64).inverse().unwrap();

        let x = alloc_assigned(&mut cs, "x", x_val);
        let y = alloc_assigned(&mut cs, "y", y_val);
        let a = Fp2Var::alloc(&mut cs, "a");
        let check = Fp2MulGadget::with_result(&mut cs, x, y, a.double(), "check_a");
        check.generate_constraints(&mut cs);

        let mut a_val = x_val * y_val;
        a_val.mul_assign_by_fp(&half);
        a.assign(&mut cs, a_val).unwrap();
        check.generate_witness(&mut cs).unwrap();

        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn sqr_matches_reference() {
        let mut rng = test_rng();
        let mut cs = ConstraintSystem::<Fq>::new();
        let a_val = Fq2::rand(&mut rng);

        let a = alloc_assigned(&mut cs, "a", a_val);
        let sqr = Fp2SqrGadget::new(&mut cs, a, "sqr");
        sqr.generate_constraints(&mut cs);
        sqr.generate_witness(&mut cs).unwrap();

        assert!(cs.is_satisfied().unwrap());
        assert_eq!(sqr.result().value(&cs).unwrap(), a_val.square());
    }

    #[test]
    fn mul_by_lc_matches_reference() {
        let mut rng = test_rng();
        let mut cs = ConstraintSystem::<Fq>::new();
        let a_val = Fq2::rand(&mut rng);
        let s_val = Fq::rand(&mut rng);

        let a = alloc_assigned(&mut cs, "a", a_val);
        let s = cs.alloc("s");
        cs.assign(s, s_val).unwrap();

        let mul = Fp2MulByLcGadget::new(&mut cs, a, LC::from(s), "mul_by_s");
        mul.generate_constraints(&mut cs);
        mul.generate_witness(&mut cs).unwrap();

        let mut expected = a_val;
        expected.mul_assign_by_fp(&s_val);
        assert!(cs.is_satisfied().unwrap());
        assert_eq!(mul.result().value(&cs).unwrap(), expected);
    }

    #[test]
    fn constant_multiplication_is_linear() {
        let mut rng = test_rng();
        let mut cs = ConstraintSystem::<Fq>::new();
        let a_val = Fq2::rand(&mut rng);
        let k = Fq2::rand(&mut rng);

        let a = alloc_assigned(&mut cs, "a", a_val);
        let scaled = a.mul_by_fq2_constant(k);
        assert_eq!(cs.num_constraints(), 0);
        assert_eq!(scaled.value(&cs).unwrap(), a_val * k);
    }

    #[test]
    fn assignment_rejected_on_derived_lc() {
        let mut cs = ConstraintSystem::<Fq>::new();
        let a = Fp2Var::alloc(&mut cs, "a");
        let derived = a.double();
        assert!(matches!(
            derived.assign(&mut cs, Fq2::one()),
            Err(SynthesisError::PreconditionViolation(_))
        ));
    }
}
