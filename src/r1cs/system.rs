//! Constraint recorder and witness store.

use super::ops::{Variable, LC};
use super::SynthesisError;
use ark_ff::PrimeField;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A single rank-1 constraint `⟨a,w⟩ · ⟨b,w⟩ = ⟨c,w⟩`. Linear relations are
/// recorded with `a = ONE`.
#[derive(Clone, Debug)]
pub struct Constraint<F: PrimeField> {
    pub a: LC<F>,
    pub b: LC<F>,
    pub c: LC<F>,
    pub label: String,
}

/// Variable allocator, constraint recorder and witness store.
///
/// Allocation is sequential and single-threaded. Independent gadget
/// instances should each own their own `ConstraintSystem`; the gadgets never
/// share variables across systems.
pub struct ConstraintSystem<F: PrimeField> {
    labels: Vec<String>,
    assignment: Vec<Option<F>>,
    constraints: Vec<Constraint<F>>,
}

impl<F: PrimeField> ConstraintSystem<F> {
    pub fn new() -> Self {
        Self {
            labels: vec!["ONE".to_string()],
            assignment: vec![Some(F::one())],
            constraints: vec![],
        }
    }

    /// Allocates a fresh variable carrying `label` for diagnostics.
    pub fn alloc(&mut self, label: impl Into<String>) -> Variable {
        let index = self.labels.len();
        self.labels.push(label.into());
        self.assignment.push(None);
        Variable(index)
    }

    /// Records the constraint `⟨a,w⟩ · ⟨b,w⟩ = ⟨c,w⟩`.
    pub fn enforce(&mut self, a: LC<F>, b: LC<F>, c: LC<F>, label: impl Into<String>) {
        self.constraints.push(Constraint {
            a,
            b,
            c,
            label: label.into(),
        });
    }

    /// Records the linear constraint `⟨lhs,w⟩ = ⟨rhs,w⟩`.
    pub fn enforce_linear(&mut self, lhs: LC<F>, rhs: LC<F>, label: impl Into<String>) {
        self.enforce(LC::one(), lhs, rhs, label);
    }

    /// Stores a witness value. Assignments may be overwritten; the gadgets
    /// in this crate only ever write each variable once per instance.
    pub fn assign(&mut self, var: Variable, value: F) -> Result<(), SynthesisError> {
        if var == Variable::ONE {
            return Err(SynthesisError::PreconditionViolation(
                "cannot assign to the constant-one variable",
            ));
        }
        match self.assignment.get_mut(var.0) {
            Some(slot) => {
                *slot = Some(value);
                Ok(())
            }
            None => Err(SynthesisError::PreconditionViolation(
                "variable does not belong to this constraint system",
            )),
        }
    }

    pub fn value(&self, var: Variable) -> Result<F, SynthesisError> {
        self.assignment
            .get(var.0)
            .copied()
            .flatten()
            .ok_or(SynthesisError::AssignmentMissing(var.0))
    }

    pub fn eval(&self, lc: &LC<F>) -> Result<F, SynthesisError> {
        lc.evaluate(&self.assignment)
            .map_err(SynthesisError::AssignmentMissing)
    }

    pub fn num_variables(&self) -> usize {
        self.labels.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn constraints(&self) -> &[Constraint<F>] {
        &self.constraints
    }

    pub fn variable_label(&self, var: Variable) -> Option<&str> {
        self.labels.get(var.0).map(String::as_str)
    }

    /// Checks every recorded constraint against the current assignment.
    /// Fails with `AssignmentMissing` if any referenced variable has no
    /// value yet.
    pub fn is_satisfied(&self) -> Result<bool, SynthesisError> {
        Ok(self.first_unsatisfied()?.is_none())
    }

    /// Returns the label of the first unsatisfied constraint, if any.
    pub fn first_unsatisfied(&self) -> Result<Option<&str>, SynthesisError> {
        let check = |constraint: &Constraint<F>| -> Result<bool, SynthesisError> {
            let a = self.eval(&constraint.a)?;
            let b = self.eval(&constraint.b)?;
            let c = self.eval(&constraint.c)?;
            Ok(a * b == c)
        };

        #[cfg(feature = "parallel")]
        {
            let failed = self
                .constraints
                .par_iter()
                .map(|constraint| Ok((check(constraint)?, constraint.label.as_str())))
                .collect::<Result<Vec<_>, SynthesisError>>()?;
            Ok(failed
                .into_iter()
                .find(|(ok, _)| !ok)
                .map(|(_, label)| label))
        }
        #[cfg(not(feature = "parallel"))]
        {
            for constraint in &self.constraints {
                if !check(constraint)? {
                    return Ok(Some(constraint.label.as_str()));
                }
            }
            Ok(None)
        }
    }
}

impl<F: PrimeField> Default for ConstraintSystem<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_377::Fq;
    use ark_ff::One;

    #[test]
    fn product_constraint_roundtrip() {
        let mut cs = ConstraintSystem::<Fq>::new();
        let x = cs.alloc("x");
        let y = cs.alloc("y");
        let z = cs.alloc("z");
        cs.enforce(LC::from(x), LC::from(y), LC::from(z), "x*y=z");

        cs.assign(x, Fq::from(3u64)).unwrap();
        cs.assign(y, Fq::from(5u64)).unwrap();
        assert_eq!(
            cs.is_satisfied(),
            Err(SynthesisError::AssignmentMissing(z.0))
        );

        cs.assign(z, Fq::from(15u64)).unwrap();
        assert!(cs.is_satisfied().unwrap());

        cs.assign(z, Fq::from(16u64)).unwrap();
        assert_eq!(cs.first_unsatisfied().unwrap(), Some("x*y=z"));
    }

    #[test]
    fn linear_constraint_uses_one() {
        let mut cs = ConstraintSystem::<Fq>::new();
        let x = cs.alloc("x");
        cs.enforce_linear(
            LC::from(x) * Fq::from(2u64),
            LC::constant(Fq::from(10u64)),
            "2x=10",
        );
        cs.assign(x, Fq::from(5u64)).unwrap();
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn one_is_reserved() {
        let mut cs = ConstraintSystem::<Fq>::new();
        assert_eq!(cs.value(Variable::ONE).unwrap(), Fq::one());
        assert!(cs.assign(Variable::ONE, Fq::one()).is_err());
        assert_eq!(cs.num_variables(), 1);
    }
}
