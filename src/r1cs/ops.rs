//! Defines the Linear Combination (LC) object and associated operations.
//! A LinearCombination is a vector of Terms, where each Term is a pair of a
//! Variable and a field coefficient.

use ark_ff::PrimeField;
use std::fmt::Debug;

/// Index of a variable in a [`crate::r1cs::ConstraintSystem`]. Variables are
/// bound to exactly one constraint system; mixing indices across systems is
/// a caller error that the substrate does not detect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(pub usize);

impl Variable {
    /// The constant-one variable, present in every constraint system.
    pub const ONE: Variable = Variable(0);
}

/// A variable scaled by a field coefficient.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Term<F: PrimeField>(pub Variable, pub F);

impl<F: PrimeField> Debug for Term<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}*v{}", self.1, self.0 .0)
    }
}

/// Linear combination of terms.
#[derive(Clone, Debug, Default)]
pub struct LC<F: PrimeField>(Vec<Term<F>>);

impl<F: PrimeField> LC<F> {
    pub fn new(terms: Vec<Term<F>>) -> Self {
        LC(terms)
    }

    pub fn zero() -> Self {
        LC(vec![])
    }

    /// The constant `c`, i.e. `c * ONE`.
    pub fn constant(c: F) -> Self {
        LC(vec![Term(Variable::ONE, c)])
    }

    pub fn one() -> Self {
        Self::constant(F::one())
    }

    pub fn terms(&self) -> &[Term<F>] {
        &self.0
    }

    pub fn num_terms(&self) -> usize {
        self.0.len()
    }

    /// If this combination is exactly `1 * v` for a single non-constant
    /// variable `v`, returns it. Witness assignment through an
    /// extension-field wrapper is only legal on such combinations.
    pub fn as_unit_variable(&self) -> Option<Variable> {
        match self.0.as_slice() {
            [Term(v, c)] if *v != Variable::ONE && c.is_one() => Some(*v),
            _ => None,
        }
    }

    /// Evaluates the combination against a full assignment vector. Returns
    /// the index of the first unassigned variable on failure.
    pub fn evaluate(&self, assignment: &[Option<F>]) -> Result<F, usize> {
        let mut acc = F::zero();
        for Term(v, coeff) in &self.0 {
            let value = assignment.get(v.0).copied().flatten().ok_or(v.0)?;
            acc += value * coeff;
        }
        Ok(acc)
    }

    fn push_merged(&mut self, term: Term<F>) {
        if let Some(existing) = self.0.iter_mut().find(|t| t.0 == term.0) {
            existing.1 += term.1;
        } else {
            self.0.push(term);
        }
    }
}

impl<F: PrimeField> From<Variable> for LC<F> {
    fn from(v: Variable) -> Self {
        LC(vec![Term(v, F::one())])
    }
}

impl<F: PrimeField> From<Term<F>> for LC<F> {
    fn from(t: Term<F>) -> Self {
        LC(vec![t])
    }
}

impl<F: PrimeField> std::ops::Add for LC<F> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        let mut combined = self;
        for term in other.0 {
            combined.push_merged(term);
        }
        combined
    }
}

impl<F: PrimeField> std::ops::Add<&LC<F>> for LC<F> {
    type Output = Self;

    fn add(self, other: &LC<F>) -> Self {
        let mut combined = self;
        for term in &other.0 {
            combined.push_merged(*term);
        }
        combined
    }
}

impl<F: PrimeField> std::ops::Neg for LC<F> {
    type Output = Self;

    fn neg(self) -> Self {
        LC(self.0.into_iter().map(|Term(v, c)| Term(v, -c)).collect())
    }
}

impl<F: PrimeField> std::ops::Sub for LC<F> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self + (-other)
    }
}

impl<F: PrimeField> std::ops::Sub<&LC<F>> for LC<F> {
    type Output = Self;

    fn sub(self, other: &LC<F>) -> Self {
        self + (-other.clone())
    }
}

impl<F: PrimeField> std::ops::Mul<F> for LC<F> {
    type Output = Self;

    fn mul(self, scalar: F) -> Self {
        LC(self
            .0
            .into_iter()
            .map(|Term(v, c)| Term(v, c * scalar))
            .collect())
    }
}

impl<F: PrimeField> std::ops::Mul<F> for &LC<F> {
    type Output = LC<F>;

    fn mul(self, scalar: F) -> LC<F> {
        self.clone() * scalar
    }
}
