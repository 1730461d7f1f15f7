//! G2 point and line-coefficient representations for the ate loop.

use crate::circuits::fields::fp2::Fp2Var;
use crate::r1cs::{ConstraintSystem, SynthesisError};
use ark_bls12_377::{Fq, Fq2, G2Affine};
use ark_ec::AffineRepr;
use ark_ff::{Field, One};

/// A G2 point in homogeneous projective coordinates, as plain field values.
/// This is the witness-side counterpart of [`G2ProjectiveVar`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct G2HomProjective {
    pub x: Fq2,
    pub y: Fq2,
    pub z: Fq2,
}

impl G2HomProjective {
    /// The point at infinity has no affine coordinates and cannot enter the
    /// ate loop; callers must handle it before synthesis.
    pub fn from_affine(point: &G2Affine) -> Result<Self, SynthesisError> {
        let (x, y) = point.xy().ok_or(SynthesisError::PreconditionViolation(
            "the point at infinity has no affine coordinates",
        ))?;
        Ok(Self {
            x,
            y,
            z: Fq2::one(),
        })
    }

    pub fn to_affine(self) -> Result<G2Affine, SynthesisError> {
        let z_inv = self.z.inverse().ok_or(SynthesisError::PreconditionViolation(
            "projective point with z = 0 has no affine form",
        ))?;
        Ok(G2Affine::new_unchecked(self.x * z_inv, self.y * z_inv))
    }
}

/// Symbolic G2 point in homogeneous projective coordinates.
#[derive(Clone, Debug)]
pub struct G2ProjectiveVar {
    pub x: Fp2Var,
    pub y: Fp2Var,
    pub z: Fp2Var,
}

impl G2ProjectiveVar {
    pub fn new(x: Fp2Var, y: Fp2Var, z: Fp2Var) -> Self {
        Self { x, y, z }
    }

    pub fn alloc(cs: &mut ConstraintSystem<Fq>, label: &str) -> Self {
        Self::new(
            Fp2Var::alloc(cs, &format!("{label}.x")),
            Fp2Var::alloc(cs, &format!("{label}.y")),
            Fp2Var::alloc(cs, &format!("{label}.z")),
        )
    }

    /// Wraps affine input coordinates with `z = 1`. Costs no variables.
    pub fn from_affine_vars(x: Fp2Var, y: Fp2Var) -> Self {
        Self::new(x, y, Fp2Var::one())
    }

    pub fn value(&self, cs: &ConstraintSystem<Fq>) -> Result<G2HomProjective, SynthesisError> {
        Ok(G2HomProjective {
            x: self.x.value(cs)?,
            y: self.y.value(cs)?,
            z: self.z.value(cs)?,
        })
    }

    pub fn assign(
        &self,
        cs: &mut ConstraintSystem<Fq>,
        value: G2HomProjective,
    ) -> Result<(), SynthesisError> {
        self.x.assign(cs, value.x)?;
        self.y.assign(cs, value.y)?;
        self.z.assign(cs, value.z)
    }
}

/// Coefficients of one tangent or chord line in the sparse (0,3,4) layout:
/// evaluated at a G1 point `P`, the line becomes the Fq12 element
/// `ell_vw·P.y + (ell_vv·P.x)·w + ell_0·v·w`.
///
/// The component order of [`AteEllCoeffsVar::value`] matches the prepared
/// coefficient triples of the D-twist convention, so witness values can be
/// compared entry-for-entry against out-of-circuit precomputation.
#[derive(Clone, Debug)]
pub struct AteEllCoeffsVar {
    pub ell_vw: Fp2Var,
    pub ell_vv: Fp2Var,
    pub ell_0: Fp2Var,
}

impl AteEllCoeffsVar {
    pub fn value(&self, cs: &ConstraintSystem<Fq>) -> Result<(Fq2, Fq2, Fq2), SynthesisError> {
        Ok((
            self.ell_vw.value(cs)?,
            self.ell_vv.value(cs)?,
            self.ell_0.value(cs)?,
        ))
    }
}
