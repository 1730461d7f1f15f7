//! Curve parameters consumed by the ate-loop gadgets.

use crate::circuits::fields::fp6_3over2::fp6_nonresidue;
use crate::r1cs::SynthesisError;
use ark_bls12_377::{Fq, Fq2};
use ark_ec::bls12::Bls12Config;
use ark_ec::short_weierstrass::SWCurveConfig;
use ark_ff::{BitIteratorBE, Field, Zero};

/// Validated parameters of the optimal ate loop: the D-twist coefficient
/// `b' = b/ξ` of the G2 curve, the inverse of two in Fq, and the big-endian
/// bit schedule of the loop count.
///
/// Construction validates the coefficient against the base curve, so
/// gadgets taking an `AteParams` never have to re-check it.
#[derive(Clone, Debug)]
pub struct AteParams {
    twist_coeff_b: Fq2,
    two_inv: Fq,
    loop_bits: Vec<bool>,
}

impl AteParams {
    pub fn new(twist_coeff_b: Fq2, loop_bits: Vec<bool>) -> Result<Self, SynthesisError> {
        let base_b = Fq2::new(
            <ark_bls12_377::g1::Config as SWCurveConfig>::COEFF_B,
            Fq::zero(),
        );
        if twist_coeff_b * fp6_nonresidue() != base_b {
            return Err(SynthesisError::ParameterMismatch(
                "twist coefficient does not satisfy b' * xi = b",
            ));
        }
        if loop_bits.is_empty() {
            return Err(SynthesisError::ParameterMismatch("empty ate loop schedule"));
        }
        let two_inv = Fq::from(2u64)
            .inverse()
            .ok_or(SynthesisError::ParameterMismatch("two is not invertible"))?;
        Ok(Self {
            twist_coeff_b,
            two_inv,
            loop_bits,
        })
    }

    /// The BLS12-377 instantiation: the G2 twist coefficient together with
    /// the bits of the (positive) loop count `x`, most significant first,
    /// leading one dropped.
    pub fn bls12_377() -> Result<Self, SynthesisError> {
        let loop_bits = BitIteratorBE::new(<ark_bls12_377::Config as Bls12Config>::X)
            .skip(1)
            .collect();
        Self::new(
            <ark_bls12_377::g2::Config as SWCurveConfig>::COEFF_B,
            loop_bits,
        )
    }

    pub fn twist_coeff_b(&self) -> Fq2 {
        self.twist_coeff_b
    }

    pub fn two_inv(&self) -> Fq {
        self.two_inv
    }

    pub fn loop_bits(&self) -> &[bool] {
        &self.loop_bits
    }
}
