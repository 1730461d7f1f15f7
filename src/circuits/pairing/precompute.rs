//! Ate precomputation: the doubling/addition ladder over G2.

use super::add::AteAdditionGadget;
use super::double::AteDoubleGadget;
use super::g2::G2ProjectiveVar;
use super::params::AteParams;
use crate::circuits::fields::fp2::Fp2Var;
use crate::r1cs::{ConstraintSystem, SynthesisError};
use ark_bls12_377::Fq;

/// One bit of the ate ladder: a doubling, followed by a mixed addition when
/// the schedule bit is set.
#[derive(Clone, Debug)]
pub struct AteStep {
    pub double: AteDoubleGadget,
    pub add: Option<AteAdditionGadget>,
}

/// Walks the full loop schedule over the G2 accumulator, starting from
/// `R = (Qx, Qy, 1)`, and exposes the per-step line coefficients. The
/// ladder shape is a pure function of the schedule; witness data never
/// changes which gadgets exist.
#[derive(Clone, Debug)]
pub struct AtePrecomputeGadget {
    steps: Vec<AteStep>,
}

impl AtePrecomputeGadget {
    #[tracing::instrument(target = "r1cs", skip_all)]
    pub fn new(
        cs: &mut ConstraintSystem<Fq>,
        q_x: Fp2Var,
        q_y: Fp2Var,
        params: &AteParams,
        label: &str,
    ) -> Self {
        let mut r = G2ProjectiveVar::from_affine_vars(q_x.clone(), q_y.clone());
        let mut steps = Vec::with_capacity(params.loop_bits().len());

        for (idx, bit) in params.loop_bits().iter().enumerate() {
            let double = AteDoubleGadget::new(cs, r, params, &format!("{label}.{idx}.dbl"));
            r = double.out_point().clone();

            let add = if *bit {
                let gadget = AteAdditionGadget::new(
                    cs,
                    r,
                    q_x.clone(),
                    q_y.clone(),
                    &format!("{label}.{idx}.add"),
                );
                r = gadget.out_point().clone();
                Some(gadget)
            } else {
                None
            };

            steps.push(AteStep { double, add });
        }

        Self { steps }
    }

    pub fn steps(&self) -> &[AteStep] {
        &self.steps
    }

    pub fn generate_constraints(&self, cs: &mut ConstraintSystem<Fq>) {
        for step in &self.steps {
            step.double.generate_constraints(cs);
            if let Some(add) = &step.add {
                add.generate_constraints(cs);
            }
        }
    }

    pub fn generate_witness(&self, cs: &mut ConstraintSystem<Fq>) -> Result<(), SynthesisError> {
        for step in &self.steps {
            step.double.generate_witness(cs)?;
            if let Some(add) = &step.add {
                add.generate_witness(cs)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_377::{Bls12_377, Fq2, G2Projective};
    use ark_ec::pairing::Pairing;
    use ark_ec::{AffineRepr, CurveGroup};
    use ark_std::{test_rng, UniformRand};

    fn coeff_sequence(
        gadget: &AtePrecomputeGadget,
        cs: &ConstraintSystem<Fq>,
    ) -> Vec<(Fq2, Fq2, Fq2)> {
        let mut coeffs = vec![];
        for step in gadget.steps() {
            coeffs.push(step.double.coeffs().value(cs).unwrap());
            if let Some(add) = &step.add {
                coeffs.push(add.coeffs().value(cs).unwrap());
            }
        }
        coeffs
    }

    #[test]
    fn matches_prepared_point() {
        let mut rng = test_rng();
        let params = AteParams::bls12_377().unwrap();
        let q = G2Projective::rand(&mut rng).into_affine();

        let mut cs = ConstraintSystem::<Fq>::new();
        let q_x = Fp2Var::alloc(&mut cs, "q.x");
        let q_y = Fp2Var::alloc(&mut cs, "q.y");
        let (qx, qy) = q.xy().unwrap();
        q_x.assign(&mut cs, qx).unwrap();
        q_y.assign(&mut cs, qy).unwrap();

        let precompute = AtePrecomputeGadget::new(&mut cs, q_x, q_y, &params, "pre");
        precompute.generate_constraints(&mut cs);
        precompute.generate_witness(&mut cs).unwrap();
        assert_eq!(cs.first_unsatisfied().unwrap(), None);

        let prepared = <Bls12_377 as Pairing>::G2Prepared::from(q);
        assert_eq!(coeff_sequence(&precompute, &cs), prepared.ell_coeffs);
    }

    #[test]
    fn ladder_shape_follows_schedule() {
        let params = AteParams::bls12_377().unwrap();
        let mut cs = ConstraintSystem::<Fq>::new();
        let q_x = Fp2Var::alloc(&mut cs, "q.x");
        let q_y = Fp2Var::alloc(&mut cs, "q.y");
        let precompute = AtePrecomputeGadget::new(&mut cs, q_x, q_y, &params, "pre");

        assert_eq!(precompute.steps().len(), 63);
        let adds = precompute
            .steps()
            .iter()
            .filter(|s| s.add.is_some())
            .count();
        assert_eq!(adds, 6);
    }
}
