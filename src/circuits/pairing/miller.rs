//! The optimal ate Miller loop as a two-phase gadget.

use super::g2::AteEllCoeffsVar;
use super::params::AteParams;
use super::precompute::AtePrecomputeGadget;
use crate::circuits::fields::fp12_2over3over2::{Fp12MulBy034Gadget, Fp12SqrGadget, Fp12Var};
use crate::circuits::fields::fp2::{Fp2MulByLcGadget, Fp2Var};
use crate::circuits::fields::fp6_3over2::Fp6Var;
use crate::r1cs::{ConstraintSystem, SynthesisError, Variable, LC};
use ark_bls12_377::{Fq, Fq12, G1Affine, G2Affine};
use ark_ec::AffineRepr;

/// Evaluates one line at the G1 argument and folds it into the Fq12
/// accumulator. The line `(ell_vw, ell_vv, ell_0)` becomes the sparse
/// element `ell_vw·P.y + (ell_vv·P.x + ell_0·v)·w`, absorbed with a
/// (0,3,4)-sparse product.
#[derive(Clone, Debug)]
pub struct LineEvalGadget {
    vw: Fp2MulByLcGadget,
    vv: Fp2MulByLcGadget,
    fold: Fp12MulBy034Gadget,
}

impl LineEvalGadget {
    pub fn new(
        cs: &mut ConstraintSystem<Fq>,
        f: Fp12Var,
        coeffs: &AteEllCoeffsVar,
        p_x: LC<Fq>,
        p_y: LC<Fq>,
        label: &str,
    ) -> Self {
        let vw = Fp2MulByLcGadget::new(cs, coeffs.ell_vw.clone(), p_y, &format!("{label}.vw"));
        let vv = Fp2MulByLcGadget::new(cs, coeffs.ell_vv.clone(), p_x, &format!("{label}.vv"));
        let fold = Fp12MulBy034Gadget::new(
            cs,
            f,
            vw.result().clone(),
            vv.result().clone(),
            coeffs.ell_0.clone(),
            &format!("{label}.fold"),
        );
        Self { vw, vv, fold }
    }

    pub fn result(&self) -> &Fp12Var {
        self.fold.result()
    }

    pub fn generate_constraints(&self, cs: &mut ConstraintSystem<Fq>) {
        self.vw.generate_constraints(cs);
        self.vv.generate_constraints(cs);
        self.fold.generate_constraints(cs);
    }

    pub fn generate_witness(&self, cs: &mut ConstraintSystem<Fq>) -> Result<(), SynthesisError> {
        self.vw.generate_witness(cs)?;
        self.vv.generate_witness(cs)?;
        self.fold.generate_witness(cs)
    }
}

/// One entry of the fixed accumulator schedule.
#[derive(Clone, Debug)]
pub enum MillerOp {
    Square(Fp12SqrGadget),
    Line(LineEvalGadget),
}

impl MillerOp {
    pub fn is_square(&self) -> bool {
        matches!(self, MillerOp::Square(_))
    }

    fn generate_constraints(&self, cs: &mut ConstraintSystem<Fq>) {
        match self {
            MillerOp::Square(gadget) => gadget.generate_constraints(cs),
            MillerOp::Line(gadget) => gadget.generate_constraints(cs),
        }
    }

    fn generate_witness(&self, cs: &mut ConstraintSystem<Fq>) -> Result<(), SynthesisError> {
        match self {
            MillerOp::Square(gadget) => gadget.generate_witness(cs),
            MillerOp::Line(gadget) => gadget.generate_witness(cs),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Constructed,
    ConstraintsDeclared,
    WitnessAssigned,
}

/// `f = f² · line(R, P)` over the ate schedule, producing the unreduced
/// Miller value `f_{x,Q}(P)`.
///
/// Usage is strictly phased: construct, [`declare_constraints`], then
/// [`assign_witness`] with concrete points. The topology fixed at
/// construction is identical for every input pair.
///
/// The accumulator starts at one, so the first iteration's squaring is
/// skipped and its tangent line becomes the accumulator itself, laid out
/// sparsely; only two coordinate scalings are paid instead of a full
/// sparse product. The BLS12-377 loop count is positive, so no final
/// conjugation is needed.
///
/// [`declare_constraints`]: MillerLoopGadget::declare_constraints
/// [`assign_witness`]: MillerLoopGadget::assign_witness
#[derive(Clone, Debug)]
pub struct MillerLoopGadget {
    p_x: Variable,
    p_y: Variable,
    q_x: Fp2Var,
    q_y: Fp2Var,
    precompute: AtePrecomputeGadget,
    init_vw: Fp2MulByLcGadget,
    init_vv: Fp2MulByLcGadget,
    ops: Vec<MillerOp>,
    result: Fp12Var,
    stage: Stage,
}

impl MillerLoopGadget {
    /// Allocates fresh input wires for both points. Circuits that already
    /// carry the point coordinates should use [`MillerLoopGadget::with_inputs`].
    pub fn new(cs: &mut ConstraintSystem<Fq>, params: &AteParams, label: &str) -> Self {
        let p_x = cs.alloc(format!("{label}.p.x"));
        let p_y = cs.alloc(format!("{label}.p.y"));
        let q_x = Fp2Var::alloc(cs, &format!("{label}.q.x"));
        let q_y = Fp2Var::alloc(cs, &format!("{label}.q.y"));
        Self::with_inputs(cs, p_x, p_y, q_x, q_y, params, label)
    }

    /// Builds the loop over caller-supplied input wires. The Fq2 wires must
    /// be variable-backed (not derived linear combinations) so that
    /// [`MillerLoopGadget::assign_witness`] can store values into them.
    #[tracing::instrument(target = "r1cs", skip_all)]
    pub fn with_inputs(
        cs: &mut ConstraintSystem<Fq>,
        p_x: Variable,
        p_y: Variable,
        q_x: Fp2Var,
        q_y: Fp2Var,
        params: &AteParams,
        label: &str,
    ) -> Self {
        let precompute = AtePrecomputeGadget::new(
            cs,
            q_x.clone(),
            q_y.clone(),
            params,
            &format!("{label}.pre"),
        );

        let mut ops = vec![];
        let steps = precompute.steps();

        // f starts at one: 1² = 1 and 1·line = line, so the first step's
        // tangent line is the accumulator, built in place.
        let first = steps[0].double.coeffs();
        let init_vw = Fp2MulByLcGadget::new(
            cs,
            first.ell_vw.clone(),
            LC::from(p_y),
            &format!("{label}.init.vw"),
        );
        let init_vv = Fp2MulByLcGadget::new(
            cs,
            first.ell_vv.clone(),
            LC::from(p_x),
            &format!("{label}.init.vv"),
        );
        let mut f = Fp12Var::new(
            Fp6Var::new(init_vw.result().clone(), Fp2Var::zero(), Fp2Var::zero()),
            Fp6Var::new(init_vv.result().clone(), first.ell_0.clone(), Fp2Var::zero()),
        );
        if let Some(add) = &steps[0].add {
            let line = LineEvalGadget::new(
                cs,
                f,
                add.coeffs(),
                LC::from(p_x),
                LC::from(p_y),
                &format!("{label}.0.add_line"),
            );
            f = line.result().clone();
            ops.push(MillerOp::Line(line));
        }

        for (idx, step) in steps.iter().enumerate().skip(1) {
            let sqr = Fp12SqrGadget::new(cs, f, &format!("{label}.{idx}.sqr"));
            f = sqr.result().clone();
            ops.push(MillerOp::Square(sqr));

            let line = LineEvalGadget::new(
                cs,
                f,
                step.double.coeffs(),
                LC::from(p_x),
                LC::from(p_y),
                &format!("{label}.{idx}.dbl_line"),
            );
            f = line.result().clone();
            ops.push(MillerOp::Line(line));

            if let Some(add) = &step.add {
                let line = LineEvalGadget::new(
                    cs,
                    f,
                    add.coeffs(),
                    LC::from(p_x),
                    LC::from(p_y),
                    &format!("{label}.{idx}.add_line"),
                );
                f = line.result().clone();
                ops.push(MillerOp::Line(line));
            }
        }

        Self {
            p_x,
            p_y,
            q_x,
            q_y,
            precompute,
            init_vw,
            init_vv,
            ops,
            result: f,
            stage: Stage::Constructed,
        }
    }

    /// The accumulator schedule, for introspection. Its shape depends only
    /// on the loop parameters.
    pub fn ops(&self) -> &[MillerOp] {
        &self.ops
    }

    pub fn result(&self) -> &Fp12Var {
        &self.result
    }

    /// Reads the Miller value out of an assigned system.
    pub fn value(&self, cs: &ConstraintSystem<Fq>) -> Result<Fq12, SynthesisError> {
        self.result.value(cs)
    }

    #[tracing::instrument(target = "r1cs", skip_all)]
    pub fn declare_constraints(
        &mut self,
        cs: &mut ConstraintSystem<Fq>,
    ) -> Result<(), SynthesisError> {
        if self.stage != Stage::Constructed {
            return Err(SynthesisError::PreconditionViolation(
                "constraints have already been declared",
            ));
        }
        self.precompute.generate_constraints(cs);
        self.init_vw.generate_constraints(cs);
        self.init_vv.generate_constraints(cs);
        for op in &self.ops {
            op.generate_constraints(cs);
        }
        self.stage = Stage::ConstraintsDeclared;
        Ok(())
    }

    /// Binds concrete points and fills in every witness. Neither point may
    /// be the identity; subgroup membership is the caller's obligation.
    #[tracing::instrument(target = "r1cs", skip_all)]
    pub fn assign_witness(
        &mut self,
        cs: &mut ConstraintSystem<Fq>,
        p: &G1Affine,
        q: &G2Affine,
    ) -> Result<(), SynthesisError> {
        if self.stage != Stage::ConstraintsDeclared {
            return Err(SynthesisError::PreconditionViolation(
                "witness assignment requires declared constraints",
            ));
        }
        let (px, py) = p.xy().ok_or(SynthesisError::PreconditionViolation(
            "the G1 argument is the point at infinity",
        ))?;
        let (qx, qy) = q.xy().ok_or(SynthesisError::PreconditionViolation(
            "the G2 argument is the point at infinity",
        ))?;

        cs.assign(self.p_x, px)?;
        cs.assign(self.p_y, py)?;
        self.q_x.assign(cs, qx)?;
        self.q_y.assign(cs, qy)?;

        self.precompute.generate_witness(cs)?;
        self.init_vw.generate_witness(cs)?;
        self.init_vv.generate_witness(cs)?;
        for op in &self.ops {
            op.generate_witness(cs)?;
        }
        self.stage = Stage::WitnessAssigned;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_377::{Bls12_377, G1Projective, G2Projective};
    use ark_ec::pairing::Pairing;
    use ark_ec::CurveGroup;
    use ark_std::{test_rng, UniformRand};

    #[test]
    fn matches_multi_miller_loop() {
        let mut rng = test_rng();
        let params = AteParams::bls12_377().unwrap();
        let p = G1Projective::rand(&mut rng).into_affine();
        let q = G2Projective::rand(&mut rng).into_affine();

        let mut cs = ConstraintSystem::<Fq>::new();
        let mut gadget = MillerLoopGadget::new(&mut cs, &params, "miller");
        gadget.declare_constraints(&mut cs).unwrap();
        gadget.assign_witness(&mut cs, &p, &q).unwrap();

        assert_eq!(cs.first_unsatisfied().unwrap(), None);
        let expected = Bls12_377::multi_miller_loop([p], [q]).0;
        assert_eq!(gadget.value(&cs).unwrap(), expected);
    }

    #[test]
    fn stage_order_is_enforced() {
        let mut rng = test_rng();
        let params = AteParams::bls12_377().unwrap();
        let p = G1Projective::rand(&mut rng).into_affine();
        let q = G2Projective::rand(&mut rng).into_affine();

        let mut cs = ConstraintSystem::<Fq>::new();
        let mut gadget = MillerLoopGadget::new(&mut cs, &params, "miller");
        assert!(gadget.assign_witness(&mut cs, &p, &q).is_err());

        gadget.declare_constraints(&mut cs).unwrap();
        assert!(gadget.declare_constraints(&mut cs).is_err());

        gadget.assign_witness(&mut cs, &p, &q).unwrap();
        assert!(gadget.assign_witness(&mut cs, &p, &q).is_err());
    }

    #[test]
    fn rejects_points_at_infinity() {
        let mut rng = test_rng();
        let params = AteParams::bls12_377().unwrap();
        let p = G1Projective::rand(&mut rng).into_affine();

        let mut cs = ConstraintSystem::<Fq>::new();
        let mut gadget = MillerLoopGadget::new(&mut cs, &params, "miller");
        gadget.declare_constraints(&mut cs).unwrap();
        assert!(matches!(
            gadget.assign_witness(&mut cs, &p, &G2Affine::identity()),
            Err(SynthesisError::PreconditionViolation(_))
        ));
    }

    #[test]
    fn schedule_is_independent_of_inputs() {
        let params = AteParams::bls12_377().unwrap();

        let mut cs_a = ConstraintSystem::<Fq>::new();
        let gadget_a = MillerLoopGadget::new(&mut cs_a, &params, "miller");
        let mut cs_b = ConstraintSystem::<Fq>::new();
        let gadget_b = MillerLoopGadget::new(&mut cs_b, &params, "miller");

        let shape_a: Vec<bool> = gadget_a.ops().iter().map(MillerOp::is_square).collect();
        let shape_b: Vec<bool> = gadget_b.ops().iter().map(MillerOp::is_square).collect();
        assert_eq!(shape_a, shape_b);
        assert_eq!(cs_a.num_variables(), cs_b.num_variables());
        // 62 squarings; one line per step plus one per set bit, minus the
        // initial tangent absorbed into the accumulator.
        assert_eq!(shape_a.iter().filter(|s| **s).count(), 62);
        assert_eq!(shape_a.iter().filter(|s| !**s).count(), 62 + 6);
    }
}
