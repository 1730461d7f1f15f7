//! Mixed-addition step of the ate Miller loop.

use super::g2::{AteEllCoeffsVar, G2HomProjective, G2ProjectiveVar};
use crate::circuits::fields::fp2::{Fp2MulGadget, Fp2SqrGadget, Fp2Var};
use crate::r1cs::{ConstraintSystem, SynthesisError};
use ark_bls12_377::Fq;
use ark_ff::{AdditiveGroup, Field};

/// Adds the affine base point `Q = (Qx, Qy)` into the accumulator
/// `R = (X, Y, Z)` and produces the chord-line coefficients:
///
/// ```text
/// A = Qy·Z     B = Qx·Z     θ = Y − A     λ = X − B
/// C = θ²       D = λ²       E = λ·D       F = Z·C
/// G = X·D      H = E + F − 2G             I = Y·E
/// J = θ·Qx − λ·Qy
///
/// X' = λ·H     Y' = θ·(G−H) − I           Z' = Z·E
/// line = (λ, −θ, J)
/// ```
///
/// `θ`, `λ`, `H` and `J` stay linear combinations; the thirteen products
/// above are each checked with one gadget, the `Y'` relation riding on the
/// `θ·(G−H)` result slot.
#[derive(Clone, Debug)]
pub struct AteAdditionGadget {
    in_point: G2ProjectiveVar,
    q_x: Fp2Var,
    q_y: Fp2Var,
    a: Fp2Var,
    b: Fp2Var,
    c: Fp2Var,
    d: Fp2Var,
    e: Fp2Var,
    f: Fp2Var,
    g: Fp2Var,
    i: Fp2Var,
    theta_qx: Fp2Var,
    lambda_qy: Fp2Var,
    out: G2ProjectiveVar,
    check_a: Fp2MulGadget,
    check_b: Fp2MulGadget,
    check_c: Fp2SqrGadget,
    check_d: Fp2SqrGadget,
    check_e: Fp2MulGadget,
    check_f: Fp2MulGadget,
    check_g: Fp2MulGadget,
    check_i: Fp2MulGadget,
    check_theta_qx: Fp2MulGadget,
    check_lambda_qy: Fp2MulGadget,
    check_out_x: Fp2MulGadget,
    check_out_y: Fp2MulGadget,
    check_out_z: Fp2MulGadget,
    coeffs: AteEllCoeffsVar,
}

impl AteAdditionGadget {
    pub fn new(
        cs: &mut ConstraintSystem<Fq>,
        in_point: G2ProjectiveVar,
        q_x: Fp2Var,
        q_y: Fp2Var,
        label: &str,
    ) -> Self {
        let a = Fp2Var::alloc(cs, &format!("{label}.A"));
        let b = Fp2Var::alloc(cs, &format!("{label}.B"));
        let c = Fp2Var::alloc(cs, &format!("{label}.C"));
        let d = Fp2Var::alloc(cs, &format!("{label}.D"));
        let e = Fp2Var::alloc(cs, &format!("{label}.E"));
        let f = Fp2Var::alloc(cs, &format!("{label}.F"));
        let g = Fp2Var::alloc(cs, &format!("{label}.G"));
        let i = Fp2Var::alloc(cs, &format!("{label}.I"));
        let theta_qx = Fp2Var::alloc(cs, &format!("{label}.theta_qx"));
        let lambda_qy = Fp2Var::alloc(cs, &format!("{label}.lambda_qy"));
        let out = G2ProjectiveVar::alloc(cs, &format!("{label}.out"));

        let theta = in_point.y.sub(&a);
        let lambda = in_point.x.sub(&b);
        let h = e.add(&f).sub(&g.double());

        let check_a = Fp2MulGadget::with_result(
            cs,
            q_y.clone(),
            in_point.z.clone(),
            a.clone(),
            &format!("{label}.check_A"),
        );
        let check_b = Fp2MulGadget::with_result(
            cs,
            q_x.clone(),
            in_point.z.clone(),
            b.clone(),
            &format!("{label}.check_B"),
        );
        let check_c =
            Fp2SqrGadget::with_result(cs, theta.clone(), c.clone(), &format!("{label}.check_C"));
        let check_d =
            Fp2SqrGadget::with_result(cs, lambda.clone(), d.clone(), &format!("{label}.check_D"));
        let check_e = Fp2MulGadget::with_result(
            cs,
            lambda.clone(),
            d.clone(),
            e.clone(),
            &format!("{label}.check_E"),
        );
        let check_f = Fp2MulGadget::with_result(
            cs,
            in_point.z.clone(),
            c.clone(),
            f.clone(),
            &format!("{label}.check_F"),
        );
        let check_g = Fp2MulGadget::with_result(
            cs,
            in_point.x.clone(),
            d.clone(),
            g.clone(),
            &format!("{label}.check_G"),
        );
        let check_i = Fp2MulGadget::with_result(
            cs,
            in_point.y.clone(),
            e.clone(),
            i.clone(),
            &format!("{label}.check_I"),
        );
        let check_theta_qx = Fp2MulGadget::with_result(
            cs,
            theta.clone(),
            q_x.clone(),
            theta_qx.clone(),
            &format!("{label}.check_theta_qx"),
        );
        let check_lambda_qy = Fp2MulGadget::with_result(
            cs,
            lambda.clone(),
            q_y.clone(),
            lambda_qy.clone(),
            &format!("{label}.check_lambda_qy"),
        );
        let check_out_x = Fp2MulGadget::with_result(
            cs,
            lambda.clone(),
            h.clone(),
            out.x.clone(),
            &format!("{label}.check_out_x"),
        );
        let check_out_y = Fp2MulGadget::with_result(
            cs,
            theta.clone(),
            g.sub(&h),
            out.y.add(&i),
            &format!("{label}.check_out_y"),
        );
        let check_out_z = Fp2MulGadget::with_result(
            cs,
            in_point.z.clone(),
            e.clone(),
            out.z.clone(),
            &format!("{label}.check_out_z"),
        );

        let coeffs = AteEllCoeffsVar {
            ell_vw: lambda,
            ell_vv: theta.neg(),
            ell_0: theta_qx.sub(&lambda_qy),
        };

        Self {
            in_point,
            q_x,
            q_y,
            a,
            b,
            c,
            d,
            e,
            f,
            g,
            i,
            theta_qx,
            lambda_qy,
            out,
            check_a,
            check_b,
            check_c,
            check_d,
            check_e,
            check_f,
            check_g,
            check_i,
            check_theta_qx,
            check_lambda_qy,
            check_out_x,
            check_out_y,
            check_out_z,
            coeffs,
        }
    }

    pub fn out_point(&self) -> &G2ProjectiveVar {
        &self.out
    }

    pub fn coeffs(&self) -> &AteEllCoeffsVar {
        &self.coeffs
    }

    pub fn generate_constraints(&self, cs: &mut ConstraintSystem<Fq>) {
        self.check_a.generate_constraints(cs);
        self.check_b.generate_constraints(cs);
        self.check_c.generate_constraints(cs);
        self.check_d.generate_constraints(cs);
        self.check_e.generate_constraints(cs);
        self.check_f.generate_constraints(cs);
        self.check_g.generate_constraints(cs);
        self.check_i.generate_constraints(cs);
        self.check_theta_qx.generate_constraints(cs);
        self.check_lambda_qy.generate_constraints(cs);
        self.check_out_x.generate_constraints(cs);
        self.check_out_y.generate_constraints(cs);
        self.check_out_z.generate_constraints(cs);
    }

    pub fn generate_witness(&self, cs: &mut ConstraintSystem<Fq>) -> Result<(), SynthesisError> {
        let r = self.in_point.value(cs)?;
        let qx = self.q_x.value(cs)?;
        let qy = self.q_y.value(cs)?;

        let a = qy * r.z;
        let b = qx * r.z;
        let theta = r.y - a;
        let lambda = r.x - b;
        let c = theta.square();
        let d = lambda.square();
        let e = lambda * d;
        let f = r.z * c;
        let g = r.x * d;
        let h = e + f - g.double();
        let i = r.y * e;

        self.a.assign(cs, a)?;
        self.b.assign(cs, b)?;
        self.c.assign(cs, c)?;
        self.d.assign(cs, d)?;
        self.e.assign(cs, e)?;
        self.f.assign(cs, f)?;
        self.g.assign(cs, g)?;
        self.i.assign(cs, i)?;
        self.theta_qx.assign(cs, theta * qx)?;
        self.lambda_qy.assign(cs, lambda * qy)?;
        self.out.assign(
            cs,
            G2HomProjective {
                x: lambda * h,
                y: theta * (g - h) - i,
                z: r.z * e,
            },
        )?;

        self.check_a.generate_witness(cs)?;
        self.check_b.generate_witness(cs)?;
        self.check_c.generate_witness(cs)?;
        self.check_d.generate_witness(cs)?;
        self.check_e.generate_witness(cs)?;
        self.check_f.generate_witness(cs)?;
        self.check_g.generate_witness(cs)?;
        self.check_i.generate_witness(cs)?;
        self.check_theta_qx.generate_witness(cs)?;
        self.check_lambda_qy.generate_witness(cs)?;
        self.check_out_x.generate_witness(cs)?;
        self.check_out_y.generate_witness(cs)?;
        self.check_out_z.generate_witness(cs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_377::{G2Affine, G2Projective};
    use ark_ec::{AffineRepr, CurveGroup};
    use ark_std::{test_rng, UniformRand};

    #[test]
    fn addition_matches_group_law() {
        let mut rng = test_rng();
        let q = G2Projective::rand(&mut rng).into_affine();
        let r_affine: G2Affine = (q.into_group() + q).into_affine();

        let mut cs = ConstraintSystem::<Fq>::new();
        let r = G2ProjectiveVar::alloc(&mut cs, "r");
        let q_x = Fp2Var::alloc(&mut cs, "q.x");
        let q_y = Fp2Var::alloc(&mut cs, "q.y");
        r.assign(&mut cs, G2HomProjective::from_affine(&r_affine).unwrap())
            .unwrap();
        let (qx, qy) = q.xy().unwrap();
        q_x.assign(&mut cs, qx).unwrap();
        q_y.assign(&mut cs, qy).unwrap();

        let add = AteAdditionGadget::new(&mut cs, r, q_x, q_y, "add");
        add.generate_constraints(&mut cs);
        add.generate_witness(&mut cs).unwrap();
        assert_eq!(cs.first_unsatisfied().unwrap(), None);

        let out = add.out_point().value(&cs).unwrap();
        assert_eq!(
            out.to_affine().unwrap(),
            (q.into_group() + q + q).into_affine()
        );
    }

    #[test]
    fn topology_is_fixed() {
        let mut cs = ConstraintSystem::<Fq>::new();
        let r = G2ProjectiveVar::alloc(&mut cs, "r");
        let q_x = Fp2Var::alloc(&mut cs, "q.x");
        let q_y = Fp2Var::alloc(&mut cs, "q.y");
        let add = AteAdditionGadget::new(&mut cs, r, q_x, q_y, "add");
        add.generate_constraints(&mut cs);

        // 13 quadratic checks at 3 constraints each.
        assert_eq!(cs.num_constraints(), 13 * 3);
    }
}
