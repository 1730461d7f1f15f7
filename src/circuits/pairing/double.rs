//! Doubling step of the ate Miller loop.

use super::g2::{AteEllCoeffsVar, G2HomProjective, G2ProjectiveVar};
use super::params::AteParams;
use crate::circuits::fields::fp2::{Fp2MulGadget, Fp2SqrGadget, Fp2Var};
use crate::r1cs::{ConstraintSystem, SynthesisError};
use ark_bls12_377::{Fq, Fq2};
use ark_ff::{AdditiveGroup, Field};

/// Doubles the accumulator `R = (X, Y, Z)` and produces the tangent-line
/// coefficients. Intermediates follow the homogeneous-projective doubling
/// of Costello-Lange-Naehrig:
///
/// ```text
/// A = X·Y/2    B = Y²    C = Z²    E = 3b'·C    F = 3E
/// G = (B+F)/2  H = (Y+Z)² − (B+C)  I = E − B    J = X²
///
/// X' = A·(B−F)   Y' = G² − 3E²   Z' = B·H
/// line = (−H, 3J, I)
/// ```
///
/// `A`, `B`, `C`, `J`, `H`, `E²`, `G²` and the output coordinates are
/// allocated; everything else is a linear combination of them. Nine product
/// checks plus the linear `Y'` relation. `J` must be constrained even
/// though `X'`, `Y'`, `Z'` do not depend on it: the line coefficient `3J`
/// does.
#[derive(Clone, Debug)]
pub struct AteDoubleGadget {
    in_point: G2ProjectiveVar,
    a: Fp2Var,
    b: Fp2Var,
    c: Fp2Var,
    j: Fp2Var,
    h: Fp2Var,
    e_sq: Fp2Var,
    g_sq: Fp2Var,
    out: G2ProjectiveVar,
    check_a: Fp2MulGadget,
    check_b: Fp2SqrGadget,
    check_c: Fp2SqrGadget,
    check_j: Fp2SqrGadget,
    check_h: Fp2SqrGadget,
    check_e_sq: Fp2SqrGadget,
    check_g_sq: Fp2SqrGadget,
    check_out_x: Fp2MulGadget,
    check_out_z: Fp2MulGadget,
    coeffs: AteEllCoeffsVar,
    three_b: Fq2,
    two_inv: Fq,
    label: String,
}

impl AteDoubleGadget {
    pub fn new(
        cs: &mut ConstraintSystem<Fq>,
        in_point: G2ProjectiveVar,
        params: &AteParams,
        label: &str,
    ) -> Self {
        let a = Fp2Var::alloc(cs, &format!("{label}.A"));
        let b = Fp2Var::alloc(cs, &format!("{label}.B"));
        let c = Fp2Var::alloc(cs, &format!("{label}.C"));
        let j = Fp2Var::alloc(cs, &format!("{label}.J"));
        let h = Fp2Var::alloc(cs, &format!("{label}.H"));
        let e_sq = Fp2Var::alloc(cs, &format!("{label}.E2"));
        let g_sq = Fp2Var::alloc(cs, &format!("{label}.G2"));
        let out = G2ProjectiveVar::alloc(cs, &format!("{label}.out"));

        let tb = params.twist_coeff_b();
        let three_b = tb + tb + tb;
        let e = c.mul_by_fq2_constant(three_b);
        let f = e.triple();
        let g = b.add(&f).scale(params.two_inv());
        let i = e.sub(&b);

        let check_a = Fp2MulGadget::with_result(
            cs,
            in_point.x.clone(),
            in_point.y.clone(),
            a.double(),
            &format!("{label}.check_A"),
        );
        let check_b = Fp2SqrGadget::with_result(
            cs,
            in_point.y.clone(),
            b.clone(),
            &format!("{label}.check_B"),
        );
        let check_c = Fp2SqrGadget::with_result(
            cs,
            in_point.z.clone(),
            c.clone(),
            &format!("{label}.check_C"),
        );
        let check_j = Fp2SqrGadget::with_result(
            cs,
            in_point.x.clone(),
            j.clone(),
            &format!("{label}.check_J"),
        );
        let check_h = Fp2SqrGadget::with_result(
            cs,
            in_point.y.add(&in_point.z),
            h.add(&b).add(&c),
            &format!("{label}.check_H"),
        );
        let check_e_sq =
            Fp2SqrGadget::with_result(cs, e, e_sq.clone(), &format!("{label}.check_E2"));
        let check_g_sq =
            Fp2SqrGadget::with_result(cs, g, g_sq.clone(), &format!("{label}.check_G2"));
        let check_out_x = Fp2MulGadget::with_result(
            cs,
            a.clone(),
            b.sub(&f),
            out.x.clone(),
            &format!("{label}.check_out_x"),
        );
        let check_out_z = Fp2MulGadget::with_result(
            cs,
            b.clone(),
            h.clone(),
            out.z.clone(),
            &format!("{label}.check_out_z"),
        );

        let coeffs = AteEllCoeffsVar {
            ell_vw: h.neg(),
            ell_vv: j.triple(),
            ell_0: i,
        };

        Self {
            in_point,
            a,
            b,
            c,
            j,
            h,
            e_sq,
            g_sq,
            out,
            check_a,
            check_b,
            check_c,
            check_j,
            check_h,
            check_e_sq,
            check_g_sq,
            check_out_x,
            check_out_z,
            coeffs,
            three_b,
            two_inv: params.two_inv(),
            label: label.to_string(),
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
        self.check_j.generate_constraints(cs);
        self.check_h.generate_constraints(cs);
        self.check_e_sq.generate_constraints(cs);
        self.check_g_sq.generate_constraints(cs);
        self.check_out_x.generate_constraints(cs);
        self.check_out_z.generate_constraints(cs);

        let out_y = self.g_sq.sub(&self.e_sq.triple());
        self.out
            .y
            .enforce_equal(cs, &out_y, &format!("{}.check_out_y", self.label));
    }

    pub fn generate_witness(&self, cs: &mut ConstraintSystem<Fq>) -> Result<(), SynthesisError> {
        let r = self.in_point.value(cs)?;

        let mut a = r.x * r.y;
        a.mul_assign_by_fp(&self.two_inv);
        let b = r.y.square();
        let c = r.z.square();
        let e = self.three_b * c;
        let f = e.double() + e;
        let mut g = b + f;
        g.mul_assign_by_fp(&self.two_inv);
        let h = (r.y + r.z).square() - (b + c);
        let j = r.x.square();
        let e_sq = e.square();
        let g_sq = g.square();

        self.a.assign(cs, a)?;
        self.b.assign(cs, b)?;
        self.c.assign(cs, c)?;
        self.j.assign(cs, j)?;
        self.h.assign(cs, h)?;
        self.e_sq.assign(cs, e_sq)?;
        self.g_sq.assign(cs, g_sq)?;
        self.out.assign(
            cs,
            G2HomProjective {
                x: a * (b - f),
                y: g_sq - (e_sq.double() + e_sq),
                z: b * h,
            },
        )?;

        self.check_a.generate_witness(cs)?;
        self.check_b.generate_witness(cs)?;
        self.check_c.generate_witness(cs)?;
        self.check_j.generate_witness(cs)?;
        self.check_h.generate_witness(cs)?;
        self.check_e_sq.generate_witness(cs)?;
        self.check_g_sq.generate_witness(cs)?;
        self.check_out_x.generate_witness(cs)?;
        self.check_out_z.generate_witness(cs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_377::{Bls12_377, G2Projective};
    use ark_ec::pairing::Pairing;
    use ark_ec::{AffineRepr, CurveGroup};
    use ark_std::{test_rng, UniformRand};

    #[test]
    fn doubling_matches_prepared_coefficients() {
        let mut rng = test_rng();
        let params = AteParams::bls12_377().unwrap();
        let q = G2Projective::rand(&mut rng).into_affine();

        let mut cs = ConstraintSystem::<Fq>::new();
        let r = G2ProjectiveVar::alloc(&mut cs, "r");
        r.assign(&mut cs, G2HomProjective::from_affine(&q).unwrap())
            .unwrap();

        let dbl = AteDoubleGadget::new(&mut cs, r, &params, "dbl");
        dbl.generate_constraints(&mut cs);
        dbl.generate_witness(&mut cs).unwrap();
        assert_eq!(cs.first_unsatisfied().unwrap(), None);

        // The first prepared coefficient triple is exactly the first
        // doubling of Q with z = 1.
        let prepared = <Bls12_377 as Pairing>::G2Prepared::from(q);
        assert_eq!(dbl.coeffs().value(&cs).unwrap(), prepared.ell_coeffs[0]);

        let out = dbl.out_point().value(&cs).unwrap();
        assert_eq!(
            out.to_affine().unwrap(),
            (q.into_group() + q).into_affine()
        );
    }

    #[test]
    fn topology_is_fixed() {
        let params = AteParams::bls12_377().unwrap();
        let mut cs = ConstraintSystem::<Fq>::new();
        let r = G2ProjectiveVar::alloc(&mut cs, "r");
        let dbl = AteDoubleGadget::new(&mut cs, r, &params, "dbl");
        dbl.generate_constraints(&mut cs);

        // 9 quadratic checks at 3 constraints each, plus the linear Y'.
        assert_eq!(cs.num_constraints(), 9 * 3 + 2);
    }
}
