use ark_bls12_377::{Bls12_377, Fq, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup};
use ark_std::{test_rng, UniformRand};
use pairing_gadgets::{AteParams, ConstraintSystem, MillerLoopGadget};

fn miller_value(p: &G1Affine, q: &G2Affine) -> (ConstraintSystem<Fq>, ark_bls12_377::Fq12) {
    let params = AteParams::bls12_377().unwrap();
    let mut cs = ConstraintSystem::<Fq>::new();
    let mut gadget = MillerLoopGadget::new(&mut cs, &params, "miller");
    gadget.declare_constraints(&mut cs).unwrap();
    gadget.assign_witness(&mut cs, p, q).unwrap();
    let value = gadget.value(&cs).unwrap();
    (cs, value)
}

#[test]
fn agrees_with_arkworks_on_random_points() {
    let mut rng = test_rng();
    for _ in 0..3 {
        let p = G1Projective::rand(&mut rng).into_affine();
        let q = G2Projective::rand(&mut rng).into_affine();

        let (cs, value) = miller_value(&p, &q);
        assert_eq!(cs.first_unsatisfied().unwrap(), None);
        assert_eq!(value, Bls12_377::multi_miller_loop([p], [q]).0);
    }
}

#[test]
fn agrees_with_arkworks_on_generators() {
    let p = G1Affine::generator();
    let q = G2Affine::generator();

    let (cs, value) = miller_value(&p, &q);
    assert_eq!(cs.first_unsatisfied().unwrap(), None);
    assert_eq!(value, Bls12_377::multi_miller_loop([p], [q]).0);
}

#[test]
fn witness_assignment_is_deterministic() {
    let mut rng = test_rng();
    let p = G1Projective::rand(&mut rng).into_affine();
    let q = G2Projective::rand(&mut rng).into_affine();

    let (cs_a, value_a) = miller_value(&p, &q);
    let (cs_b, value_b) = miller_value(&p, &q);
    assert_eq!(value_a, value_b);
    assert_eq!(cs_a.num_constraints(), cs_b.num_constraints());
    assert_eq!(cs_a.num_variables(), cs_b.num_variables());

    // Identical inputs must produce identical assignments, variable by
    // variable, not just an equal final accumulator.
    for index in 0..cs_a.num_variables() {
        let var = pairing_gadgets::r1cs::Variable(index);
        assert_eq!(cs_a.value(var).unwrap(), cs_b.value(var).unwrap());
    }
}

#[test]
fn topology_is_input_independent() {
    let mut rng = test_rng();
    let p = G1Projective::rand(&mut rng).into_affine();
    let q = G2Projective::rand(&mut rng).into_affine();

    let (cs_a, _) = miller_value(&p, &q);
    let (cs_b, _) = miller_value(&G1Affine::generator(), &G2Affine::generator());
    assert_eq!(cs_a.num_constraints(), cs_b.num_constraints());
    assert_eq!(cs_a.num_variables(), cs_b.num_variables());
}

#[test]
fn corrupted_witness_is_rejected() {
    let mut rng = test_rng();
    let p = G1Projective::rand(&mut rng).into_affine();
    let q = G2Projective::rand(&mut rng).into_affine();

    let params = AteParams::bls12_377().unwrap();
    let mut cs = ConstraintSystem::<Fq>::new();
    let mut gadget = MillerLoopGadget::new(&mut cs, &params, "miller");
    gadget.declare_constraints(&mut cs).unwrap();
    gadget.assign_witness(&mut cs, &p, &q).unwrap();
    assert!(cs.is_satisfied().unwrap());

    // Tampering with any single intermediate must break some constraint.
    let tampered = pairing_gadgets::r1cs::Variable(cs.num_variables() / 2);
    cs.assign(tampered, Fq::rand(&mut rng)).unwrap();
    assert!(!cs.is_satisfied().unwrap());
}

#[test]
fn pairing_bilinearity_through_miller_values() {
    // e(2P, Q) and e(P, 2Q) share a Miller value only after final
    // exponentiation, but both must match the arkworks loop exactly.
    let mut rng = test_rng();
    let p = G1Projective::rand(&mut rng).into_affine();
    let q = G2Projective::rand(&mut rng).into_affine();
    let p2 = (p.into_group() + p).into_affine();
    let q2 = (q.into_group() + q).into_affine();

    let (_, value_p2) = miller_value(&p2, &q);
    let (_, value_q2) = miller_value(&p, &q2);
    assert_eq!(value_p2, Bls12_377::multi_miller_loop([p2], [q]).0);
    assert_eq!(value_q2, Bls12_377::multi_miller_loop([p], [q2]).0);

    let lhs = Bls12_377::final_exponentiation(ark_ec::pairing::MillerLoopOutput(value_p2)).unwrap();
    let rhs = Bls12_377::final_exponentiation(ark_ec::pairing::MillerLoopOutput(value_q2)).unwrap();
    assert_eq!(lhs, rhs);
}
