use ark_bls12_377::{Fq, G1Affine, G2Affine};
use ark_ec::AffineRepr;
use criterion::{criterion_group, criterion_main, Criterion};
use pairing_gadgets::{AteParams, ConstraintSystem, MillerLoopGadget};

fn synthesize(c: &mut Criterion) {
    let params = AteParams::bls12_377().unwrap();
    c.bench_function("miller_loop/synthesize", |bencher| {
        bencher.iter(|| {
            let mut cs = ConstraintSystem::<Fq>::new();
            let mut gadget = MillerLoopGadget::new(&mut cs, &params, "miller");
            gadget.declare_constraints(&mut cs).unwrap();
            cs.num_constraints()
        })
    });
}

fn witness(c: &mut Criterion) {
    let params = AteParams::bls12_377().unwrap();
    let p = G1Affine::generator();
    let q = G2Affine::generator();
    c.bench_function("miller_loop/witness", |bencher| {
        bencher.iter(|| {
            let mut cs = ConstraintSystem::<Fq>::new();
            let mut gadget = MillerLoopGadget::new(&mut cs, &params, "miller");
            gadget.declare_constraints(&mut cs).unwrap();
            gadget.assign_witness(&mut cs, &p, &q).unwrap();
            gadget.value(&cs).unwrap()
        })
    });
}

criterion_group!(benches, synthesize, witness);
criterion_main!(benches);
