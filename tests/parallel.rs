#![cfg(feature = "parallel")]

use mrfdict::engine::{Magnetization, OffResonanceTerms, RelaxationTerms, RfPulseMatrix};
use mrfdict::{
    MaterialTuple, ParameterSpace, SequenceKind, SequenceSchedule, SequenceSource, build_dictionary,
};

fn free_precession(m: &mut Magnetization, i: usize, t: f64, tissues: &[MaterialTuple]) {
    let [[c, s], _] = OffResonanceTerms::compute(t, tissues).matrix(i);
    let [x, y, _] = *m;
    m[0] = c * x + s * y;
    m[1] = c * y - s * x;

    let relaxation = RelaxationTerms::compute(t, tissues).unwrap();
    let (d, r) = (relaxation.decay(i), relaxation.recovery(i));
    for k in 0..3 {
        m[k] = d[k] * m[k] + r[k];
    }
}

/// One tuple at a time, no rayon involved.
fn sequential_fingerprints(space: &ParameterSpace, schedule: &SequenceSchedule) -> Vec<Vec<Magnetization>> {
    let tissues = space.tuples();
    (0..tissues.len())
        .map(|i| {
            let mut m = [0.0, 0.0, 1.0];
            schedule
                .iter()
                .map(|block| {
                    m = RfPulseMatrix::from(block).apply(&m);
                    free_precession(&mut m, i, block.te, tissues);
                    let readout = m;
                    free_precession(&mut m, i, block.tr - block.te, tissues);
                    readout
                })
                .collect()
        })
        .collect()
}

#[test]
fn parallel_build_matches_sequential_reference() {
    let tuples = (0..64)
        .map(|i| {
            let t1 = 300.0 + 40.0 * i as f64;
            MaterialTuple::new(t1, t1 / 8.0, 0.003 * (i % 7) as f64 - 0.01)
        })
        .collect();
    let space = ParameterSpace::new(tuples).unwrap();
    let blocks: Vec<_> = SequenceKind::Bssfp.schedule(2).unwrap().iter().take(120).copied().collect();
    let schedule = SequenceSchedule::new(blocks).unwrap();

    let dict = build_dictionary(&space, &schedule).unwrap();
    let reference = sequential_fingerprints(&space, &schedule);

    for (i, (_, fingerprint)) in dict.fingerprints().enumerate() {
        assert_eq!(fingerprint, reference[i].as_slice(), "tuple {i}");
    }
}

#[test]
fn parallel_rotation_matches_single_column_apply() {
    let rf = RfPulseMatrix::new(37.0, 112.0);
    let mut state: Vec<Magnetization> = (0..1000)
        .map(|i| {
            let a = i as f64 * 0.01;
            [a.sin() * 0.5, a.cos() * 0.5, 0.7]
        })
        .collect();
    let expected: Vec<_> = state.iter().map(|m| rf.apply(m)).collect();
    rf.rotate(&mut state);
    assert_eq!(state, expected);
}
