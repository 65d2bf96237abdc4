use std::f64::consts::TAU;

use super::{Magnetization, for_each_column};
use crate::value::MaterialTuple;

/// Free precession of the transverse magnetization caused by off-resonance.
///
/// For an interval `t` (ms) and offset `df` (kHz) the transverse pair is
/// rotated by `beta = 2 pi t df`:
///
/// ```text
/// x' =  cos(beta) x + sin(beta) y
/// y' = -sin(beta) x + cos(beta) y
/// ```
///
/// i.e. clockwise seen from +z, which is the Larmor precession sense of
/// positive gyromagnetic ratio spins. `z` is left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OffResonanceTerms {
    t: f64,
    /// (cos(beta), sin(beta)) per tuple
    rotation: Vec<(f64, f64)>,
}

impl OffResonanceTerms {
    pub fn compute(t: f64, tissues: &[MaterialTuple]) -> Self {
        let mut terms = Self::default();
        terms.update(t, tissues);
        terms
    }

    pub fn update(&mut self, t: f64, tissues: &[MaterialTuple]) {
        self.t = t;
        self.rotation.clear();
        self.rotation.extend(tissues.iter().map(|m| {
            let (sin, cos) = (TAU * t * m.df).sin_cos();
            (cos, sin)
        }));
    }

    pub fn elapsed(&self) -> f64 {
        self.t
    }

    pub fn len(&self) -> usize {
        self.rotation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rotation.is_empty()
    }

    /// The 2x2 transverse rotation of tuple `index`, row-major.
    pub fn matrix(&self, index: usize) -> [[f64; 2]; 2] {
        let (c, s) = self.rotation[index];
        [[c, s], [-s, c]]
    }

    pub fn apply(&self, state: &mut [Magnetization]) {
        for_each_column(state, &self.rotation, |m, &(c, s)| {
            let [x, y, _] = *m;
            m[0] = c * x + s * y;
            m[1] = c * y - s * x;
        });
    }
}
