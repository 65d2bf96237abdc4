use serde::{Deserialize, Serialize};

use super::Magnetization;
use crate::value::SequenceBlock;

/// Rotation applied by an instantaneous RF pulse.
///
/// Row-major 3x3 matrix, independent of the tissue, shared by every tuple of
/// a block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RfPulseMatrix(pub [[f64; 3]; 3]);

impl RfPulseMatrix {
    /// Rotation by the flip angle `alpha` about the transverse axis selected by
    /// the phase `phi`, both in degrees.
    pub fn new(alpha: f64, phi: f64) -> Self {
        let (sa, ca) = alpha.to_radians().sin_cos();
        let (sp, cp) = phi.to_radians().sin_cos();

        let r01 = cp * sp * (1.0 - ca);
        Self([
            [cp * cp + ca * sp * sp, r01, -sa * sp],
            [r01, ca * cp * cp + sp * sp, sa * cp],
            [sa * sp, -sa * cp, ca],
        ])
    }

    pub fn identity() -> Self {
        Self([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    pub fn apply(&self, m: &Magnetization) -> Magnetization {
        let r = &self.0;
        [
            r[0][0] * m[0] + r[0][1] * m[1] + r[0][2] * m[2],
            r[1][0] * m[0] + r[1][1] * m[1] + r[1][2] * m[2],
            r[2][0] * m[0] + r[2][1] * m[1] + r[2][2] * m[2],
        ]
    }

    /// Rotate every column of `state` in place.
    pub fn rotate(&self, state: &mut [Magnetization]) {
        #[cfg(not(feature = "parallel"))]
        state.iter_mut().for_each(|m| *m = self.apply(m));

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            state.par_iter_mut().for_each(|m| *m = self.apply(m));
        }
    }

    pub fn transpose(&self) -> Self {
        let r = &self.0;
        Self(std::array::from_fn(|i| std::array::from_fn(|j| r[j][i])))
    }

    pub fn matmul(&self, other: &Self) -> Self {
        let (a, b) = (&self.0, &other.0);
        Self(std::array::from_fn(|i| {
            std::array::from_fn(|j| (0..3).map(|k| a[i][k] * b[k][j]).sum())
        }))
    }

    pub fn determinant(&self) -> f64 {
        let r = &self.0;
        r[0][0] * (r[1][1] * r[2][2] - r[1][2] * r[2][1])
            - r[0][1] * (r[1][0] * r[2][2] - r[1][2] * r[2][0])
            + r[0][2] * (r[1][0] * r[2][1] - r[1][1] * r[2][0])
    }
}

impl From<&SequenceBlock> for RfPulseMatrix {
    fn from(block: &SequenceBlock) -> Self {
        Self::new(block.fa, block.pa)
    }
}

/// One rotation per block, in schedule order.
pub fn rf_pulse_matrices<'a>(blocks: impl IntoIterator<Item = &'a SequenceBlock>) -> Vec<RfPulseMatrix> {
    blocks.into_iter().map(RfPulseMatrix::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_matrix_eq(a: &RfPulseMatrix, b: &RfPulseMatrix) {
        for i in 0..3 {
            for j in 0..3 {
                assert_abs_diff_eq!(a.0[i][j], b.0[i][j], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn zero_flip_is_identity() {
        assert_matrix_eq(&RfPulseMatrix::new(0.0, 37.0), &RfPulseMatrix::identity());
    }

    #[test]
    fn ninety_degrees_about_x_tips_z_into_y() {
        let m = RfPulseMatrix::new(90.0, 0.0).apply(&[0.0, 0.0, 1.0]);
        assert_abs_diff_eq!(m[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m[1], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn ninety_degrees_about_y_tips_z_into_minus_x() {
        let m = RfPulseMatrix::new(90.0, 90.0).apply(&[0.0, 0.0, 1.0]);
        assert_abs_diff_eq!(m[0], -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m[1], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn opposite_flip_inverts() {
        let r = RfPulseMatrix::new(35.0, 120.0);
        let inv = RfPulseMatrix::new(-35.0, 120.0);
        assert_matrix_eq(&r.matmul(&inv), &RfPulseMatrix::identity());
        assert_matrix_eq(&r.transpose(), &inv);
    }

    #[test]
    fn rotate_applies_to_every_column() {
        let mut state = vec![[0.0, 0.0, 1.0]; 4];
        RfPulseMatrix::new(180.0, 0.0).rotate(&mut state);
        for m in &state {
            assert_abs_diff_eq!(m[2], -1.0, epsilon = 1e-12);
        }
    }
}
