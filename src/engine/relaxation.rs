use super::{Magnetization, for_each_column};
use crate::error::DomainError;
use crate::value::MaterialTuple;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Decay {
    /// exp(-t / T2)
    e2: f64,
    /// exp(-t / T1)
    e1: f64,
}

/// T1 / T2 relaxation of every tuple over one time interval.
///
/// Applying the terms computes `m' = D * m + Dz` element-wise, with
/// `D = [E2, E2, E1]` and `Dz = [0, 0, 1 - E1]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelaxationTerms {
    t: f64,
    decay: Vec<Decay>,
}

/// Check that every tuple has finite, positive relaxation times.
pub fn check_relaxation_times(tissues: &[MaterialTuple]) -> Result<(), DomainError> {
    for (index, m) in tissues.iter().enumerate() {
        if !(m.t1 > 0.0 && m.t1.is_finite()) {
            return Err(DomainError::InvalidT1 { index, value: m.t1 });
        }
        if !(m.t2 > 0.0 && m.t2.is_finite()) {
            return Err(DomainError::InvalidT2 { index, value: m.t2 });
        }
    }
    Ok(())
}

impl RelaxationTerms {
    pub fn compute(t: f64, tissues: &[MaterialTuple]) -> Result<Self, DomainError> {
        check_relaxation_times(tissues)?;
        let mut terms = Self::default();
        terms.update(t, tissues)?;
        Ok(terms)
    }

    /// Recompute the terms for a new interval, reusing the allocation.
    ///
    /// `tissues` must already pass [`check_relaxation_times`]. Fails without
    /// touching the terms if `t` is negative or not finite.
    pub fn update(&mut self, t: f64, tissues: &[MaterialTuple]) -> Result<(), DomainError> {
        if !(t >= 0.0 && t.is_finite()) {
            return Err(DomainError::InvalidElapsedTime(t));
        }

        self.t = t;
        self.decay.clear();
        self.decay.extend(tissues.iter().map(|m| Decay {
            e2: (-t / m.t2).exp(),
            e1: (-t / m.t1).exp(),
        }));
        Ok(())
    }

    pub fn elapsed(&self) -> f64 {
        self.t
    }

    pub fn len(&self) -> usize {
        self.decay.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decay.is_empty()
    }

    /// Element-wise decay factors `D` of tuple `index`.
    pub fn decay(&self, index: usize) -> [f64; 3] {
        let d = self.decay[index];
        [d.e2, d.e2, d.e1]
    }

    /// Recovery offset `Dz` of tuple `index`.
    pub fn recovery(&self, index: usize) -> [f64; 3] {
        [0.0, 0.0, 1.0 - self.decay[index].e1]
    }

    pub fn apply(&self, state: &mut [Magnetization]) {
        for_each_column(state, &self.decay, |m, d| {
            m[0] *= d.e2;
            m[1] *= d.e2;
            m[2] = d.e1 * m[2] + (1.0 - d.e1);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn tissues() -> Vec<MaterialTuple> {
        vec![
            MaterialTuple::new(1000.0, 500.0, 0.0),
            MaterialTuple::new(250.0, 60.0, 0.0),
        ]
    }

    #[test]
    fn zero_interval_is_identity() {
        let terms = RelaxationTerms::compute(0.0, &tissues()).unwrap();
        for i in 0..2 {
            assert_eq!(terms.decay(i), [1.0, 1.0, 1.0]);
            assert_eq!(terms.recovery(i), [0.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn relaxes_towards_equilibrium() {
        let terms = RelaxationTerms::compute(100.0, &tissues()).unwrap();
        let mut state = vec![[1.0, -1.0, -1.0]; 2];
        terms.apply(&mut state);

        let e2 = (-100.0f64 / 500.0).exp();
        let e1 = (-100.0f64 / 1000.0).exp();
        assert_abs_diff_eq!(state[0][0], e2, epsilon = 1e-15);
        assert_abs_diff_eq!(state[0][1], -e2, epsilon = 1e-15);
        assert_abs_diff_eq!(state[0][2], 1.0 - 2.0 * e1, epsilon = 1e-15);
        // shorter T1 recovers faster
        assert!(state[1][2] > state[0][2]);
    }

    #[test]
    fn rejects_invalid_inputs() {
        let bad = vec![MaterialTuple::new(100.0, 0.0, 0.0)];
        assert_eq!(
            RelaxationTerms::compute(1.0, &bad).unwrap_err(),
            DomainError::InvalidT2 { index: 0, value: 0.0 }
        );
        assert!(matches!(
            RelaxationTerms::compute(-1.0, &tissues()),
            Err(DomainError::InvalidElapsedTime(_))
        ));
    }

    #[test]
    fn failed_update_keeps_previous_terms() {
        let mut terms = RelaxationTerms::compute(10.0, &tissues()).unwrap();
        let before = terms.clone();
        assert!(terms.update(f64::NAN, &tissues()).is_err());
        assert_eq!(terms, before);
    }

    #[test]
    fn relaxation_times_are_checked_once_up_front() {
        assert_eq!(check_relaxation_times(&tissues()), Ok(()));
        let bad = [tissues()[0], MaterialTuple::new(f64::INFINITY, 60.0, 0.0)];
        assert_eq!(
            check_relaxation_times(&bad),
            Err(DomainError::InvalidT1 { index: 1, value: f64::INFINITY })
        );
    }
}
