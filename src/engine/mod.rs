//! Magnetization propagation: RF rotations, off-resonance precession and
//! relaxation applied to all tuples of a parameter space, block by block.
//!
//! Magnetization is stored as one `[x, y, z]` column per material tuple. All
//! per-tuple operations go through [`for_each_column`], which runs on rayon
//! when the `parallel` feature is enabled. Tuples never interact, so both
//! paths produce identical results.

mod dictionary;
mod off_resonance;
mod propagator;
mod relaxation;
mod rf;

pub use dictionary::{Dictionary, DictionaryAssembler};
pub use off_resonance::OffResonanceTerms;
pub use propagator::{
    BlochPropagator, BlockProgress, BlockTransition, BssfpTransition, CheckpointFn,
    MagnetizationState, PreparedBlock, Variant,
};
pub use relaxation::{RelaxationTerms, check_relaxation_times};
pub use rf::{RfPulseMatrix, rf_pulse_matrices};

/// Magnetization vector `[x, y, z]` of a single tuple, relative to M0.
pub type Magnetization = [f64; 3];

/// Fully relaxed magnetization along the main field.
pub const EQUILIBRIUM: Magnetization = [0.0, 0.0, 1.0];

/// Apply `f` to every state column together with its per-tuple term.
#[cfg(not(feature = "parallel"))]
pub(crate) fn for_each_column<T, F>(state: &mut [Magnetization], terms: &[T], f: F)
where
    T: Sync,
    F: Fn(&mut Magnetization, &T) + Sync + Send,
{
    debug_assert_eq!(state.len(), terms.len());
    state.iter_mut().zip(terms).for_each(|(m, t)| f(m, t));
}

#[cfg(feature = "parallel")]
pub(crate) fn for_each_column<T, F>(state: &mut [Magnetization], terms: &[T], f: F)
where
    T: Sync,
    F: Fn(&mut Magnetization, &T) + Sync + Send,
{
    use rayon::prelude::*;

    debug_assert_eq!(state.len(), terms.len());
    state
        .par_iter_mut()
        .zip(terms.par_iter())
        .for_each(|(m, t)| f(m, t));
}
