use serde::{Deserialize, Serialize};

use super::{
    Dictionary, DictionaryAssembler, EQUILIBRIUM, Magnetization, OffResonanceTerms,
    RelaxationTerms, RfPulseMatrix, check_relaxation_times, rf_pulse_matrices,
};
use crate::error::{AbortReason, ConfigurationError, DictionaryError, DomainError};
use crate::value::{MaterialTuple, ParameterSpace, SequenceSchedule};

/// The only state carried from one block to the next.
///
/// `next` is the magnetization entering a block, `readout` the magnetization
/// at the echo time of the block that produced this state.
#[derive(Debug, Clone, PartialEq)]
pub struct MagnetizationState {
    pub next: Vec<Magnetization>,
    pub readout: Vec<Magnetization>,
}

impl MagnetizationState {
    /// Every tuple fully relaxed along z.
    pub fn equilibrium(count: usize) -> Self {
        Self {
            next: vec![EQUILIBRIUM; count],
            readout: vec![[0.0; 3]; count],
        }
    }

    pub fn len(&self) -> usize {
        self.next.len()
    }

    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }
}

/// The tissue independent part of one block, computed before propagation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreparedBlock {
    pub rf: RfPulseMatrix,
    pub tr: f64,
    pub te: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockProgress {
    pub completed: usize,
    pub total: usize,
}

/// Called after every block. Returning an error stops the run.
pub type CheckpointFn<'a> = dyn FnMut(BlockProgress) -> Result<(), AbortReason> + 'a;

/// Advances the magnetization of all tuples by one block.
///
/// `tissues` must pass [`check_relaxation_times`], which
/// [`BlochPropagator::run`] does once before the first block.
pub trait BlockTransition {
    fn step(
        &mut self,
        state: MagnetizationState,
        block: &PreparedBlock,
        tissues: &[MaterialTuple],
    ) -> Result<MagnetizationState, DomainError>;
}

/// Excite, precess and relax to the echo, read out, then precess and relax
/// for the rest of the repetition. Transverse magnetization is kept (no
/// spoiling) so the steady state builds up over blocks.
#[derive(Debug, Default)]
pub struct BssfpTransition {
    off_resonance: OffResonanceTerms,
    relaxation: RelaxationTerms,
}

impl BssfpTransition {
    fn free_precession(
        &mut self,
        t: f64,
        state: &mut [Magnetization],
        tissues: &[MaterialTuple],
    ) -> Result<(), DomainError> {
        self.off_resonance.update(t, tissues);
        self.relaxation.update(t, tissues)?;
        self.off_resonance.apply(state);
        self.relaxation.apply(state);
        Ok(())
    }
}

impl BlockTransition for BssfpTransition {
    fn step(
        &mut self,
        state: MagnetizationState,
        block: &PreparedBlock,
        tissues: &[MaterialTuple],
    ) -> Result<MagnetizationState, DomainError> {
        let MagnetizationState {
            next: mut readout,
            readout: mut next,
        } = state;

        block.rf.rotate(&mut readout);
        self.free_precession(block.te, &mut readout, tissues)?;

        next.copy_from_slice(&readout);
        self.free_precession(block.tr - block.te, &mut next, tissues)?;

        Ok(MagnetizationState { next, readout })
    }
}

/// Selects the per-block transition of a propagation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    /// Balanced steady state: transverse magnetization carried over blocks
    #[default]
    Bssfp,
    /// Reserved for a FISP transition with its own readout ordering. Not
    /// implemented: running it fails with a configuration error.
    Fisp,
}

impl Variant {
    pub const NAMES: &'static str = "bssfp, fisp";

    pub fn name(&self) -> &'static str {
        match self {
            Variant::Bssfp => "bssfp",
            Variant::Fisp => "fisp",
        }
    }

    pub fn transition(&self) -> Result<Box<dyn BlockTransition>, ConfigurationError> {
        match self {
            Variant::Bssfp => Ok(Box::new(BssfpTransition::default())),
            Variant::Fisp => Err(ConfigurationError::UnimplementedVariant(self.name())),
        }
    }
}

/// Simulates the fingerprint of every tuple of a parameter space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlochPropagator {
    variant: Variant,
}

impl BlochPropagator {
    pub fn new(variant: Variant) -> Self {
        Self { variant }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Run all blocks of `schedule` in order and collect the readouts.
    ///
    /// `checkpoint` is called after every block; if it returns an error the
    /// run stops and no dictionary is produced.
    pub fn run(
        &self,
        space: &ParameterSpace,
        schedule: &SequenceSchedule,
        checkpoint: &mut CheckpointFn,
    ) -> Result<Dictionary, DictionaryError> {
        let mut transition = self.variant.transition()?;
        let tissues = space.tuples();
        check_relaxation_times(tissues)?;
        let total = schedule.len();
        tracing::debug!(
            variant = self.variant.name(),
            materials = tissues.len(),
            blocks = total,
            "starting propagation"
        );

        let pulses = rf_pulse_matrices(schedule.iter());
        let mut assembler = DictionaryAssembler::new(tissues.to_vec(), total);
        let mut state = MagnetizationState::equilibrium(tissues.len());

        for (index, (block, rf)) in schedule.iter().zip(pulses).enumerate() {
            let prepared = PreparedBlock {
                rf,
                tr: block.tr,
                te: block.te,
            };
            state = transition.step(state, &prepared, tissues)?;
            assembler.write_column(index, &state.readout)?;
            checkpoint(BlockProgress {
                completed: index + 1,
                total,
            })?;
        }

        tracing::debug!(blocks = total, "propagation finished");
        assembler.finish()
    }
}
