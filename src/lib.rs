mod config;
mod error;
mod persist;

// =====================================
// Public API of mrfdict
// =====================================

pub mod engine;
pub mod report;
pub mod value;

pub use config::DictionaryConfig;
pub use engine::{BlochPropagator, BlockProgress, Dictionary, Variant};
pub use error::*;
pub use value::{
    MaterialKind, MaterialSource, MaterialTuple, ParameterSpace, SequenceBlock, SequenceKind,
    SequenceSchedule, SequenceSource, Value, ValueDict,
};

use report::{DictionaryReport, MaterialReport, ScheduleReport};

/// Function which receives progress messages of a dictionary run and returns
/// whether the caller requested to abort.
///
/// Use it as a logging function: every `Err` it returns stops the run at the
/// next block and is propagated as [`DictionaryError::Aborted`].
pub type MessageFn<'a> = dyn FnMut(String) -> Result<(), AbortReason> + 'a;

/// Number of progress messages sent while propagating.
const PROGRESS_STEPS: usize = 10;

/// Simulates the fingerprint of every tuple in `space` for `schedule`.
///
/// This is the pure core: no messages, no abort and the default
/// [`Variant::Bssfp`] transition. Returns an M x N x 3 [`Dictionary`].
///
/// # Examples
/// ```
/// use mrfdict::{MaterialTuple, ParameterSpace, SequenceBlock, SequenceSchedule};
///
/// let space = ParameterSpace::new(vec![MaterialTuple::new(1000.0, 500.0, 0.0)]).unwrap();
/// let schedule = SequenceSchedule::new(vec![SequenceBlock::new(90.0, 0.0, 10.0, 5.0)]).unwrap();
///
/// let dictionary = mrfdict::build_dictionary(&space, &schedule).unwrap();
/// assert_eq!(dictionary.shape(), (1, 1, 3));
/// ```
pub fn build_dictionary(
    space: &ParameterSpace,
    schedule: &SequenceSchedule,
) -> Result<Dictionary, DictionaryError> {
    BlochPropagator::default().run(space, schedule, &mut |_| Ok(()))
}

/// Generates the inputs described by `config` and simulates the dictionary.
///
/// Summaries of the inputs and periodic block progress are passed to
/// `send_msg`, which can abort the run by returning an error.
///
/// # Examples
/// ```
/// use mrfdict::{DictionaryConfig, MaterialKind, SequenceKind};
///
/// let config = DictionaryConfig {
///     materials: MaterialKind::Default,
///     sequence: SequenceKind::Default,
///     ..Default::default()
/// };
/// let dictionary = mrfdict::run(&config, &mut |msg| {
///     println!("[MRF] {msg}");
///     Ok(())
/// })
/// .unwrap();
/// assert_eq!(dictionary.shape(), (13, 500, 3));
/// ```
pub fn run(config: &DictionaryConfig, send_msg: &mut MessageFn) -> Result<Dictionary, DictionaryError> {
    // Reject unimplemented variants before generating (possibly large) inputs
    config.variant.transition()?;

    let space = config.materials.parameter_space()?;
    send_msg(MaterialReport::from(&space).to_string())?;
    let schedule = config.sequence.schedule(config.seed)?;
    send_msg(ScheduleReport::from(&schedule).to_string())?;

    tracing::info!(
        materials = space.len(),
        blocks = schedule.len(),
        variant = config.variant.name(),
        "building dictionary"
    );
    if space.is_empty() {
        tracing::warn!("parameter space is empty, dictionary will have no entries");
    }

    let step = (schedule.len() / PROGRESS_STEPS).max(1);
    let mut checkpoint = |progress: BlockProgress| {
        if progress.completed % step == 0 || progress.completed == progress.total {
            send_msg(format!("block {}/{}", progress.completed, progress.total))
        } else {
            Ok(())
        }
    };
    let dictionary = BlochPropagator::new(config.variant).run(&space, &schedule, &mut checkpoint)?;

    send_msg(DictionaryReport::from(&dictionary).to_string())?;
    Ok(dictionary)
}

/// Same as [`run`], with the configuration given as loosely typed values.
/// See [`DictionaryConfig`] for the recognized keys.
pub fn run_values(input: ValueDict, send_msg: &mut MessageFn) -> Result<Dictionary, DictionaryError> {
    let config = DictionaryConfig::try_from(input)?;
    run(&config, send_msg)
}
