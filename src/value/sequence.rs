use std::f64::consts::PI;
use std::path::PathBuf;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::table;
use crate::error::{DataFormatError, DictionaryError, DomainError};

/// One readout block of a fingerprinting sequence.
///
/// An instantaneous pulse with flip angle `fa` and phase `pa` (both in degrees)
/// at the start of the block, a readout at `te` and the next block at `tr`
/// (both in ms).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SequenceBlock {
    pub fa: f64,
    pub pa: f64,
    pub tr: f64,
    pub te: f64,
}

impl SequenceBlock {
    pub fn new(fa: f64, pa: f64, tr: f64, te: f64) -> Self {
        Self { fa, pa, tr, te }
    }

    fn validate(&self, index: usize) -> Result<(), DomainError> {
        if !(self.fa.is_finite() && self.pa.is_finite()) {
            return Err(DomainError::InvalidAngle { index });
        }
        if !(self.tr > 0.0 && self.tr.is_finite()) {
            return Err(DomainError::InvalidRepetitionTime { index, value: self.tr });
        }
        if !(self.te >= 0.0 && self.te <= self.tr) {
            return Err(DomainError::InvalidEchoTime {
                index,
                te: self.te,
                tr: self.tr,
            });
        }
        Ok(())
    }
}

/// Temporally ordered list of N blocks with `tr > 0` and `0 <= te <= tr`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SequenceBlock>")]
pub struct SequenceSchedule(Vec<SequenceBlock>);

impl TryFrom<Vec<SequenceBlock>> for SequenceSchedule {
    type Error = DomainError;

    fn try_from(blocks: Vec<SequenceBlock>) -> Result<Self, Self::Error> {
        Self::new(blocks)
    }
}

impl SequenceSchedule {
    pub fn new(blocks: Vec<SequenceBlock>) -> Result<Self, DomainError> {
        for (index, block) in blocks.iter().enumerate() {
            block.validate(index)?;
        }
        Ok(Self(blocks))
    }

    /// Builds the schedule from four equal-length columns (one block per row).
    pub fn from_columns(
        fa: &[f64],
        pa: &[f64],
        tr: &[f64],
        te: &[f64],
    ) -> Result<Self, DictionaryError> {
        let n = fa.len();
        if pa.len() != n || tr.len() != n || te.len() != n {
            return Err(DataFormatError::LengthMismatch(format!(
                "FA: {n}, PA: {}, TR: {}, TE: {}",
                pa.len(),
                tr.len(),
                te.len()
            ))
            .into());
        }
        let blocks = (0..n)
            .map(|i| SequenceBlock::new(fa[i], pa[i], tr[i], te[i]))
            .collect();
        Ok(Self::new(blocks)?)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn blocks(&self) -> &[SequenceBlock] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &SequenceBlock> {
        self.0.iter()
    }
}

// ================
// Useful functions
// ================

pub trait Duration {
    fn calc_duration(&self) -> f64;
}

impl Duration for SequenceBlock {
    fn calc_duration(&self) -> f64 {
        self.tr
    }
}

impl Duration for SequenceSchedule {
    fn calc_duration(&self) -> f64 {
        self.0.iter().map(Duration::calc_duration).sum()
    }
}

// =================
// Schedule builders
// =================

/// Produces the schedule of a dictionary. Random draws are seeded by `seed`.
pub trait SequenceSource {
    fn schedule(&self, seed: u64) -> Result<SequenceSchedule, DictionaryError>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SequenceKind {
    /// Constant 60 degree excitation, TR 12 ms, TE 6 ms
    Default,
    /// Sinusoidal flip angles, alternating phase, random TR with TE = TR / 2
    Bssfp,
    /// Four sinusoidal flip angle lobes, zero phase, random TR, short TE
    Fisp,
    /// CSV file with `FA,PA,TR,TE` columns, one block per row
    Custom(PathBuf),
}

impl SequenceKind {
    pub const NAMES: &'static str = "default, bssfp, fisp, custom";
}

impl SequenceSource for SequenceKind {
    fn schedule(&self, seed: u64) -> Result<SequenceSchedule, DictionaryError> {
        let blocks = match self {
            SequenceKind::Default => default_blocks(),
            SequenceKind::Bssfp => bssfp_blocks(&mut StdRng::seed_from_u64(seed)),
            SequenceKind::Fisp => fisp_blocks(&mut StdRng::seed_from_u64(seed)),
            SequenceKind::Custom(path) => {
                let [fa, pa, tr, te] = table::read_columns(path, ["FA", "PA", "TR", "TE"])?;
                return SequenceSchedule::from_columns(&fa, &pa, &tr, &te);
            }
        };
        tracing::debug!(kind = ?self, seed, blocks = blocks.len(), "generated schedule");
        Ok(SequenceSchedule::new(blocks)?)
    }
}

const DEFAULT_BLOCKS: usize = 500;
const SINUSOIDAL_BLOCKS: usize = 1000;
const LOBE_LENGTH: usize = 250;
const FISP_LOBE_PEAKS: [f64; 4] = [60.0, 40.0, 70.0, 30.0];
const FISP_TE: f64 = 2.0;

fn default_blocks() -> Vec<SequenceBlock> {
    vec![SequenceBlock::new(60.0, 0.0, 12.0, 6.0); DEFAULT_BLOCKS]
}

fn bssfp_blocks(rng: &mut StdRng) -> Vec<SequenceBlock> {
    (0..SINUSOIDAL_BLOCKS)
        .map(|k| {
            let fa = 10.0 + 50.0 * (PI * k as f64 / LOBE_LENGTH as f64).sin().abs();
            let pa = if k % 2 == 0 { 0.0 } else { 180.0 };
            let tr = rng.gen_range(10.5..14.0);
            SequenceBlock::new(fa, pa, tr, tr / 2.0)
        })
        .collect()
}

fn fisp_blocks(rng: &mut StdRng) -> Vec<SequenceBlock> {
    (0..SINUSOIDAL_BLOCKS)
        .map(|k| {
            let peak = FISP_LOBE_PEAKS[(k / LOBE_LENGTH) % FISP_LOBE_PEAKS.len()];
            let j = (k % LOBE_LENGTH) as f64;
            let fa = 5.0 + peak * (PI * j / LOBE_LENGTH as f64).sin();
            let tr = rng.gen_range(11.5..14.5);
            SequenceBlock::new(fa, 0.0, tr, FISP_TE)
        })
        .collect()
}
