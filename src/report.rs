//! Plain-text summaries of the inputs and outputs of a dictionary run.
//!
//! Nothing here is invoked implicitly; callers print or log the reports they
//! are interested in.

use std::fmt;

use crate::engine::Dictionary;
use crate::value::sequence::Duration;
use crate::value::{MaterialTuple, ParameterSpace, SequenceSchedule};

/// Closed value range, `None` for empty inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |range, v| {
            Some(match range {
                None => Range { min: v, max: v },
                Some(Range { min, max }) => Range {
                    min: min.min(v),
                    max: max.max(v),
                },
            })
        })
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

struct OptRange(Option<Range>);

impl fmt::Display for OptRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(range) => fmt::Display::fmt(range, f),
            None => f.write_str("-"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialReport {
    pub count: usize,
    pub t1: Option<Range>,
    pub t2: Option<Range>,
    pub df: Option<Range>,
}

impl MaterialReport {
    pub fn new(materials: &[MaterialTuple]) -> Self {
        Self {
            count: materials.len(),
            t1: Range::of(materials.iter().map(|m| m.t1)),
            t2: Range::of(materials.iter().map(|m| m.t2)),
            df: Range::of(materials.iter().map(|m| m.df)),
        }
    }
}

impl From<&ParameterSpace> for MaterialReport {
    fn from(space: &ParameterSpace) -> Self {
        Self::new(space.tuples())
    }
}

impl fmt::Display for MaterialReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "materials: {} tuples", self.count)?;
        writeln!(f, "  T1 (ms):  {}", OptRange(self.t1))?;
        writeln!(f, "  T2 (ms):  {}", OptRange(self.t2))?;
        write!(f, "  df (kHz): {}", OptRange(self.df))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleReport {
    pub blocks: usize,
    /// Total duration in ms
    pub duration: f64,
    pub fa: Option<Range>,
    pub pa: Option<Range>,
    pub tr: Option<Range>,
    pub te: Option<Range>,
}

impl From<&SequenceSchedule> for ScheduleReport {
    fn from(schedule: &SequenceSchedule) -> Self {
        Self {
            blocks: schedule.len(),
            duration: schedule.calc_duration(),
            fa: Range::of(schedule.iter().map(|b| b.fa)),
            pa: Range::of(schedule.iter().map(|b| b.pa)),
            tr: Range::of(schedule.iter().map(|b| b.tr)),
            te: Range::of(schedule.iter().map(|b| b.te)),
        }
    }
}

impl fmt::Display for ScheduleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "sequence: {} blocks, {:.1} ms", self.blocks, self.duration)?;
        writeln!(f, "  FA (deg): {}", OptRange(self.fa))?;
        writeln!(f, "  PA (deg): {}", OptRange(self.pa))?;
        writeln!(f, "  TR (ms):  {}", OptRange(self.tr))?;
        write!(f, "  TE (ms):  {}", OptRange(self.te))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryReport {
    pub materials: MaterialReport,
    pub readouts: usize,
    /// Mean |Mxy| over all tuples at the first and last readout
    pub first_transverse: Option<f64>,
    pub last_transverse: Option<f64>,
}

impl From<&Dictionary> for DictionaryReport {
    fn from(dictionary: &Dictionary) -> Self {
        let mean_transverse = |k: usize| {
            let count = dictionary.material_count();
            (count > 0).then(|| {
                dictionary
                    .fingerprints()
                    .map(|(_, fp)| fp[k][0].hypot(fp[k][1]))
                    .sum::<f64>()
                    / count as f64
            })
        };
        let n = dictionary.readout_count();
        Self {
            materials: MaterialReport::new(dictionary.materials()),
            readouts: n,
            first_transverse: (n > 0).then(|| mean_transverse(0)).flatten(),
            last_transverse: (n > 0).then(|| mean_transverse(n - 1)).flatten(),
        }
    }
}

impl fmt::Display for DictionaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (m, n) = (self.materials.count, self.readouts);
        writeln!(f, "dictionary: {m} x {n} x 3")?;
        writeln!(f, "{}", self.materials)?;
        match (self.first_transverse, self.last_transverse) {
            (Some(first), Some(last)) => {
                write!(f, "  mean |Mxy|: {first:.4} (first readout), {last:.4} (last readout)")
            }
            _ => write!(f, "  mean |Mxy|: -"),
        }
    }
}
