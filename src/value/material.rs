use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{table, utils};
use crate::error::{DataFormatError, DictionaryError, DomainError};

/// Tissue parameters of a single dictionary entry.
///
/// `t1` and `t2` are in ms, `df` (off-resonance) is in kHz so that `t * df`
/// is a number of cycles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialTuple {
    pub t1: f64,
    pub t2: f64,
    pub df: f64,
}

impl MaterialTuple {
    pub fn new(t1: f64, t2: f64, df: f64) -> Self {
        Self { t1, t2, df }
    }

    fn validate(&self, index: usize) -> Result<(), DomainError> {
        if !(self.t1 > 0.0 && self.t1.is_finite()) {
            return Err(DomainError::InvalidT1 { index, value: self.t1 });
        }
        if !(self.t2 > 0.0 && self.t2.is_finite()) {
            return Err(DomainError::InvalidT2 { index, value: self.t2 });
        }
        if self.t2 > self.t1 {
            return Err(DomainError::T2ExceedsT1 {
                index,
                t1: self.t1,
                t2: self.t2,
            });
        }
        if !self.df.is_finite() {
            return Err(DomainError::InvalidOffResonance { index, value: self.df });
        }
        Ok(())
    }
}

/// Ordered set of M material tuples, every one with `0 < t2 <= t1`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<MaterialTuple>")]
pub struct ParameterSpace(Vec<MaterialTuple>);

impl TryFrom<Vec<MaterialTuple>> for ParameterSpace {
    type Error = DomainError;

    fn try_from(tuples: Vec<MaterialTuple>) -> Result<Self, Self::Error> {
        Self::new(tuples)
    }
}

impl ParameterSpace {
    /// Takes the tuples as given, in order, after validating each of them.
    pub fn new(tuples: Vec<MaterialTuple>) -> Result<Self, DomainError> {
        for (index, tuple) in tuples.iter().enumerate() {
            tuple.validate(index)?;
        }
        Ok(Self(tuples))
    }

    /// Builds the space from three equal-length columns (one tuple per row).
    pub fn from_columns(t1: &[f64], t2: &[f64], df: &[f64]) -> Result<Self, DictionaryError> {
        if t1.len() != t2.len() || t1.len() != df.len() {
            return Err(DataFormatError::LengthMismatch(format!(
                "T1: {}, T2: {}, df: {}",
                t1.len(),
                t2.len(),
                df.len()
            ))
            .into());
        }
        let tuples = t1
            .iter()
            .zip(t2)
            .zip(df)
            .map(|((&t1, &t2), &df)| MaterialTuple { t1, t2, df })
            .collect();
        Ok(Self::new(tuples)?)
    }

    /// Enumerates every (T1, T2, df) combination of the axes with `T2 <= T1`.
    ///
    /// T1 varies slowest and df fastest.
    pub fn from_axes(t1: &[f64], t2: &[f64], df: &[f64]) -> Result<Self, DomainError> {
        let mut tuples = Vec::new();
        for &t1 in t1 {
            for &t2 in t2 {
                if t2 > t1 {
                    continue;
                }
                tuples.extend(df.iter().map(|&df| MaterialTuple { t1, t2, df }));
            }
        }
        Self::new(tuples)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tuples(&self) -> &[MaterialTuple] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &MaterialTuple> {
        self.0.iter()
    }
}

impl From<ParameterSpace> for Vec<MaterialTuple> {
    fn from(value: ParameterSpace) -> Self {
        value.0
    }
}

/// Produces the parameter space of a dictionary.
pub trait MaterialSource {
    fn parameter_space(&self) -> Result<ParameterSpace, DictionaryError>;
}

/// Built-in parameter grids plus CSV loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MaterialKind {
    /// Grey matter, white matter, CSF and fat at 1.5 T, on resonance
    Default,
    /// Wide T1 / T2 grid with a symmetric +-390 Hz off-resonance spectrum
    Bssfp,
    /// Fine T1 / T2 grid, on resonance
    Fisp,
    /// CSV file with `T1,T2,df` columns
    Custom(PathBuf),
}

impl MaterialKind {
    pub const NAMES: &'static str = "default, bssfp, fisp, custom";
}

impl MaterialSource for MaterialKind {
    fn parameter_space(&self) -> Result<ParameterSpace, DictionaryError> {
        let (t1, t2, df) = match self {
            MaterialKind::Default => default_axes(),
            MaterialKind::Bssfp => bssfp_axes(),
            MaterialKind::Fisp => fisp_axes(),
            MaterialKind::Custom(path) => {
                let [t1, t2, df] = table::read_columns(path, ["T1", "T2", "df"])?;
                (
                    utils::unique_sorted(t1),
                    utils::unique_sorted(t2),
                    utils::unique_sorted(df),
                )
            }
        };
        tracing::debug!(
            kind = ?self,
            t1 = t1.len(),
            t2 = t2.len(),
            df = df.len(),
            "enumerating material axes"
        );
        Ok(ParameterSpace::from_axes(&t1, &t2, &df)?)
    }
}

type Axes = (Vec<f64>, Vec<f64>, Vec<f64>);

fn default_axes() -> Axes {
    (
        vec![950.0, 600.0, 4500.0, 250.0],
        vec![100.0, 80.0, 2200.0, 60.0],
        vec![0.0],
    )
}

fn bssfp_axes() -> Axes {
    let t1 = utils::segments(&[(100.0, 2020.0, 20.0), (2300.0, 5300.0, 300.0)]);
    let t2 = utils::segments(&[
        (20.0, 105.0, 5.0),
        (110.0, 210.0, 10.0),
        (400.0, 3200.0, 200.0),
    ]);
    let positive_hz = utils::segments(&[
        (0.0, 41.0, 1.0),
        (42.0, 82.0, 2.0),
        (90.0, 260.0, 10.0),
        (270.0, 400.0, 20.0),
    ]);
    // mirror every nonzero bin (-1 Hz included) around a single 0 Hz, then Hz -> kHz
    let df = positive_hz
        .iter()
        .rev()
        .filter(|&&hz| hz > 0.0)
        .map(|&hz| -hz)
        .chain(positive_hz.iter().copied())
        .map(|hz| hz * 1e-3)
        .collect();
    (t1, t2, df)
}

fn fisp_axes() -> Axes {
    let t1 = utils::segments(&[(20.0, 3010.0, 10.0), (3200.0, 5200.0, 200.0)]);
    let t2 = utils::segments(&[(10.0, 305.0, 5.0), (350.0, 550.0, 50.0)]);
    (t1, t2, vec![0.0])
}
