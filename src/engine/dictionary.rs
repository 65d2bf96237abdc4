use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::Magnetization;
use crate::error::{DictionaryError, PersistError};
use crate::value::{MaterialTuple, ParameterSpace};

/// Simulated fingerprints: an M x N x 3 array of magnetization components.
///
/// Entry `(m, k, c)` is component `c` (x, y, z) of tuple `m` at the echo time
/// of block `k`. Storage is tuple-major, so the fingerprint of a tuple is one
/// contiguous slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDictionary")]
pub struct Dictionary {
    pub(crate) materials: Vec<MaterialTuple>,
    pub(crate) readouts: usize,
    pub(crate) data: Vec<Magnetization>,
}

/// Deserialized form of a [`Dictionary`] before its shape is checked.
#[derive(Deserialize)]
struct RawDictionary {
    materials: Vec<MaterialTuple>,
    readouts: usize,
    data: Vec<Magnetization>,
}

impl TryFrom<RawDictionary> for Dictionary {
    type Error = PersistError;

    fn try_from(raw: RawDictionary) -> Result<Self, Self::Error> {
        let expected = raw.materials.len().checked_mul(raw.readouts);
        if expected != Some(raw.data.len()) {
            return Err(PersistError::Corrupt(format!(
                "{} values for {} materials x {} readouts",
                raw.data.len(),
                raw.materials.len(),
                raw.readouts
            )));
        }
        let materials = ParameterSpace::new(raw.materials)
            .map_err(|err| PersistError::Corrupt(err.to_string()))?;
        Ok(Self {
            materials: materials.into(),
            readouts: raw.readouts,
            data: raw.data,
        })
    }
}

impl Dictionary {
    /// Number of material tuples (M).
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Number of readouts per fingerprint (N).
    pub fn readout_count(&self) -> usize {
        self.readouts
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        (self.materials.len(), self.readouts, 3)
    }

    /// The material tuple of every dictionary row, in row order.
    pub fn materials(&self) -> &[MaterialTuple] {
        &self.materials
    }

    pub fn get(&self, material: usize, readout: usize, component: usize) -> Option<f64> {
        if material >= self.materials.len() || readout >= self.readouts {
            return None;
        }
        self.data[material * self.readouts + readout]
            .get(component)
            .copied()
    }

    /// All N readouts of tuple `material`.
    pub fn fingerprint(&self, material: usize) -> Option<&[Magnetization]> {
        let start = material.checked_mul(self.readouts)?;
        (material < self.materials.len()).then(|| &self.data[start..start + self.readouts])
    }

    /// Complex transverse signal `Mx + i My` of tuple `material`.
    pub fn signal(&self, material: usize) -> Option<Vec<Complex64>> {
        self.fingerprint(material)
            .map(|fp| fp.iter().map(|m| Complex64::new(m[0], m[1])).collect())
    }

    pub fn fingerprints(&self) -> impl Iterator<Item = (&MaterialTuple, &[Magnetization])> {
        let n = self.readouts;
        self.materials
            .iter()
            .enumerate()
            .map(move |(i, material)| (material, &self.data[i * n..(i + 1) * n]))
    }

    /// The flat `[m][k][c]` array, e.g.: for handing to numeric libraries.
    pub fn to_flat(&self) -> Vec<f64> {
        self.data.iter().flatten().copied().collect()
    }

}

/// Collects the readout columns of a propagation run into a [`Dictionary`].
///
/// Every column must be written exactly once before [`finish`] succeeds.
///
/// [`finish`]: DictionaryAssembler::finish
#[derive(Debug)]
pub struct DictionaryAssembler {
    dictionary: Dictionary,
    written: Vec<bool>,
    written_count: usize,
}

impl DictionaryAssembler {
    pub fn new(materials: Vec<MaterialTuple>, readouts: usize) -> Self {
        let data = vec![[0.0; 3]; materials.len() * readouts];
        Self {
            dictionary: Dictionary {
                materials,
                readouts,
                data,
            },
            written: vec![false; readouts],
            written_count: 0,
        }
    }

    /// Store the echo-time magnetization of block `index` for every tuple.
    pub fn write_column(
        &mut self,
        index: usize,
        readout: &[Magnetization],
    ) -> Result<(), DictionaryError> {
        let n = self.dictionary.readouts;
        let m = self.dictionary.materials.len();
        if index >= n {
            return Err(DictionaryError::ColumnOutOfRange { index, count: n });
        }
        if readout.len() != m {
            return Err(DictionaryError::ReadoutLength {
                found: readout.len(),
                expected: m,
            });
        }
        if self.written[index] {
            return Err(DictionaryError::ColumnRewritten(index));
        }

        for (material, value) in readout.iter().enumerate() {
            self.dictionary.data[material * n + index] = *value;
        }
        self.written[index] = true;
        self.written_count += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written_count
    }

    pub fn finish(self) -> Result<Dictionary, DictionaryError> {
        if self.written_count != self.dictionary.readouts {
            return Err(DictionaryError::Incomplete {
                written: self.written_count,
                count: self.dictionary.readouts,
            });
        }
        Ok(self.dictionary)
    }
}
