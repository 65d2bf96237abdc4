//! Typed configuration of a dictionary run, parsed from a [`ValueDict`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::engine::Variant;
use crate::error::{ConfigurationError, ConversionError};
use crate::value::{MaterialKind, SequenceKind, ValueDict};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryConfig {
    pub materials: MaterialKind,
    pub sequence: SequenceKind,
    pub variant: Variant,
    /// Seed for randomized schedules
    pub seed: u64,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            materials: MaterialKind::Fisp,
            sequence: SequenceKind::Bssfp,
            variant: Variant::Bssfp,
            seed: 0,
        }
    }
}

impl TryFrom<ValueDict> for DictionaryConfig {
    type Error = ConfigurationError;

    /// Recognized keys: `materials`, `materials_file`, `sequence`,
    /// `sequence_file`, `variant` (strings) and `seed` (int). Missing keys
    /// fall back to [`DictionaryConfig::default`], unknown keys are rejected.
    fn try_from(mut values: ValueDict) -> Result<Self, Self::Error> {
        let defaults = Self::default();

        let materials = match pop_string(&mut values, "materials")? {
            None => defaults.materials,
            Some(name) => match name.to_lowercase().as_str() {
                "default" => MaterialKind::Default,
                "bssfp" => MaterialKind::Bssfp,
                "fisp" => MaterialKind::Fisp,
                "custom" => MaterialKind::Custom(require_path(&mut values, "materials_file")?),
                _ => return Err(unknown("material", name, MaterialKind::NAMES)),
            },
        };

        let sequence = match pop_string(&mut values, "sequence")? {
            None => defaults.sequence,
            Some(name) => match name.to_lowercase().as_str() {
                "default" => SequenceKind::Default,
                "bssfp" => SequenceKind::Bssfp,
                "fisp" => SequenceKind::Fisp,
                "custom" => SequenceKind::Custom(require_path(&mut values, "sequence_file")?),
                _ => return Err(unknown("sequence", name, SequenceKind::NAMES)),
            },
        };

        let variant = match pop_string(&mut values, "variant")? {
            None => defaults.variant,
            Some(name) => match name.to_lowercase().as_str() {
                "bssfp" => Variant::Bssfp,
                "fisp" => Variant::Fisp,
                _ => return Err(unknown("variant", name, Variant::NAMES)),
            },
        };

        let seed = match values
            .pop_opt::<i64>("seed")
            .map_err(|err| wrong_type("seed", err))?
        {
            None => defaults.seed,
            Some(seed) => u64::try_from(seed).map_err(|_| ConfigurationError::NegativeSeed(seed))?,
        };

        if let Some(key) = values.keys().first() {
            return Err(ConfigurationError::UnknownKey(key.to_string()));
        }

        Ok(Self {
            materials,
            sequence,
            variant,
            seed,
        })
    }
}

fn pop_string(values: &mut ValueDict, key: &'static str) -> Result<Option<String>, ConfigurationError> {
    values.pop_opt::<String>(key).map_err(|err| wrong_type(key, err))
}

fn require_path(values: &mut ValueDict, key: &'static str) -> Result<PathBuf, ConfigurationError> {
    pop_string(values, key)?
        .map(PathBuf::from)
        .ok_or(ConfigurationError::MissingKey(key))
}

fn wrong_type(key: &'static str, err: ConversionError) -> ConfigurationError {
    ConfigurationError::WrongType {
        key,
        found: err.from,
        expected: err.into,
    }
}

fn unknown(kind: &'static str, value: String, expected: &'static str) -> ConfigurationError {
    ConfigurationError::UnknownCategory {
        kind,
        value,
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_dict_gives_defaults() {
        let config = DictionaryConfig::try_from(ValueDict::new()).unwrap();
        assert_eq!(config, DictionaryConfig::default());
    }

    #[test]
    fn parses_all_keys() {
        let mut values = ValueDict::new();
        values
            .insert("materials", "Custom")
            .insert("materials_file", "tissues.csv")
            .insert("sequence", "FISP")
            .insert("variant", "bssfp")
            .insert("seed", 9i64);
        let config = DictionaryConfig::try_from(values).unwrap();

        assert_eq!(config.materials, MaterialKind::Custom("tissues.csv".into()));
        assert_eq!(config.sequence, SequenceKind::Fisp);
        assert_eq!(config.variant, Variant::Bssfp);
        assert_eq!(config.seed, 9);
    }

    #[test]
    fn rejects_unknown_category() {
        let mut values = ValueDict::new();
        values.insert("sequence", "spiral");
        let err = DictionaryConfig::try_from(values).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::UnknownCategory { kind: "sequence", ref value, .. } if value == "spiral"
        ));
    }

    #[test]
    fn custom_requires_a_file() {
        let mut values = ValueDict::new();
        values.insert("materials", "custom");
        assert_eq!(
            DictionaryConfig::try_from(values).unwrap_err(),
            ConfigurationError::MissingKey("materials_file")
        );
    }

    #[test]
    fn rejects_bad_types_and_stray_keys() {
        let mut values = ValueDict::new();
        values.insert("seed", "seven");
        assert!(matches!(
            DictionaryConfig::try_from(values).unwrap_err(),
            ConfigurationError::WrongType { key: "seed", .. }
        ));

        let mut values = ValueDict::new();
        values.insert("seed", -1i64);
        assert_eq!(
            DictionaryConfig::try_from(values).unwrap_err(),
            ConfigurationError::NegativeSeed(-1)
        );

        let mut values = ValueDict::new();
        values.insert("materails", "fisp");
        assert_eq!(
            DictionaryConfig::try_from(values).unwrap_err(),
            ConfigurationError::UnknownKey("materails".into())
        );
    }
}
