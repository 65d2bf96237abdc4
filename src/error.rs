use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AbortReason {
    #[error("requested by caller")]
    RequestedByCaller,
    #[error("message receiver disconnected")]
    ReceiverClosed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionError {
    pub from: &'static str,
    pub into: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LookupError {
    KeyError,
    ConversionError(ConversionError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("unknown {kind} category '{value}' (expected one of: {expected})")]
    UnknownCategory {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("config key '{key}' has the wrong type (found {found}, expected {expected})")]
    WrongType {
        key: &'static str,
        found: &'static str,
        expected: &'static str,
    },
    #[error("config key '{0}' is required")]
    MissingKey(&'static str),
    #[error("unknown config key '{0}'")]
    UnknownKey(String),
    #[error("seed must be non-negative, got {0}")]
    NegativeSeed(i64),
    #[error("propagation variant '{0}' is not implemented")]
    UnimplementedVariant(&'static str),
}

#[derive(Error, Debug)]
pub enum DataFormatError {
    #[error("failed to read table '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed table: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing column '{0}'")]
    MissingColumn(&'static str),
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),
    #[error("column '{column}', row {row}: cannot parse '{cell}' as a number")]
    NotANumber {
        column: &'static str,
        row: usize,
        cell: String,
    },
    #[error("column lengths differ ({0})")]
    LengthMismatch(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("tuple {index}: T1 must be positive and finite, got {value} ms")]
    InvalidT1 { index: usize, value: f64 },
    #[error("tuple {index}: T2 must be positive and finite, got {value} ms")]
    InvalidT2 { index: usize, value: f64 },
    #[error("tuple {index}: T2 ({t2} ms) exceeds T1 ({t1} ms)")]
    T2ExceedsT1 { index: usize, t1: f64, t2: f64 },
    #[error("tuple {index}: df must be finite, got {value} kHz")]
    InvalidOffResonance { index: usize, value: f64 },
    #[error("block {index}: TR must be positive and finite, got {value} ms")]
    InvalidRepetitionTime { index: usize, value: f64 },
    #[error("block {index}: TE must lie in [0, TR = {tr}] ms, got {te} ms")]
    InvalidEchoTime { index: usize, te: f64, tr: f64 },
    #[error("block {index}: flip and phase angles must be finite")]
    InvalidAngle { index: usize },
    #[error("elapsed time must be non-negative and finite, got {0} ms")]
    InvalidElapsedTime(f64),
}

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("serialization failed: {0}")]
    SerializationError(rmp_serde::encode::Error),
    #[error("deserialization failed: {0}")]
    DeserializationError(rmp_serde::decode::Error),
    #[error("decompression failed: {0}")]
    DecompressionError(std::io::Error),
    #[error("decoded dictionary is inconsistent: {0}")]
    Corrupt(String),
    #[error("file access failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("data format error: {0}")]
    DataFormat(#[from] DataFormatError),
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("aborted: {0}")]
    Aborted(#[from] AbortReason),
    #[error("persistence error: {0}")]
    Persist(#[from] PersistError),
    #[error("readout column {index} out of range for {count} blocks")]
    ColumnOutOfRange { index: usize, count: usize },
    #[error("readout has {found} tuples, dictionary expects {expected}")]
    ReadoutLength { found: usize, expected: usize },
    #[error("readout column {0} was already written")]
    ColumnRewritten(usize),
    #[error("dictionary incomplete: {written} of {count} readout columns written")]
    Incomplete { written: usize, count: usize },
}
