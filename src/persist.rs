//! Binary storage of dictionaries: MessagePack, compressed with zstd.

use std::path::Path;

use crate::engine::Dictionary;
use crate::error::PersistError;

fn decompress(raw: &[u8]) -> Result<Vec<u8>, PersistError> {
    use ruzstd::io::Read;
    let mut decoder = ruzstd::decoding::StreamingDecoder::new(raw)
        .map_err(|e| PersistError::DecompressionError(std::io::Error::other(e)))?;
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(PersistError::DecompressionError)?;
    Ok(decompressed)
}

fn compress(raw: &[u8]) -> Vec<u8> {
    ruzstd::encoding::compress_to_vec(raw, ruzstd::encoding::CompressionLevel::Fastest)
}

impl Dictionary {
    pub fn to_bytes(&self) -> Result<Vec<u8>, PersistError> {
        let raw = rmp_serde::to_vec(self).map_err(PersistError::SerializationError)?;
        Ok(compress(&raw))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PersistError> {
        let raw = decompress(bytes)?;
        rmp_serde::from_slice(&raw).map_err(PersistError::DeserializationError)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), bytes)?;
        tracing::debug!(path = %path.as_ref().display(), "saved dictionary");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}
