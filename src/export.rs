//! Buffer export for callers outside the harness.
//!
//! [`to_byte_array`] is the boundary-crossing form: the same bytes as the
//! internal `i8` buffer, reinterpreted, never rescaled. [`write_wav`] dumps a
//! buffer as 8-bit mono PCM for inspection in an audio editor.

use crate::config::{EXPORT_SAMPLE_RATE, SIGNAL_LENGTH};
use crate::error::{KernelError, Result};
use crate::invariant_ppt::{assert_invariant, EXPORT_LENGTH};
use std::path::Path;

/// Reinterpret a signal buffer as raw bytes (two's complement, bit for bit).
pub fn to_byte_array(buffer: &[i8]) -> Vec<u8> {
    let bytes: Vec<u8> = buffer.iter().map(|&s| s as u8).collect();
    assert_invariant(
        EXPORT_LENGTH,
        bytes.len() == buffer.len(),
        "exported byte array changed length",
        None,
    );
    bytes
}

/// Inverse of [`to_byte_array`].
pub fn from_byte_array(bytes: &[u8]) -> Vec<i8> {
    bytes.iter().map(|&b| b as i8).collect()
}

/// Write a full signal buffer to `path` as 8-bit mono WAV.
pub fn write_wav(path: impl AsRef<Path>, buffer: &[i8]) -> Result<()> {
    if buffer.len() != SIGNAL_LENGTH {
        return Err(KernelError::LengthMismatch {
            expected: SIGNAL_LENGTH,
            actual: buffer.len(),
        });
    }
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: EXPORT_SAMPLE_RATE,
        bits_per_sample: 8,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path.as_ref(), spec)?;
    for &sample in buffer {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    tracing::debug!(path = %path.as_ref().display(), samples = buffer.len(), "wrote wav");
    Ok(())
}

/// Read back a WAV written by [`write_wav`].
pub fn read_wav(path: impl AsRef<Path>) -> Result<Vec<i8>> {
    let mut reader = hound::WavReader::open(path.as_ref())?;
    let samples = reader.samples::<i8>().collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(samples)
}
