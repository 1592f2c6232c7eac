use crate::error::Result;
use crate::format::{BackendKind, FormatTag};
use crate::pcm::PcmBuffer;

/// One strategy for turning PCM into an encoded file.
///
/// An attempt is self-contained: any scratch files or subprocesses it
/// creates are gone by the time `convert` returns, whatever the outcome.
pub trait ConversionBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Human-readable name used in logs.
    fn name(&self) -> &str;

    /// Whether this backend can produce `format` at all.
    fn supports(&self, format: FormatTag) -> bool {
        format.is_capable(self.kind())
    }

    fn convert(&self, pcm: PcmBuffer<'_>, format: FormatTag) -> Result<Vec<u8>>;
}
