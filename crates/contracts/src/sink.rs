//! AlignedSink trait — the §6 boundary a persistence/export/UI consumer implements.

use crate::{AlignedSampleSet, SinkError};

/// Consumer of the pipeline's output. All sink implementations (log, file,
/// network, ...) implement this trait; none of them are part of the core.
#[trait_variant::make(AlignedSink: Send)]
pub trait LocalAlignedSink {
    /// Sink name, used for logging/metrics.
    fn name(&self) -> &str;

    /// Write one aligned sample set.
    async fn write(&mut self, frame: &AlignedSampleSet) -> Result<(), SinkError>;

    /// Flush any buffered state.
    async fn flush(&mut self) -> Result<(), SinkError>;

    /// Close the sink.
    async fn close(&mut self) -> Result<(), SinkError>;
}
