//! LogSink - logs frame summary via tracing

use contracts::{AlignedSampleSet, AlignedSink, SinkError};
use tracing::{info, instrument};

/// Sink that logs frame summaries for debugging
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn log_frame_summary(&self, frame: &AlignedSampleSet) {
        info!(
            sink = %self.name,
            timestamp = frame.timestamp,
            left_knee = frame.left_knee.is_some(),
            right_knee = frame.right_knee.is_some(),
            single_joint = frame.is_single_joint(),
            "AlignedSampleSet received"
        );
    }
}

impl AlignedSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_write",
        skip(self, frame),
        fields(sink = %self.name, timestamp = frame.timestamp)
    )]
    async fn write(&mut self, frame: &AlignedSampleSet) -> Result<(), SinkError> {
        self.log_frame_summary(frame);
        Ok(())
    }

    #[instrument(name = "log_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), SinkError> {
        // Nothing to flush for log sink
        Ok(())
    }

    #[instrument(name = "log_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), SinkError> {
        info!(sink = %self.name, "LogSink closed");
        Ok(())
    }
}
