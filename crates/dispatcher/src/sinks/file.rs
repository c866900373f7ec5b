//! FileSink - writes aligned sample sets to disk as one JSON file per grid tick

use contracts::{AlignedSampleSet, AlignedSink, SinkError};
use std::collections::HashMap;
use std::fs::{self, File};
use std::path::PathBuf;
use tracing::{debug, error, instrument};

/// Configuration for FileSink
#[derive(Debug, Clone)]
pub struct FileSinkConfig {
    /// Base output directory
    pub base_path: PathBuf,
}

impl FileSinkConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let base_path = params
            .get("base_path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./output"));

        Self { base_path }
    }
}

/// Sink that writes every aligned sample set to disk as `<base_path>/<timestamp>.json`
pub struct FileSink {
    name: String,
    config: FileSinkConfig,
}

impl FileSink {
    /// Create a new FileSink
    pub fn new(name: impl Into<String>, config: FileSinkConfig) -> std::io::Result<Self> {
        fs::create_dir_all(&config.base_path)?;

        Ok(Self {
            name: name.into(),
            config,
        })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> std::io::Result<Self> {
        let config = FileSinkConfig::from_params(params);
        Self::new(name, config)
    }

    fn write_frame_to_disk(&self, frame: &AlignedSampleSet) -> std::io::Result<()> {
        let path = self
            .config
            .base_path
            .join(format!("{}.json", frame.timestamp));
        let file = File::create(path)?;
        serde_json::to_writer(file, frame)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    fn persist_frame(&self, frame: &AlignedSampleSet) -> Result<(), SinkError> {
        self.write_frame_to_disk(frame).map_err(|e| {
            error!(sink = %self.name, timestamp = frame.timestamp, error = %e, "Write failed");
            SinkError::Write {
                sink_name: self.name.clone(),
                message: e.to_string(),
            }
        })
    }
}

impl AlignedSink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "file_sink_write",
        skip(self, frame),
        fields(sink = %self.name, timestamp = frame.timestamp)
    )]
    async fn write(&mut self, frame: &AlignedSampleSet) -> Result<(), SinkError> {
        self.persist_frame(frame)
    }

    #[instrument(name = "file_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    #[instrument(name = "file_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), SinkError> {
        debug!(sink = %self.name, "FileSink closed");
        Ok(())
    }
}
