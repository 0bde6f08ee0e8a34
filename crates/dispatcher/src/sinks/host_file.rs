//! HostFileSink - appends each message to its host's log file

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use contracts::{DataSink, LogMessage, OutputConfig, RecordFormat};
use tracing::trace;

use crate::error::DispatchError;
use crate::path;
use crate::record;

/// Sink that routes each message to `<log_folder with hostname>/syslog.log`
///
/// The file is opened in append mode for every record and closed right
/// after, so external rotation needs no signal.
#[derive(Debug, Clone)]
pub struct HostFileSink {
    name: String,
    template: String,
    format: RecordFormat,
}

impl HostFileSink {
    /// Create a sink writing below `template`
    pub fn new(name: impl Into<String>, template: impl Into<String>, format: RecordFormat) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            format,
        }
    }

    /// Create from the `log_folder` template and output settings
    pub fn from_config(template: &str, output: &OutputConfig) -> Self {
        Self::new("host_file", template, output.record_format)
    }
}

impl DataSink for HostFileSink {
    type Error = DispatchError;

    fn name(&self) -> &str {
        &self.name
    }

    async fn write(&mut self, message: &LogMessage) -> Result<PathBuf, DispatchError> {
        let hostname = message.hostname();
        let path = path::resolve(&self.template, hostname)?;
        let line = record::render(message, self.format)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| DispatchError::persist(hostname, &path, e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| DispatchError::persist(hostname, &path, e))?;

        trace!(sink = %self.name, %hostname, path = %path.display(), "record appended");
        Ok(path)
    }
}
