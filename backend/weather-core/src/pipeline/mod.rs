//! The run, start to finish.
//!
//! `ValidateConfig -> ConstructUrl -> Execute -> ParseAndRedact -> Format`.
//! The first failing stage ends the run. Every resource acquired on the way
//! (HTTP client, response buffer, parsed document) is owned by the stage
//! that needs it and dropped exactly once on every exit path.

use crate::buffer::{GrowthBuffer, INITIAL_CAPACITY, MAX_RESPONSE_SIZE};
use crate::config::RequestConfig;
use crate::endpoint::ApiEndpoint;
use crate::error::WeatherError;
use crate::request::RequestExecutor;
use crate::sanitize::{SanitizedDocument, parse_and_redact};

use std::fmt;
use std::io::Write;

use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    ValidateConfig,
    ConstructUrl,
    Execute,
    ParseAndRedact,
    Format,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::ValidateConfig => "ValidateConfig",
            PipelineStage::ConstructUrl => "ConstructUrl",
            PipelineStage::Execute => "Execute",
            PipelineStage::ParseAndRedact => "ParseAndRedact",
            PipelineStage::Format => "Format",
        };
        write!(f, "{name}")
    }
}

/// Size bounds for the response buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferLimits {
    pub initial_capacity: usize,
    pub max_size: usize,
}

impl Default for BufferLimits {
    fn default() -> Self {
        Self {
            initial_capacity: INITIAL_CAPACITY,
            max_size: MAX_RESPONSE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WeatherPipeline {
    endpoint: ApiEndpoint,
    limits: BufferLimits,
}

impl WeatherPipeline {
    pub fn new(endpoint: ApiEndpoint) -> Self {
        Self {
            endpoint,
            limits: BufferLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: BufferLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn endpoint(&self) -> &ApiEndpoint {
        &self.endpoint
    }

    /// Run every stage up to, but not including, `Format`.
    ///
    /// Credentials are checked before the HTTP client or the response
    /// buffer exist, so an invalid config never touches the network.
    pub async fn fetch(&self, config: &RequestConfig) -> Result<SanitizedDocument, WeatherError> {
        enter(PipelineStage::ValidateConfig);
        let credentials = config.credentials()?;
        config.validate_segments()?;

        enter(PipelineStage::ConstructUrl);
        let url = self.endpoint.request_url(config)?;

        enter(PipelineStage::Execute);
        let executor = RequestExecutor::new()?;
        let mut buffer = GrowthBuffer::new(self.limits.initial_capacity, self.limits.max_size)?;
        executor.execute(url, &credentials, &mut buffer).await?;

        enter(PipelineStage::ParseAndRedact);
        let document = parse_and_redact(buffer.as_bytes())?;
        buffer.release();

        Ok(document)
    }

    /// Fetch, sanitize and write the indented document to `out`.
    ///
    /// Nothing is written to `out` unless every earlier stage succeeded.
    pub async fn run<W>(&self, config: &RequestConfig, out: &mut W) -> Result<(), WeatherError>
    where
        W: Write,
    {
        let document = self.fetch(config).await?;

        enter(PipelineStage::Format);
        document.write_pretty(out)?;

        info!("Weather report written");
        Ok(())
    }
}

fn enter(stage: PipelineStage) {
    debug!("Pipeline stage: {stage}");
}
