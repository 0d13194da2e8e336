/*!
 * Configuration types for the pipeline
 */

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// How many batches the read pump may run ahead of the coordinator.
const READ_AHEAD_BATCHES: usize = 2;

/// Sizing parameters for a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Nominal read chunk size in bytes
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Alignment granularity required by the transform, in bytes.
    /// Every batch delivered to the transform, except possibly the final
    /// one at end-of-stream, has a length that is a multiple of this value.
    #[serde(default = "default_work_unit_size")]
    pub work_unit_size: usize,
}

fn default_batch_size() -> usize {
    64 * 1024
}

fn default_work_unit_size() -> usize {
    1
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            work_unit_size: default_work_unit_size(),
        }
    }
}

impl PipelineConfig {
    /// Create a validated configuration
    pub fn new(batch_size: usize, work_unit_size: usize) -> Result<Self> {
        let config = Self {
            batch_size,
            work_unit_size,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the preconditions the pipeline relies on, failing fast on a
    /// caller error instead of producing degenerate alignment behavior.
    pub fn validate(&self) -> Result<()> {
        if self.work_unit_size == 0 {
            return Err(PipelineError::Config(
                "work_unit_size must be greater than zero".to_string(),
            ));
        }
        if self.batch_size < self.work_unit_size {
            return Err(PipelineError::Config(format!(
                "batch_size ({}) must be at least work_unit_size ({})",
                self.batch_size, self.work_unit_size
            )));
        }
        Ok(())
    }

    /// `batch_size` rounded up to the next work-unit multiple; the upper
    /// bound on the length of any batch the read pump produces, and the
    /// size of its read buffer.
    pub fn padded_batch_size(&self) -> usize {
        self.batch_size.div_ceil(self.work_unit_size) * self.work_unit_size
    }

    /// Input queue capacity: just enough for the reader to run ahead.
    pub(crate) fn input_queue_depth(&self) -> usize {
        READ_AHEAD_BATCHES
    }

    /// Output queue capacity: scales with how many work units fit in a
    /// batch, so the coordinator can outpace a slow writer without stalling.
    pub(crate) fn output_queue_depth(&self) -> usize {
        1 + self.batch_size / self.work_unit_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(PipelineConfig::new(4096, 512).is_ok());
        assert!(PipelineConfig::new(1, 1).is_ok());

        // work_unit_size of zero
        assert!(PipelineConfig::new(4096, 0).is_err());

        // batch smaller than a work unit
        assert!(PipelineConfig::new(256, 512).is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.work_unit_size, 1);
    }

    #[test]
    fn test_padded_batch_size() {
        // Already aligned: unchanged
        let config = PipelineConfig::new(4096, 512).unwrap();
        assert_eq!(config.padded_batch_size(), 4096);

        // Unaligned: rounded up to the next work-unit multiple
        let config = PipelineConfig::new(3, 2).unwrap();
        assert_eq!(config.padded_batch_size(), 4);

        let config = PipelineConfig::new(1000, 512).unwrap();
        assert_eq!(config.padded_batch_size(), 1024);
    }

    #[test]
    fn test_serde_defaults_fill_missing_fields() {
        let config: PipelineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.batch_size, 64 * 1024);
        assert_eq!(config.work_unit_size, 1);

        let config: PipelineConfig = serde_json::from_str(r#"{"batch_size": 1024}"#).unwrap();
        assert_eq!(config.batch_size, 1024);
        assert_eq!(config.work_unit_size, 1);
    }

    #[test]
    fn test_serde_round_trip() {
        let config = PipelineConfig::new(4096, 512).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let restored: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.batch_size, config.batch_size);
        assert_eq!(restored.work_unit_size, config.work_unit_size);
    }

    #[test]
    fn test_queue_depths() {
        let config = PipelineConfig::new(4, 1).unwrap();
        assert_eq!(config.input_queue_depth(), 2);
        assert_eq!(config.output_queue_depth(), 5);

        let config = PipelineConfig::new(3, 2).unwrap();
        assert_eq!(config.output_queue_depth(), 2);
    }
}
