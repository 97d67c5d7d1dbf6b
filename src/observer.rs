//! Pipeline observation as an injected capability.
//!
//! Informational reporting is not global state: the pipeline driver takes
//! a [`PipelineObserver`] by parameter and notifies it at stage
//! boundaries. The default [`LogObserver`] forwards everything to the
//! `log` facade; tests inject a recording implementation to assert stage
//! inputs deterministically, for instance that the hash stage received
//! zero files after the cheaper filters excluded everything.

/// Observer for pipeline stage boundaries.
///
/// Stage names are `"collect"`, `"size"`, `"sample"` and `"hash"`.
pub trait PipelineObserver: Send + Sync {
    /// Called when a stage starts.
    ///
    /// # Arguments
    ///
    /// * `stage` - Name of the stage
    /// * `input_files` - Number of files entering the stage (0 for collect)
    fn on_stage_start(&self, stage: &str, input_files: usize);

    /// Called when a stage completes.
    ///
    /// # Arguments
    ///
    /// * `stage` - Name of the stage
    /// * `survivors` - Number of files still in play after the stage
    fn on_stage_end(&self, stage: &str, survivors: usize);

    /// Called when a file is skipped due to a recoverable error.
    fn on_file_skipped(&self, _reason: &str) {}
}

/// Default observer that forwards stage transitions to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn on_stage_start(&self, stage: &str, input_files: usize) {
        log::debug!("Stage {} starting with {} files", stage, input_files);
    }

    fn on_stage_end(&self, stage: &str, survivors: usize) {
        log::debug!("Stage {} finished, {} files remain", stage, survivors);
    }

    fn on_file_skipped(&self, reason: &str) {
        log::warn!("Skipped: {}", reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recording {
        starts: Mutex<Vec<(String, usize)>>,
    }

    impl PipelineObserver for Recording {
        fn on_stage_start(&self, stage: &str, input_files: usize) {
            self.starts
                .lock()
                .unwrap()
                .push((stage.to_string(), input_files));
        }

        fn on_stage_end(&self, _stage: &str, _survivors: usize) {}
    }

    #[test]
    fn test_recording_observer_captures_stages() {
        let rec = Recording {
            starts: Mutex::new(Vec::new()),
        };
        rec.on_stage_start("size", 10);
        rec.on_stage_start("hash", 2);

        let starts = rec.starts.lock().unwrap();
        assert_eq!(*starts, vec![("size".to_string(), 10), ("hash".to_string(), 2)]);
    }
}
