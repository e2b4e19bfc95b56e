use crate::config::Config;

/// Accumulated adapter timings. Only written when detailed timings are enabled.
#[derive(Debug,Clone,Default,PartialEq)]
pub struct TimingLog {
    pub total_time_rgbd_adapter_ms: f64,
    pub count_time_rgbd_adapter: u32
}

impl TimingLog {

    pub fn record_rgbd_adapter(&mut self, elapsed_ms: f64) -> () {
        self.total_time_rgbd_adapter_ms += elapsed_ms;
        self.count_time_rgbd_adapter += 1;
    }

    pub fn average_rgbd_adapter_ms(&self) -> Option<f64> {
        match self.count_time_rgbd_adapter {
            0 => None,
            c => Some(self.total_time_rgbd_adapter_ms/(c as f64))
        }
    }

    pub fn reset(&mut self) -> () {
        *self = TimingLog::default();
    }
}

/// State shared by every component for the duration of one playback session:
/// the configuration, the playback cursor and the timing accumulators.
#[derive(Debug,Clone)]
pub struct Session {
    pub config: Config,
    pub current_frame_index: usize,
    pub timing: TimingLog
}

impl Session {

    pub fn new(config: Config) -> Session {
        let current_frame_index = config.dataset.min_frame_index;
        Session {config, current_frame_index, timing: TimingLog::default()}
    }

    /// Moves the cursor to the next frame. Called once per fully processed frame.
    pub fn advance_frame(&mut self) -> () {
        self.current_frame_index += 1;
    }

    pub fn reset_cursor(&mut self) -> () {
        self.current_frame_index = self.config.dataset.min_frame_index;
    }

    pub fn timings_detailed(&self) -> bool {
        self.config.adapter.timings_detailed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_needs_samples() {
        let mut timing = TimingLog::default();
        assert_eq!(timing.average_rgbd_adapter_ms(), None);
        timing.record_rgbd_adapter(2.0);
        timing.record_rgbd_adapter(4.0);
        assert_eq!(timing.count_time_rgbd_adapter, 2);
        assert_eq!(timing.average_rgbd_adapter_ms(), Some(3.0));
        timing.reset();
        assert_eq!(timing, TimingLog::default());
    }
}
