use std::time::Duration;

/// Tuning knobs for a [`ConfigStore`](crate::config_store::ConfigStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Quiet period after the last write event before the file is reloaded.
    ///
    /// Editors and `fs::write` usually emit several events per save
    /// (truncate, write, metadata); they collapse into a single reload.
    pub debounce: Duration,

    /// Number of reload pulses buffered per subscriber before older ones
    /// are collapsed.
    pub pulse_capacity: usize,

    /// Unix permission bits applied to the file on save.
    pub file_mode: u32,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(100),
            pulse_capacity: 64,
            file_mode: 0o644,
        }
    }
}

impl StoreOptions {
    /// Sets the reload debounce window.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Sets the per-subscriber pulse buffer. Values below one are raised to one.
    pub fn with_pulse_capacity(mut self, capacity: usize) -> Self {
        self.pulse_capacity = capacity.max(1);
        self
    }

    /// Sets the permission bits written on save.
    pub fn with_file_mode(mut self, mode: u32) -> Self {
        self.file_mode = mode;
        self
    }
}
