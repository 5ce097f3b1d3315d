//! Daemon configuration file.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thumbmouse_calibration::{CalibrationPreset, DeviceCalibration, OutputRange, SegmentScale};
use thumbmouse_curves::{ProfileSet, ShapingPolicy};
use thumbmouse_errors::ValidationError;
use thumbmouse_scheduler::{
    ConsumerConfig, DEFAULT_BUS_BACKOFF, DEFAULT_REPORT_FREQUENCY_HZ, ReportTiming, ScheduleMode,
};
use thumbmouse_source::DEFAULT_ADDRESS;
use tracing::debug;

/// Cap of the default trackball policy.
pub const TRACKBALL_MAX_MAGNITUDE: i32 = 127;

/// Oversampling counts the ADC source is built for.
pub const SUPPORTED_OVERSAMPLING: [usize; 4] = [1, 4, 10, 16];

/// Where the joystick calibration comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationChoice {
    /// A built-in preset
    Preset(CalibrationPreset),
    /// Explicit per-axis values
    Custom(DeviceCalibration),
}

impl Default for CalibrationChoice {
    fn default() -> Self {
        CalibrationChoice::Preset(CalibrationPreset::Gamepad)
    }
}

impl CalibrationChoice {
    /// Resolve to a calibration.
    pub fn calibration(&self) -> DeviceCalibration {
        match *self {
            CalibrationChoice::Preset(preset) => preset.calibration(),
            CalibrationChoice::Custom(calibration) => calibration,
        }
    }
}

/// Behaviour of the simulated devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Press the boot button every this many button polls
    pub boot_press_every: Option<u32>,
    /// Press the mode button every this many button polls
    pub mode_press_every: Option<u32>,
    /// Fail every this many trackball transactions
    pub trackball_fault_every: Option<u32>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            boot_press_every: None,
            mode_press_every: Some(50),
            trackball_fault_every: None,
        }
    }
}

/// Everything the daemon reads from its JSON file.
///
/// Every field has a default, so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Timer frequency in timer mode
    pub report_frequency_hz: u32,
    /// ADC readings averaged per axis
    pub oversampling: usize,
    /// Joystick calibration
    pub calibration: CalibrationChoice,
    /// Divisor of the segment formula
    pub segment_scale: SegmentScale,
    /// Normalized axis space
    pub output_range: OutputRange,
    /// Delta computation for the joystick
    pub policy: ShapingPolicy,
    /// Delta computation for the trackball
    pub trackball_policy: ShapingPolicy,
    /// Profiles cycled by the mode button
    pub profiles: ProfileSet,
    /// Profile active at start
    pub initial_profile: usize,
    /// Timer or polling
    pub schedule: ScheduleMode,
    /// Sleep after a bus error
    pub bus_backoff_ms: u64,
    /// I2C address of the trackball
    pub trackball_address: u8,
    /// Start reporting without waiting for the boot button
    pub autostart: bool,
    /// Button poll period
    pub button_poll_ms: u64,
    /// Drop `(0, 0)` reports before the transport
    pub elide_zero_reports: bool,
    /// Simulated device behaviour
    pub simulation: SimulationConfig,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            report_frequency_hz: DEFAULT_REPORT_FREQUENCY_HZ,
            oversampling: 10,
            calibration: CalibrationChoice::default(),
            segment_scale: SegmentScale::default(),
            output_range: OutputRange::default(),
            policy: ShapingPolicy::default(),
            trackball_policy: ShapingPolicy::polynomial(TRACKBALL_MAX_MAGNITUDE),
            profiles: ProfileSet::builtin(),
            initial_profile: 0,
            schedule: ScheduleMode::default(),
            bus_backoff_ms: u64::try_from(DEFAULT_BUS_BACKOFF.as_millis()).unwrap_or(1000),
            trackball_address: DEFAULT_ADDRESS,
            autostart: true,
            button_poll_ms: 100,
            elide_zero_reports: true,
            simulation: SimulationConfig::default(),
        }
    }
}

impl DaemonConfig {
    /// Read and validate a config file.
    ///
    /// # Errors
    ///
    /// Unreadable file, malformed JSON, or a value that fails validation.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_json(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Malformed JSON or a value that fails validation.
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content).context("failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Pretty JSON, as `--print-default-config` shows it.
    ///
    /// # Errors
    ///
    /// Serialization failure.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize config")
    }

    /// Check every value before anything is started.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.timing()?;
        if !SUPPORTED_OVERSAMPLING.contains(&self.oversampling) {
            return Err(ValidationError::invalid_enum(
                "oversampling",
                self.oversampling.to_string(),
                SUPPORTED_OVERSAMPLING
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            ));
        }
        self.calibration.calibration().validate()?;
        self.output_range.validate()?;
        self.policy.validate()?;
        self.trackball_policy.validate()?;
        if self.initial_profile >= self.profiles.len() {
            return Err(ValidationError::out_of_range(
                "initial_profile",
                self.initial_profile,
                0,
                self.profiles.len().saturating_sub(1),
            ));
        }
        if let ScheduleMode::Polling(polling) = self.schedule {
            polling.validate()?;
        }
        if self.button_poll_ms == 0 {
            return Err(ValidationError::zero("button_poll_ms"));
        }
        Ok(())
    }

    /// Report interval.
    ///
    /// # Errors
    ///
    /// A frequency of zero or above 1 MHz.
    pub fn timing(&self) -> Result<ReportTiming, ValidationError> {
        ReportTiming::from_frequency_hz(self.report_frequency_hz)
    }

    /// Consumer tuning.
    pub fn consumer(&self) -> ConsumerConfig {
        ConsumerConfig {
            bus_backoff: Duration::from_millis(self.bus_backoff_ms),
            ..ConsumerConfig::default()
        }
    }

    /// Button poll period.
    pub fn button_poll(&self) -> Duration {
        Duration::from_millis(self.button_poll_ms)
    }
}
