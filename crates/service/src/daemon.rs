//! Daemon lifecycle: build the pipeline, poll buttons, shut down.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use thumbmouse_atomic::{CounterSnapshot, PipelineCounters};
use thumbmouse_calibration::AxisMapper;
use thumbmouse_curves::{ModeCycler, MotionShaper, ProfileSelector, ShapingPolicy};
use thumbmouse_scheduler::{
    GatedTransport, PollingMode, ReportPipeline, ReportService, ScheduleMode,
};
use thumbmouse_source::{
    IndicatorSink, NoIndicator, OversampledAdc, SampleSource, SharedTrackball, Trackball,
};
use tracing::{error, info, warn};

use crate::config::DaemonConfig;
use crate::input::{ButtonEdge, ButtonInput, PeriodicButton, TrackballSwitch};
use crate::sim::{CursorHandle, LoggingTransport, SimJoystick, SimTrackballBus, ThreadDelay};

/// Readings per X sweep of the simulated joystick.
const JOYSTICK_SWEEP_PERIOD: u64 = 4_000;

/// Device family to simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SourceKind {
    /// Analog thumb joystick behind an oversampling ADC
    #[default]
    Adc,
    /// I2C trackball
    Trackball,
}

/// Scheduling override from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ModeKind {
    /// Timer permits
    Timer,
    /// Continuous polling
    Polling,
}

/// Command-line choices layered over the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Device family
    pub source: SourceKind,
    /// Overrides the configured schedule kind
    pub mode: Option<ModeKind>,
}

/// What a finished run leaves behind.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    /// Counters at shutdown
    pub counters: CounterSnapshot,
    /// Virtual cursor position at shutdown
    pub cursor: (i64, i64),
    /// Profile active at shutdown
    pub profile: usize,
}

type BoxedSource = Box<dyn SampleSource + Send>;

struct Devices {
    source: BoxedSource,
    mapper: AxisMapper,
    indicator: Box<dyn IndicatorSink>,
    mode_button: Box<dyn ButtonInput>,
}

/// The daemon.
#[derive(Debug)]
pub struct Daemon {
    config: DaemonConfig,
    options: RunOptions,
}

impl Daemon {
    /// Validate `config` and keep it for [`Daemon::run_until`].
    ///
    /// # Errors
    ///
    /// A value that fails validation.
    pub fn new(config: DaemonConfig, options: RunOptions) -> Result<Self> {
        config.validate().context("invalid configuration")?;
        Ok(Self { config, options })
    }

    /// Schedule mode after the command-line override.
    pub fn schedule(&self) -> ScheduleMode {
        match (self.options.mode, self.config.schedule) {
            (None, configured) => configured,
            (Some(ModeKind::Timer), _) => ScheduleMode::Timer,
            (Some(ModeKind::Polling), ScheduleMode::Polling(polling)) => {
                ScheduleMode::Polling(polling)
            }
            (Some(ModeKind::Polling), ScheduleMode::Timer) => {
                ScheduleMode::Polling(PollingMode::default())
            }
        }
    }

    /// Shaping policy for the selected source. Trackball deltas are a few
    /// counts per read, below any joystick deadzone.
    pub fn policy(&self) -> ShapingPolicy {
        match self.options.source {
            SourceKind::Adc => self.config.policy,
            SourceKind::Trackball => self.config.trackball_policy,
        }
    }

    /// Run until `shutdown` resolves or the consumer ends on its own.
    ///
    /// # Errors
    ///
    /// Device bring-up failure, a thread that cannot be spawned, or the
    /// error that ended the consumer.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) -> Result<RunSummary> {
        let config = &self.config;
        let counters = Arc::new(PipelineCounters::new());
        let profiles = Arc::new(config.profiles.clone());
        let selector = ProfileSelector::new(profiles.len(), config.initial_profile)?;
        let shaper = MotionShaper::new(
            self.policy(),
            config.output_range.center,
            Arc::clone(&profiles),
            selector.clone(),
        );

        let logging = LoggingTransport::new();
        let cursor: CursorHandle = logging.cursor();
        let mut transport = GatedTransport::new(logging);
        if !config.elide_zero_reports {
            transport = transport.keep_zero_reports();
        }

        let devices = self.build_devices()?;
        let pipeline = ReportPipeline::new(
            devices.source,
            devices.mapper,
            shaper,
            transport,
            Arc::clone(&counters),
        );

        let schedule = self.schedule();
        let mut service =
            ReportService::spawn(pipeline, schedule, config.timing()?, config.consumer())
                .context("failed to spawn report service")?;
        info!(
            source = ?self.options.source,
            schedule = ?schedule,
            frequency_hz = config.report_frequency_hz,
            "report service ready"
        );

        let mut cycler = ModeCycler::new(selector.clone(), profiles, devices.indicator)
            .with_counters(Arc::clone(&counters));
        cycler.refresh();

        if config.autostart {
            service.start()?;
        }

        let mut boot_button = PeriodicButton::new(config.simulation.boot_press_every);
        let mut mode_button = devices.mode_button;
        let mut boot_edge = ButtonEdge::new();
        let mut mode_edge = ButtonEdge::new();
        let mut ticker = tokio::time::interval(config.button_poll());
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("shutdown requested");
                    break;
                }
                _ = ticker.tick() => {
                    if service.consumer_finished() {
                        warn!("consumer ended, shutting down");
                        break;
                    }
                    if boot_edge.poll(&mut boot_button) {
                        let toggled = if service.is_running() {
                            service.stop()
                        } else {
                            service.start()
                        };
                        match toggled {
                            Ok(()) => info!(state = %service.state(), "boot button"),
                            Err(e) => error!(error = %e, "boot button toggle failed"),
                        }
                    }
                    if mode_edge.poll(mode_button.as_mut()) {
                        cycler.on_press();
                    }
                }
            }
        }

        let result = service.shutdown();
        let summary = RunSummary {
            counters: counters.snapshot(),
            cursor: cursor.position(),
            profile: selector.current(),
        };
        info!(
            cycles = summary.counters.cycles,
            reports = summary.counters.reports_emitted,
            dropped = summary.counters.reports_dropped,
            coalesced = summary.counters.permits_coalesced,
            bus_errors = summary.counters.bus_errors,
            config_faults = summary.counters.config_faults,
            profile_switches = summary.counters.profile_switches,
            max_cycle_us = summary.counters.max_cycle_us,
            cursor_x = summary.cursor.0,
            cursor_y = summary.cursor.1,
            "report service stopped"
        );
        result.context("consumer ended with an error")?;
        Ok(summary)
    }

    fn build_devices(&self) -> Result<Devices> {
        let config = &self.config;
        match self.options.source {
            SourceKind::Adc => {
                let calibration = config.calibration.calibration();
                let joystick = SimJoystick::new(calibration, JOYSTICK_SWEEP_PERIOD);
                let mapper =
                    AxisMapper::validated(calibration, config.output_range, config.segment_scale)?;
                Ok(Devices {
                    source: oversampled(config.oversampling, joystick)?,
                    mapper,
                    indicator: Box::new(NoIndicator),
                    mode_button: Box::new(PeriodicButton::new(config.simulation.mode_press_every)),
                })
            }
            SourceKind::Trackball => {
                let bus = SimTrackballBus::new(config.trackball_address)
                    .with_fault_every(config.simulation.trackball_fault_every)
                    .with_switch_every(config.simulation.mode_press_every);
                let trackball = Trackball::init(bus, config.trackball_address, &mut ThreadDelay)
                    .map_err(|e| anyhow!("{e}"))?;
                let shared = SharedTrackball::new(trackball);
                Ok(Devices {
                    source: Box::new(shared.clone()),
                    mapper: AxisMapper::relative(config.output_range),
                    indicator: Box::new(shared.clone()),
                    mode_button: Box::new(TrackballSwitch(shared)),
                })
            }
        }
    }
}

fn oversampled(count: usize, joystick: SimJoystick) -> Result<BoxedSource> {
    let source: BoxedSource = match count {
        1 => Box::new(OversampledAdc::<_, 1>::new(joystick)),
        4 => Box::new(OversampledAdc::<_, 4>::new(joystick)),
        10 => Box::new(OversampledAdc::<_, 10>::new(joystick)),
        16 => Box::new(OversampledAdc::<_, 16>::new(joystick)),
        other => return Err(anyhow!("unsupported oversampling count {other}")),
    };
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_override() -> Result<()> {
        let daemon = Daemon::new(
            DaemonConfig::default(),
            RunOptions {
                source: SourceKind::Adc,
                mode: Some(ModeKind::Polling),
            },
        )?;
        assert_eq!(
            daemon.schedule(),
            ScheduleMode::Polling(PollingMode::default())
        );

        let daemon = Daemon::new(DaemonConfig::default(), RunOptions::default())?;
        assert_eq!(daemon.schedule(), ScheduleMode::Timer);
        Ok(())
    }

    #[test]
    fn test_policy_follows_source() -> Result<()> {
        let config = DaemonConfig::default();
        let joystick = Daemon::new(config.clone(), RunOptions::default())?;
        assert_eq!(joystick.policy(), config.policy);

        let trackball = Daemon::new(
            config.clone(),
            RunOptions {
                source: SourceKind::Trackball,
                mode: None,
            },
        )?;
        assert_eq!(trackball.policy(), config.trackball_policy);
        Ok(())
    }

    #[test]
    fn test_unsupported_oversampling() {
        let joystick = SimJoystick::new(
            thumbmouse_calibration::DeviceCalibration::gamepad(),
            JOYSTICK_SWEEP_PERIOD,
        );
        assert!(oversampled(7, joystick).is_err());
    }
}
