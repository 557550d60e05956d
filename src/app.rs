use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::Result;
use crate::renderer::{Frame, Renderer};
use crate::simulation::{Simulation, StepReport};

/// Presentation-side settings for the driving loop.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Pause between generations.
    pub delay: Duration,
    /// Stop after this many generations.
    pub max_generations: Option<u64>,
    /// Keep stepping once stability has been announced.
    pub keep_running: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(50),
            max_generations: None,
            keep_running: false,
        }
    }
}

/// Minimum wait between cycles while paused.
const PAUSE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run/pause flag and stop signal shared with whoever controls the loop.
///
/// Both are polled once per cycle; a generation in progress always completes.
#[derive(Debug, Clone)]
pub struct RunControl {
    running: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
}

impl Default for RunControl {
    fn default() -> Self {
        Self::new()
    }
}

impl RunControl {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn set_running(&self, running: bool) {
        if self.running.swap(running, Ordering::Relaxed) != running {
            log::info!("Simulation {}", if running { "resumed" } else { "paused" });
        }
    }

    pub fn pause(&self) {
        self.set_running(false);
    }

    pub fn resume(&self) {
        self.set_running(true);
    }

    pub fn toggle(&self) {
        self.set_running(!self.is_running());
    }

    /// Ask the loop to exit at the next cycle boundary.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }
}

/// What a single cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Paused,
    Advanced(StepReport),
}

/// Final state of a finished [`App::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub generations: u64,
    pub population: u64,
    pub stability_onset: Option<u64>,
}

/// Drives a simulation: render, check the run flag, advance, record.
pub struct App<R: Renderer> {
    simulation: Simulation,
    renderer: R,
    settings: RunSettings,
    control: RunControl,
}

impl<R: Renderer> App<R> {
    pub fn new(simulation: Simulation, renderer: R, settings: RunSettings) -> Self {
        Self {
            simulation,
            renderer,
            settings,
            control: RunControl::new(),
        }
    }

    /// Drive the loop from an externally owned control.
    pub fn with_control(mut self, control: RunControl) -> Self {
        self.control = control;
        self
    }

    /// Handle for pausing, resuming and stopping this app.
    pub fn control(&self) -> RunControl {
        self.control.clone()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Run one full cycle. A generation is either fully computed or not
    /// started; the renderer only sees committed state.
    pub fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let cadence = u64::from(self.simulation.config().display_cadence);
        if self.simulation.generation() % cadence == 0 {
            self.render()?;
        }

        if !self.control.is_running() {
            return Ok(CycleOutcome::Paused);
        }

        let report = self.simulation.step();
        if report.stabilized {
            if let Some(onset) = self.simulation.stability_onset() {
                log::info!("Stability reached: grid stagnates from generation {onset}");
                self.renderer.announce_stability(onset)?;
            }
        }
        Ok(CycleOutcome::Advanced(report))
    }

    /// Cycle until stopped, capped, or (unless `keep_running`) stable.
    ///
    /// While paused the loop keeps rendering but does not step.
    pub fn run(&mut self) -> Result<RunSummary> {
        loop {
            if self.control.is_stopped() {
                break;
            }

            if let Some(max) = self.settings.max_generations {
                if self.simulation.generation() >= max {
                    if !self.simulation.is_stable() {
                        log::warn!("Stopped after {max} generations without reaching stability");
                    }
                    self.render()?;
                    break;
                }
            }

            let delay = match self.run_cycle()? {
                CycleOutcome::Paused => self.settings.delay.max(PAUSE_POLL_INTERVAL),
                CycleOutcome::Advanced(report) => {
                    if report.stabilized && !self.settings.keep_running {
                        self.render()?;
                        break;
                    }
                    self.settings.delay
                }
            };

            if !delay.is_zero() {
                thread::sleep(delay);
            }
        }

        Ok(RunSummary {
            generations: self.simulation.generation(),
            population: self.simulation.population(),
            stability_onset: self.simulation.stability_onset(),
        })
    }

    fn render(&mut self) -> Result<()> {
        self.renderer.draw(&Frame {
            generation: self.simulation.generation(),
            population: self.simulation.population(),
            grid: self.simulation.grid(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::grid::{pattern_blinker, pattern_block, Grid};

    /// Records what the loop hands to the presentation layer.
    #[derive(Default)]
    struct Recorder {
        frames: Vec<(u64, u64)>,
        announcements: Vec<u64>,
    }

    impl Renderer for Recorder {
        fn draw(&mut self, frame: &Frame<'_>) -> Result<()> {
            self.frames.push((frame.generation, frame.population));
            Ok(())
        }

        fn announce_stability(&mut self, onset: u64) -> Result<()> {
            self.announcements.push(onset);
            Ok(())
        }
    }

    fn settings(max_generations: Option<u64>, keep_running: bool) -> RunSettings {
        RunSettings {
            delay: Duration::ZERO,
            max_generations,
            keep_running,
        }
    }

    fn simulation_with(pattern: &[(usize, usize)], config: SimConfig) -> Simulation {
        let mut grid = Grid::new(6).unwrap();
        grid.place_pattern_centered(pattern).unwrap();
        grid.commit_all();
        Simulation::from_grid(config, grid).unwrap()
    }

    #[test]
    fn test_cycle_renders_before_stepping() {
        let sim = simulation_with(&pattern_blinker(), SimConfig::default());
        let mut app = App::new(sim, Recorder::default(), settings(None, false));
        let outcome = app.run_cycle().unwrap();
        assert!(matches!(outcome, CycleOutcome::Advanced(r) if r.generation == 1));
        assert_eq!(app.renderer().frames, vec![(0, 3)]);
    }

    #[test]
    fn test_paused_cycles_render_without_stepping() {
        let sim = simulation_with(&pattern_blinker(), SimConfig::default());
        let mut app = App::new(sim, Recorder::default(), settings(None, false));
        let control = app.control();
        control.toggle();
        assert!(!control.is_running());
        for _ in 0..3 {
            assert_eq!(app.run_cycle().unwrap(), CycleOutcome::Paused);
            assert_eq!(app.simulation().generation(), 0);
        }
        assert_eq!(app.renderer().frames.len(), 3);

        control.toggle();
        assert!(matches!(app.run_cycle().unwrap(), CycleOutcome::Advanced(_)));
        assert_eq!(app.simulation().generation(), 1);
        assert!(!control.is_stopped());
    }

    /// Pauses, resumes and stops the loop from inside the presentation layer.
    struct Scripted {
        control: RunControl,
        frames: Vec<u64>,
    }

    impl Renderer for Scripted {
        fn draw(&mut self, frame: &Frame<'_>) -> Result<()> {
            self.frames.push(frame.generation);
            match self.frames.len() {
                2 => self.control.pause(),
                5 => self.control.resume(),
                8 => self.control.stop(),
                _ => {}
            }
            Ok(())
        }

        fn announce_stability(&mut self, _onset: u64) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_run_survives_pause_and_resume() {
        let control = RunControl::new();
        let renderer = Scripted {
            control: control.clone(),
            frames: Vec::new(),
        };
        let sim = simulation_with(&pattern_blinker(), SimConfig::default());
        let mut app = App::new(sim, renderer, settings(None, false)).with_control(control);
        let summary = app.run().unwrap();

        // Three paused cycles redraw generation 1; the cycle that sees the
        // stop request still completes its step.
        assert_eq!(app.renderer().frames, vec![0, 1, 1, 1, 1, 2, 3, 4]);
        assert_eq!(summary.generations, 5);
        assert_eq!(summary.stability_onset, None);
    }

    #[test]
    fn test_display_cadence() {
        let config = SimConfig {
            display_cadence: 3,
            ..SimConfig::default()
        };
        let sim = simulation_with(&pattern_blinker(), config);
        let mut app = App::new(sim, Recorder::default(), settings(Some(7), false));
        app.run().unwrap();
        let drawn: Vec<u64> = app.renderer().frames.iter().map(|&(g, _)| g).collect();
        // Cycles at 0, 3 and 6, then the final frame at the cap.
        assert_eq!(drawn, vec![0, 3, 6, 7]);
    }

    #[test]
    fn test_run_stops_at_stability() {
        let config = SimConfig {
            stability_threshold: 5,
            ..SimConfig::default()
        };
        let sim = simulation_with(&pattern_block(), config);
        let mut app = App::new(sim, Recorder::default(), settings(Some(1_000), false));
        let summary = app.run().unwrap();
        assert_eq!(
            summary,
            RunSummary {
                generations: 6,
                population: 4,
                stability_onset: Some(1),
            }
        );
        assert_eq!(app.renderer().announcements, vec![1]);
    }

    #[test]
    fn test_keep_running_announces_once() {
        let config = SimConfig {
            stability_threshold: 5,
            ..SimConfig::default()
        };
        let sim = simulation_with(&pattern_blinker(), config);
        let mut app = App::new(sim, Recorder::default(), settings(Some(40), true));
        let summary = app.run().unwrap();
        assert_eq!(summary.generations, 40);
        assert_eq!(summary.population, 3);
        assert_eq!(app.into_renderer().announcements, vec![1]);
    }

    #[test]
    fn test_stopped_app_returns_immediately() {
        let sim = simulation_with(&pattern_block(), SimConfig::default());
        let mut app = App::new(sim, Recorder::default(), settings(None, false));
        app.control().stop();
        let summary = app.run().unwrap();
        assert_eq!(summary.generations, 0);
        assert_eq!(summary.stability_onset, None);
        assert!(app.renderer().frames.is_empty());
    }
}
