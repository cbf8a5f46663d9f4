//! Frame driver: fixed-step updates, one render per frame, pause and halt
//!
//! The host calls `frame` once per display refresh. Time is accumulated and
//! consumed in `FRAME_DT` steps (at most `MAX_SUBSTEPS` per frame). Any error
//! or panic from a sketch callback is logged and halts the loop for good.

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::consts::{FRAME_DT, MAX_FRAME_DT, MAX_SUBSTEPS};
use crate::error::{Result, SketchError};
use crate::input::FrameInput;
use crate::layout::Viewport;
use crate::renderer::{Align, Canvas, Palette};
use crate::sketch::Sketch;

/// Loop lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// Stopped by the host (off-screen, hidden tab); resumable
    Paused,
    /// Stopped after a callback failure; terminal
    Halted,
}

/// Exponentially smoothed frames per second
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FpsCounter {
    fps: f32,
}

impl FpsCounter {
    const SMOOTHING: f32 = 0.1;

    /// Feed one display-frame delta; zero, negative and non-finite deltas are skipped
    pub fn record(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let sample = 1.0 / dt;
        self.fps = if self.fps == 0.0 {
            sample
        } else {
            self.fps + (sample - self.fps) * Self::SMOOTHING
        };
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

pub struct FrameDriver {
    sketch: Box<dyn Sketch>,
    state: LoopState,
    accumulator: f32,
    /// Input carried into the next substep; one-shots survive frames with no substep
    pending: FrameInput,
    palette: Palette,
    last_error: Option<SketchError>,
    /// Fixed steps run so far
    steps: u64,
    fps: FpsCounter,
    show_fps: bool,
}

impl FrameDriver {
    pub fn new(sketch: Box<dyn Sketch>, palette: Palette) -> Self {
        Self {
            sketch,
            state: LoopState::Running,
            accumulator: 0.0,
            pending: FrameInput::with_dt(FRAME_DT),
            palette,
            last_error: None,
            steps: 0,
            fps: FpsCounter::default(),
            show_fps: false,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn last_error(&self) -> Option<&SketchError> {
        self.last_error.as_ref()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn sketch(&self) -> &dyn Sketch {
        self.sketch.as_ref()
    }

    pub fn fps(&self) -> f32 {
        self.fps.fps()
    }

    /// Overlay the frame rate after each render
    pub fn set_show_fps(&mut self, show: bool) {
        self.show_fps = show;
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Stop updating and rendering; no-op unless running
    pub fn pause(&mut self) {
        if self.state == LoopState::Running {
            self.state = LoopState::Paused;
            log::debug!("{}: paused", self.sketch.name());
        }
    }

    /// Continue from a pause on the next frame; a halted loop stays halted
    pub fn resume(&mut self) {
        match self.state {
            LoopState::Paused => {
                // Time spent paused is not simulated
                self.accumulator = 0.0;
                self.state = LoopState::Running;
                log::debug!("{}: resumed", self.sketch.name());
            }
            LoopState::Running => {}
            LoopState::Halted => {
                log::warn!("{}: cannot resume a halted sketch", self.sketch.name());
            }
        }
    }

    /// Run due updates, then render once
    pub fn frame(&mut self, input: &FrameInput, canvas: &mut dyn Canvas) -> LoopState {
        if self.state != LoopState::Running {
            return self.state;
        }

        self.merge_input(input);
        self.fps.record(input.dt);
        let dt = if input.dt.is_finite() { input.dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= FRAME_DT && substeps < MAX_SUBSTEPS {
            let step_input = FrameInput {
                dt: FRAME_DT,
                ..self.pending.clone()
            };
            let name = self.sketch.name();
            let sketch = &mut self.sketch;
            if let Err(err) = guard(name, || sketch.update(&step_input)) {
                self.halt("update", err);
                return self.state;
            }
            self.accumulator -= FRAME_DT;
            self.steps += 1;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.pending.consume_one_shots();
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(FRAME_DT);
        }

        self.render(canvas);
        self.state
    }

    /// Draw the current state without stepping (theme change while running)
    pub fn redraw(&mut self, canvas: &mut dyn Canvas) -> LoopState {
        if self.state == LoopState::Running {
            self.render(canvas);
        }
        self.state
    }

    /// Forward a viewport change; failures halt like any other callback
    pub fn resize(&mut self, viewport: Viewport) {
        if self.state == LoopState::Halted {
            return;
        }
        let name = self.sketch.name();
        let sketch = &mut self.sketch;
        let result = guard(name, || {
            sketch.resize(viewport);
            Ok(())
        });
        if let Err(err) = result {
            self.halt("resize", err);
        }
    }

    fn render(&mut self, canvas: &mut dyn Canvas) {
        let name = self.sketch.name();
        let sketch = &self.sketch;
        let palette = &self.palette;
        if let Err(err) = guard(name, || sketch.render(canvas, palette)) {
            self.halt("render", err);
            return;
        }
        if self.show_fps {
            let pos = glam::Vec2::new(canvas.viewport().width - 8.0, 8.0);
            let label = format!("{:.0} fps", self.fps.fps());
            if let Err(err) = canvas.text(pos, &label, 10.0, self.palette.text_muted, Align::Right) {
                self.halt("render", err);
            }
        }
    }

    fn merge_input(&mut self, input: &FrameInput) {
        self.pending.pointer = input.pointer;
        self.pending.sliders.clone_from(&input.sliders);
        self.pending.pressed |= input.pressed;
        if input.key.is_some() {
            self.pending.key = input.key;
        }
    }

    fn halt(&mut self, stage: &str, err: SketchError) {
        log::error!("{}: {} failed, halting: {}", self.sketch.name(), stage, err);
        self.state = LoopState::Halted;
        self.last_error = Some(err);
    }
}

/// Run a callback, turning a panic into `SketchError::Panicked`
fn guard(name: &str, f: impl FnOnce() -> Result<()>) -> Result<()> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_owned());
            Err(SketchError::Panicked(format!("{}: {}", name, msg)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCmd, DrawList};
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        updates: u32,
        renders: u32,
        clicks: u32,
        keys: Vec<char>,
    }

    enum Fail {
        Never,
        UpdateErr(u32),
        UpdatePanic(u32),
        RenderErr,
    }

    struct Recorder {
        log: Rc<RefCell<Log>>,
        fail: Fail,
    }

    impl Sketch for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn update(&mut self, input: &FrameInput) -> Result<()> {
            let mut log = self.log.borrow_mut();
            log.updates += 1;
            if input.click().is_some() {
                log.clicks += 1;
            }
            if let Some(k) = input.key {
                log.keys.push(k);
            }
            match self.fail {
                Fail::UpdateErr(n) if log.updates == n => Err(SketchError::NonFinite("recorder")),
                Fail::UpdatePanic(n) if log.updates == n => panic!("recorder blew up"),
                _ => Ok(()),
            }
        }

        fn render(&self, canvas: &mut dyn Canvas, _palette: &Palette) -> Result<()> {
            self.log.borrow_mut().renders += 1;
            if matches!(self.fail, Fail::RenderErr) {
                return Err(SketchError::Render("no context".into()));
            }
            canvas.clear(crate::renderer::Color::BLACK)
        }

        fn resize(&mut self, _viewport: Viewport) {}
    }

    fn driver(fail: Fail) -> (FrameDriver, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let recorder = Recorder {
            log: Rc::clone(&log),
            fail,
        };
        (FrameDriver::new(Box::new(recorder), Palette::default()), log)
    }

    fn canvas() -> DrawList {
        DrawList::new(Viewport::default())
    }

    #[test]
    fn test_one_update_per_fixed_step() {
        let (mut d, log) = driver(Fail::Never);
        let mut c = canvas();
        for _ in 0..10 {
            d.frame(&FrameInput::with_dt(FRAME_DT), &mut c);
        }
        assert_eq!(log.borrow().updates, 10);
        assert_eq!(log.borrow().renders, 10);
        assert_eq!(d.steps(), 10);
    }

    #[test]
    fn test_long_frame_is_capped() {
        let (mut d, log) = driver(Fail::Never);
        let mut c = canvas();
        d.frame(&FrameInput::with_dt(5.0), &mut c);
        assert_eq!(log.borrow().updates, MAX_SUBSTEPS);
        // Backlog is dropped: a normal frame afterwards runs at most two steps
        d.frame(&FrameInput::with_dt(FRAME_DT), &mut c);
        assert!(log.borrow().updates <= MAX_SUBSTEPS + 2);
    }

    #[test]
    fn test_one_shots_reach_exactly_one_step() {
        let (mut d, log) = driver(Fail::Never);
        let mut c = canvas();
        let input = FrameInput {
            pointer: Some(Vec2::ONE),
            pressed: true,
            key: Some('r'),
            dt: FRAME_DT * 3.5,
            ..FrameInput::default()
        };
        d.frame(&input, &mut c);
        assert_eq!(log.borrow().updates, 3);
        assert_eq!(log.borrow().clicks, 1);
        assert_eq!(log.borrow().keys, vec!['r']);
    }

    #[test]
    fn test_click_survives_frame_without_step() {
        let (mut d, log) = driver(Fail::Never);
        let mut c = canvas();
        let click = FrameInput {
            pointer: Some(Vec2::ONE),
            pressed: true,
            dt: FRAME_DT * 0.25,
            ..FrameInput::default()
        };
        d.frame(&click, &mut c);
        assert_eq!(log.borrow().updates, 0);
        let hover = FrameInput {
            pointer: Some(Vec2::ONE),
            ..FrameInput::with_dt(FRAME_DT)
        };
        d.frame(&hover, &mut c);
        assert_eq!(log.borrow().clicks, 1);
        d.frame(&hover, &mut c);
        assert_eq!(log.borrow().clicks, 1);
    }

    #[test]
    fn test_pause_is_idempotent_and_resume_immediate() {
        let (mut d, log) = driver(Fail::Never);
        let mut c = canvas();
        d.pause();
        d.pause();
        assert_eq!(d.state(), LoopState::Paused);
        assert_eq!(d.frame(&FrameInput::with_dt(FRAME_DT), &mut c), LoopState::Paused);
        assert_eq!(log.borrow().updates, 0);
        assert_eq!(log.borrow().renders, 0);

        d.resume();
        d.resume();
        assert!(d.is_running());
        d.frame(&FrameInput::with_dt(FRAME_DT), &mut c);
        assert_eq!(log.borrow().updates, 1);
    }

    #[test]
    fn test_update_error_halts_for_good() {
        let (mut d, log) = driver(Fail::UpdateErr(3));
        let mut c = canvas();
        for _ in 0..10 {
            d.frame(&FrameInput::with_dt(FRAME_DT), &mut c);
        }
        assert_eq!(d.state(), LoopState::Halted);
        assert_eq!(d.last_error(), Some(&SketchError::NonFinite("recorder")));
        assert_eq!(log.borrow().updates, 3);
        // Halted frame is not rendered
        assert_eq!(log.borrow().renders, 2);

        d.resume();
        assert_eq!(d.state(), LoopState::Halted);
        d.pause();
        assert_eq!(d.state(), LoopState::Halted);
    }

    #[test]
    fn test_panic_is_caught_and_halts() {
        let (mut d, log) = driver(Fail::UpdatePanic(1));
        let mut c = canvas();
        assert_eq!(d.frame(&FrameInput::with_dt(FRAME_DT), &mut c), LoopState::Halted);
        match d.last_error() {
            Some(SketchError::Panicked(msg)) => assert!(msg.contains("recorder blew up")),
            other => panic!("unexpected {:?}", other),
        }
        d.frame(&FrameInput::with_dt(FRAME_DT), &mut c);
        assert_eq!(log.borrow().updates, 1);
    }

    #[test]
    fn test_render_error_halts() {
        let (mut d, log) = driver(Fail::RenderErr);
        let mut c = canvas();
        d.frame(&FrameInput::with_dt(FRAME_DT), &mut c);
        d.frame(&FrameInput::with_dt(FRAME_DT), &mut c);
        assert_eq!(d.state(), LoopState::Halted);
        assert_eq!(log.borrow().renders, 1);
        assert_eq!(log.borrow().updates, 1);
    }

    #[test]
    fn test_non_finite_dt_is_ignored() {
        let (mut d, log) = driver(Fail::Never);
        let mut c = canvas();
        d.frame(&FrameInput::with_dt(f32::NAN), &mut c);
        d.frame(&FrameInput::with_dt(-1.0), &mut c);
        assert_eq!(log.borrow().updates, 0);
        assert_eq!(log.borrow().renders, 2);
    }

    #[test]
    fn test_fps_counter_smooths_and_skips_bad_deltas() {
        let mut fps = FpsCounter::default();
        fps.record(0.0);
        fps.record(f32::NAN);
        assert_eq!(fps.fps(), 0.0);
        fps.record(1.0 / 50.0);
        assert!((fps.fps() - 50.0).abs() < 1e-3);
        fps.record(1.0 / 100.0);
        assert!((fps.fps() - 55.0).abs() < 1e-2);
    }

    #[test]
    fn test_fps_overlay_only_when_enabled() {
        let is_fps = |cmd: &DrawCmd| matches!(cmd, DrawCmd::Text { text, .. } if text.ends_with("fps"));
        let (mut d, _log) = driver(Fail::Never);
        let mut c = canvas();
        d.frame(&FrameInput::with_dt(FRAME_DT), &mut c);
        assert_eq!(c.count(is_fps), 0);

        d.set_show_fps(true);
        c.clear_commands();
        d.frame(&FrameInput::with_dt(FRAME_DT), &mut c);
        assert_eq!(c.count(is_fps), 1);
        assert!((d.fps() - 60.0).abs() < 0.5);
    }
}
