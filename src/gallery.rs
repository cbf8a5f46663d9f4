//! Page-level sketch registry
//!
//! Maps container ids to sketch kinds and mounts each sketch lazily, the first
//! time its container is activated. Only the active sketch runs; the rest are
//! paused. A missing container disables its entry and nothing else.

use crate::config::GalleryConfig;
use crate::driver::{FrameDriver, LoopState};
use crate::error::{Result, SketchError};
use crate::input::FrameInput;
use crate::layout::Viewport;
use crate::renderer::{Canvas, Palette};
use crate::settings::{Settings, Theme};
use crate::sketch::{Features, SketchKind};

/// Size of a page container as reported by the host
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerInfo {
    pub id: String,
    pub width: f32,
    pub height: f32,
}

/// Page services the gallery needs
pub trait Host {
    /// `None` when the page has no element with this id
    fn container(&self, id: &str) -> Option<ContainerInfo>;
}

struct MountedEntry {
    driver: FrameDriver,
    features: Features,
    viewport: Viewport,
}

enum Slot {
    Pending,
    Mounted(Box<MountedEntry>),
    Disabled(SketchError),
}

struct Entry {
    container_id: String,
    kind: SketchKind,
    slot: Slot,
}

/// What the host sees of one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Registered, not mounted yet
    Pending,
    Running,
    Paused,
    Halted,
    Disabled,
}

pub struct Gallery {
    config: GalleryConfig,
    settings: Settings,
    palette: Palette,
    entries: Vec<Entry>,
    active: Option<usize>,
    seed: u64,
}

impl Gallery {
    pub fn new(config: GalleryConfig, settings: Settings) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let entries = config
            .sketches
            .iter()
            .map(|e| Entry {
                container_id: e.container_id.clone(),
                kind: e.kind,
                slot: Slot::Pending,
            })
            .collect();
        log::info!(
            "Gallery: {} sketches registered (seed {})",
            config.sketches.len(),
            seed
        );
        Self {
            palette: Palette::for_theme(settings.theme),
            config,
            settings,
            entries,
            active: None,
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Per-sketch seed: stable for a given base seed and registry position
    pub fn seed_for(&self, index: usize) -> u64 {
        self.seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.container_id.as_str())
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.map(|i| self.entries[i].container_id.as_str())
    }

    pub fn kind(&self, id: &str) -> Option<SketchKind> {
        self.index_of(id).map(|i| self.entries[i].kind)
    }

    pub fn state(&self, id: &str) -> Option<EntryState> {
        let entry = &self.entries[self.index_of(id)?];
        Some(match &entry.slot {
            Slot::Pending => EntryState::Pending,
            Slot::Disabled(_) => EntryState::Disabled,
            Slot::Mounted(m) => match m.driver.state() {
                LoopState::Running => EntryState::Running,
                LoopState::Paused => EntryState::Paused,
                LoopState::Halted => EntryState::Halted,
            },
        })
    }

    /// Why an entry is disabled or halted
    pub fn error(&self, id: &str) -> Option<&SketchError> {
        match &self.entries[self.index_of(id)?].slot {
            Slot::Disabled(err) => Some(err),
            Slot::Mounted(m) => m.driver.last_error(),
            Slot::Pending => None,
        }
    }

    pub fn features(&self, id: &str) -> Option<&Features> {
        match &self.entries[self.index_of(id)?].slot {
            Slot::Mounted(m) => Some(&m.features),
            _ => None,
        }
    }

    pub fn viewport(&self, id: &str) -> Option<Viewport> {
        match &self.entries[self.index_of(id)?].slot {
            Slot::Mounted(m) => Some(m.viewport),
            _ => None,
        }
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.container_id == id)
    }

    /// Mount an entry if it is still pending; mounted sketches start paused
    pub fn mount(&mut self, id: &str, host: &dyn Host) -> Result<()> {
        let index = self
            .index_of(id)
            .ok_or_else(|| SketchError::ContainerNotFound(id.to_owned()))?;
        self.mount_index(index, host)
    }

    fn mount_index(&mut self, index: usize, host: &dyn Host) -> Result<()> {
        let seed = self.seed_for(index);
        let entry = &mut self.entries[index];
        match &entry.slot {
            Slot::Mounted(_) => return Ok(()),
            Slot::Disabled(err) => return Err(err.clone()),
            Slot::Pending => {}
        }

        let Some(info) = host.container(&entry.container_id) else {
            log::warn!("Container '{}' not found, {:?} disabled", entry.container_id, entry.kind);
            let err = SketchError::ContainerNotFound(entry.container_id.clone());
            entry.slot = Slot::Disabled(err.clone());
            return Err(err);
        };

        let viewport = entry.kind.viewport_for(info.width, info.height);
        match entry.kind.init(viewport, &self.config, &self.settings, seed) {
            Ok(mounted) => {
                let mut driver = FrameDriver::new(mounted.sketch, self.palette.clone());
                driver.set_show_fps(self.settings.show_fps);
                driver.pause();
                entry.slot = Slot::Mounted(Box::new(MountedEntry {
                    driver,
                    features: mounted.features,
                    viewport,
                }));
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to mount '{}': {}", entry.container_id, err);
                entry.slot = Slot::Disabled(err.clone());
                Err(err)
            }
        }
    }

    /// Mount every pending entry; returns the ids that ended up disabled
    pub fn mount_all(&mut self, host: &dyn Host) -> Vec<String> {
        let mut disabled = Vec::new();
        for i in 0..self.entries.len() {
            if self.mount_index(i, host).is_err() {
                disabled.push(self.entries[i].container_id.clone());
            }
        }
        disabled
    }

    /// Make `id` the one running sketch, mounting it on first use
    pub fn activate(&mut self, id: &str, host: &dyn Host) -> Result<()> {
        let index = self
            .index_of(id)
            .ok_or_else(|| SketchError::ContainerNotFound(id.to_owned()))?;
        if self.active == Some(index) {
            return Ok(());
        }
        self.mount_index(index, host)?;

        for (i, entry) in self.entries.iter_mut().enumerate() {
            if let Slot::Mounted(m) = &mut entry.slot {
                if i == index {
                    m.driver.resume();
                } else {
                    m.driver.pause();
                }
            }
        }
        self.active = Some(index);
        log::info!("Active sketch: {}", id);
        Ok(())
    }

    /// Pause `id`; clears the active slot if it was the active sketch
    pub fn deactivate(&mut self, id: &str) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        if let Slot::Mounted(m) = &mut self.entries[index].slot {
            m.driver.pause();
        }
        if self.active == Some(index) {
            self.active = None;
        }
    }

    /// Page hidden
    pub fn pause_all(&mut self) {
        for entry in &mut self.entries {
            if let Slot::Mounted(m) = &mut entry.slot {
                m.driver.pause();
            }
        }
    }

    /// Page visible again
    pub fn resume_active(&mut self) {
        if let Some(index) = self.active {
            if let Slot::Mounted(m) = &mut self.entries[index].slot {
                m.driver.resume();
            }
        }
    }

    /// Re-measure every mounted container; returns ids whose viewport changed
    pub fn resize(&mut self, host: &dyn Host) -> Vec<String> {
        let mut changed = Vec::new();
        for entry in &mut self.entries {
            let Slot::Mounted(m) = &mut entry.slot else {
                continue;
            };
            let Some(info) = host.container(&entry.container_id) else {
                continue;
            };
            let viewport = entry.kind.viewport_for(info.width, info.height);
            if viewport != m.viewport {
                m.viewport = viewport;
                m.driver.resize(viewport);
                changed.push(entry.container_id.clone());
            }
        }
        changed
    }

    /// Drive the active sketch for one display frame
    pub fn frame_active(&mut self, input: &FrameInput, canvas: &mut dyn Canvas) -> Option<LoopState> {
        let index = self.active?;
        match &mut self.entries[index].slot {
            Slot::Mounted(m) => Some(m.driver.frame(input, canvas)),
            _ => None,
        }
    }

    /// Re-render one sketch without stepping (after a theme switch)
    pub fn redraw(&mut self, id: &str, canvas: &mut dyn Canvas) -> Option<LoopState> {
        let index = self.index_of(id)?;
        match &mut self.entries[index].slot {
            Slot::Mounted(m) => Some(m.driver.redraw(canvas)),
            _ => None,
        }
    }

    pub fn theme(&self) -> Theme {
        self.settings.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if theme == self.settings.theme {
            return;
        }
        self.settings.theme = theme;
        self.palette = Palette::for_theme(theme);
        for entry in &mut self.entries {
            if let Slot::Mounted(m) = &mut entry.slot {
                m.driver.set_palette(self.palette.clone());
            }
        }
        log::info!("Theme: {}", theme.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SketchEntry;
    use crate::consts::FRAME_DT;
    use crate::renderer::DrawList;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeHost {
        sizes: HashMap<String, (f32, f32)>,
    }

    impl FakeHost {
        fn with(ids: &[&str]) -> Self {
            Self {
                sizes: ids.iter().map(|id| (id.to_string(), (640.0, 480.0))).collect(),
            }
        }
    }

    impl Host for FakeHost {
        fn container(&self, id: &str) -> Option<ContainerInfo> {
            self.sizes.get(id).map(|&(width, height)| ContainerInfo {
                id: id.to_owned(),
                width,
                height,
            })
        }
    }

    fn gallery() -> Gallery {
        let config = GalleryConfig {
            seed: Some(99),
            sketches: vec![
                SketchEntry::new(SketchKind::Gravity),
                SketchEntry::new(SketchKind::Phasor),
                SketchEntry::new(SketchKind::Bounce),
            ],
            ..GalleryConfig::default()
        };
        Gallery::new(config, Settings::default())
    }

    #[test]
    fn test_entries_mount_lazily() {
        let mut g = gallery();
        let host = FakeHost::with(&["sketch-gravity", "sketch-phasor", "sketch-bounce"]);
        assert_eq!(g.state("sketch-phasor"), Some(EntryState::Pending));
        g.activate("sketch-phasor", &host).unwrap();
        assert_eq!(g.state("sketch-phasor"), Some(EntryState::Running));
        assert_eq!(g.state("sketch-gravity"), Some(EntryState::Pending));
        assert_eq!(g.active_id(), Some("sketch-phasor"));
        assert_eq!(g.viewport("sketch-phasor"), Some(Viewport::new(640.0, 450.0)));
    }

    #[test]
    fn test_activate_pauses_others_and_is_idempotent() {
        let mut g = gallery();
        let host = FakeHost::with(&["sketch-gravity", "sketch-phasor", "sketch-bounce"]);
        g.activate("sketch-gravity", &host).unwrap();
        g.activate("sketch-bounce", &host).unwrap();
        assert_eq!(g.state("sketch-gravity"), Some(EntryState::Paused));
        assert_eq!(g.state("sketch-bounce"), Some(EntryState::Running));
        g.activate("sketch-bounce", &host).unwrap();
        assert_eq!(g.state("sketch-bounce"), Some(EntryState::Running));
    }

    #[test]
    fn test_missing_container_disables_only_that_entry() {
        let mut g = gallery();
        let host = FakeHost::with(&["sketch-gravity", "sketch-bounce"]);
        let err = g.activate("sketch-phasor", &host).unwrap_err();
        assert_eq!(err, SketchError::ContainerNotFound("sketch-phasor".into()));
        assert_eq!(g.state("sketch-phasor"), Some(EntryState::Disabled));
        assert_eq!(g.active_id(), None);

        assert_eq!(g.mount_all(&host), vec!["sketch-phasor".to_string()]);
        assert_eq!(g.state("sketch-gravity"), Some(EntryState::Paused));
        g.activate("sketch-gravity", &host).unwrap();
        let mut canvas = DrawList::new(Viewport::default());
        assert_eq!(
            g.frame_active(&FrameInput::with_dt(FRAME_DT), &mut canvas),
            Some(LoopState::Running)
        );
        assert!(!canvas.is_empty());
    }

    #[test]
    fn test_pause_all_and_resume_active() {
        let mut g = gallery();
        let host = FakeHost::with(&["sketch-gravity", "sketch-phasor", "sketch-bounce"]);
        g.mount_all(&host);
        g.activate("sketch-phasor", &host).unwrap();
        g.pause_all();
        g.pause_all();
        assert_eq!(g.state("sketch-phasor"), Some(EntryState::Paused));
        let mut canvas = DrawList::new(Viewport::default());
        assert_eq!(
            g.frame_active(&FrameInput::with_dt(FRAME_DT), &mut canvas),
            Some(LoopState::Paused)
        );
        assert!(canvas.is_empty());

        g.resume_active();
        assert_eq!(g.state("sketch-phasor"), Some(EntryState::Running));
        assert_eq!(g.state("sketch-gravity"), Some(EntryState::Paused));
    }

    #[test]
    fn test_deactivate_clears_active() {
        let mut g = gallery();
        let host = FakeHost::with(&["sketch-gravity"]);
        g.activate("sketch-gravity", &host).unwrap();
        g.deactivate("sketch-gravity");
        assert_eq!(g.active_id(), None);
        assert_eq!(g.state("sketch-gravity"), Some(EntryState::Paused));
        let mut canvas = DrawList::new(Viewport::default());
        assert_eq!(g.frame_active(&FrameInput::with_dt(FRAME_DT), &mut canvas), None);
    }

    #[test]
    fn test_resize_reports_changed_viewports() {
        let mut g = gallery();
        let mut host = FakeHost::with(&["sketch-gravity", "sketch-phasor", "sketch-bounce"]);
        g.mount_all(&host);
        assert!(g.resize(&host).is_empty());

        host.sizes.insert("sketch-bounce".into(), (0.0, 0.0));
        let changed = g.resize(&host);
        assert_eq!(changed, vec!["sketch-bounce".to_string()]);
        assert_eq!(g.viewport("sketch-bounce"), Some(Viewport::new(600.0, 400.0)));
    }

    #[test]
    fn test_seeds_are_stable_and_distinct() {
        let g = gallery();
        assert_eq!(g.seed(), 99);
        assert_eq!(g.seed_for(0), gallery().seed_for(0));
        assert_ne!(g.seed_for(0), g.seed_for(1));
    }

    #[test]
    fn test_theme_switch_reaches_drivers() {
        let mut g = gallery();
        let host = FakeHost::with(&["sketch-phasor"]);
        g.activate("sketch-phasor", &host).unwrap();
        g.set_theme(Theme::Dark);
        assert_eq!(g.theme(), Theme::Dark);
        let mut canvas = DrawList::new(Viewport::default());
        g.redraw("sketch-phasor", &mut canvas);
        assert_eq!(
            canvas.commands()[0],
            crate::renderer::DrawCmd::Clear(Palette::dark().background)
        );
    }

    #[test]
    fn test_unknown_id() {
        let mut g = gallery();
        let host = FakeHost::default();
        assert!(g.activate("nope", &host).is_err());
        assert_eq!(g.state("nope"), None);
        assert_eq!(g.kind("sketch-bounce"), Some(SketchKind::Bounce));
    }
}
