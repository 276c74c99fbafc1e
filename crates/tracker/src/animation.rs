//! Hover and selection animations.
//!
//! An animation first reveals the entry's path vertex by vertex (progress),
//! then loops a dash offset forever (stripes) until it is stopped. Each entry
//! has at most one animation, and at most one entry is selected.

use std::time::{Duration, Instant};

use indexmap::IndexMap;
use model::{path_length_km, Coordinate, LogEntry};
use utility::id::Id;

use crate::map::{LayerStyle, MapView};

pub const PROGRESS_MS_PER_KM: f64 = 200.0;
pub const MIN_PROGRESS: Duration = Duration::from_millis(500);
pub const MAX_PROGRESS: Duration = Duration::from_millis(2000);
pub const STRIPE_STEP_MS: f64 = 50.0;
pub const STRIPE_CYCLE: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPhase {
    None,
    Progress,
    Stripes,
}

/// Identifies one registration of an animation. A step carrying an older
/// token belongs to an animation that has since been stopped or restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    Stale,
    Progress { revealed: usize, progress: f64 },
    Stripes { dash_offset: f64 },
}

/// How long the progress phase takes for a path. A length that is not a
/// usable number falls back to the shortest duration.
pub fn progress_duration(coordinates: &[Coordinate]) -> Duration {
    let ms = path_length_km(coordinates) * PROGRESS_MS_PER_KM;
    Duration::try_from_secs_f64(ms / 1000.0)
        .unwrap_or(MIN_PROGRESS)
        .clamp(MIN_PROGRESS, MAX_PROGRESS)
}

pub fn revealed_vertices(progress: f64, total: usize) -> usize {
    ((progress.clamp(0.0, 1.0) * total as f64).ceil() as usize).min(total)
}

pub fn stripe_offset(elapsed: Duration) -> f64 {
    let elapsed_ms = elapsed.as_nanos() as f64 / 1_000_000.0;
    -((elapsed_ms / STRIPE_STEP_MS) % STRIPE_CYCLE)
}

#[derive(Debug)]
enum Phase {
    Progress { revealed: usize },
    Stripes,
}

#[derive(Debug)]
struct Animation {
    token: FrameToken,
    coordinates: Vec<Coordinate>,
    duration: Duration,
    phase: Phase,
    phase_started: Instant,
}

impl Animation {
    fn advance(&mut self, id: &Id<LogEntry>, now: Instant, map: &mut dyn MapView) -> StepOutcome {
        let elapsed = now.saturating_duration_since(self.phase_started);
        match self.phase {
            Phase::Progress { revealed } => {
                let progress =
                    (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0);
                let now_revealed = revealed_vertices(progress, self.coordinates.len());
                if now_revealed != revealed {
                    map.draw_overlay(id, &self.coordinates[..now_revealed], &LayerStyle::progress());
                }
                if progress >= 1.0 {
                    self.phase = Phase::Stripes;
                    self.phase_started = now;
                    log::trace!("{} fully drawn, marching stripes", id);
                    map.update_overlay_style(id, &LayerStyle::stripes(0.0));
                } else {
                    self.phase = Phase::Progress {
                        revealed: now_revealed,
                    };
                }
                StepOutcome::Progress {
                    revealed: now_revealed,
                    progress,
                }
            }
            Phase::Stripes => {
                let dash_offset = stripe_offset(elapsed);
                map.update_overlay_style(id, &LayerStyle::stripes(dash_offset));
                StepOutcome::Stripes { dash_offset }
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct AnimationController {
    animations: IndexMap<Id<LogEntry>, Animation>,
    selected: Option<Id<LogEntry>>,
    next_token: u64,
}

impl AnimationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_id(&self) -> Option<&Id<LogEntry>> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, id: &Id<LogEntry>) -> bool {
        self.selected.as_ref() == Some(id)
    }

    pub fn phase(&self, id: &Id<LogEntry>) -> AnimationPhase {
        match self.animations.get(id).map(|animation| &animation.phase) {
            None => AnimationPhase::None,
            Some(Phase::Progress { .. }) => AnimationPhase::Progress,
            Some(Phase::Stripes) => AnimationPhase::Stripes,
        }
    }

    pub fn token(&self, id: &Id<LogEntry>) -> Option<FrameToken> {
        self.animations.get(id).map(|animation| animation.token)
    }

    pub fn running(&self) -> usize {
        self.animations.len()
    }

    /// Makes `id` the selected entry, deselecting any other first. Selecting
    /// the already selected entry leaves its animation alone.
    pub fn select(
        &mut self,
        id: &Id<LogEntry>,
        coordinates: &[Coordinate],
        now: Instant,
        map: &mut dyn MapView,
    ) {
        if self.is_selected(id) {
            return;
        }
        self.deselect(map);
        self.selected = Some(id.clone());
        self.start_animation(id, coordinates, now, map);
    }

    pub fn deselect(&mut self, map: &mut dyn MapView) {
        if let Some(id) = self.selected.take() {
            self.stop_animation(&id, map);
        }
    }

    pub fn hover(
        &mut self,
        id: &Id<LogEntry>,
        coordinates: &[Coordinate],
        now: Instant,
        map: &mut dyn MapView,
    ) {
        if self.is_selected(id) {
            return;
        }
        self.start_animation(id, coordinates, now, map);
    }

    pub fn unhover(&mut self, id: &Id<LogEntry>, map: &mut dyn MapView) {
        if self.is_selected(id) {
            return;
        }
        self.stop_animation(id, map);
    }

    /// Starts a fresh animation for `id`, stopping a running one first.
    pub fn start_animation(
        &mut self,
        id: &Id<LogEntry>,
        coordinates: &[Coordinate],
        now: Instant,
        map: &mut dyn MapView,
    ) -> FrameToken {
        self.stop_animation(id, map);

        self.next_token += 1;
        let token = FrameToken(self.next_token);
        map.update_style(id, &LayerStyle::highlighted());
        self.animations.insert(
            id.clone(),
            Animation {
                token,
                coordinates: coordinates.to_vec(),
                duration: progress_duration(coordinates),
                phase: Phase::Progress { revealed: 0 },
                phase_started: now,
            },
        );
        token
    }

    /// Removes the animation's overlay and restores the muted base style.
    /// Returns false when nothing was running.
    pub fn stop_animation(&mut self, id: &Id<LogEntry>, map: &mut dyn MapView) -> bool {
        if self.animations.shift_remove(id).is_none() {
            return false;
        }
        map.remove_overlay(id);
        map.update_style(id, &LayerStyle::muted());
        true
    }

    /// Advances one animation, provided `token` is still the registered one.
    pub fn step(
        &mut self,
        id: &Id<LogEntry>,
        token: FrameToken,
        now: Instant,
        map: &mut dyn MapView,
    ) -> StepOutcome {
        match self.animations.get_mut(id) {
            Some(animation) if animation.token == token => animation.advance(id, now, map),
            _ => StepOutcome::Stale,
        }
    }

    /// Advances every running animation.
    pub fn frame(&mut self, now: Instant, map: &mut dyn MapView) {
        for (id, animation) in self.animations.iter_mut() {
            animation.advance(id, now, map);
        }
    }

    /// Tears down everything tied to an entry about to be deleted. A selected
    /// entry is deselected before anything else happens to it.
    pub fn forget(&mut self, id: &Id<LogEntry>, map: &mut dyn MapView) {
        if self.is_selected(id) {
            self.deselect(map);
        } else {
            self.stop_animation(id, map);
        }
    }
}
