//! Scene state machine bookkeeping
//!
//! `SceneClock` records which scene is active, the tick it was entered at and
//! an epoch that increases on every transition. `Timeline` replaces chained
//! wall-clock timers: actions are stamped with a due tick and the epoch they
//! were scheduled in, polled once per frame, and silently dropped once the
//! scene they belonged to has been left.

/// Active scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    /// Spinning letter title, waiting for a tap
    Title,
    /// Decorative cubes raining down between title and play
    Transitioning,
    /// The puzzle itself
    Playing,
    /// Cube reached the target at its original size
    Won,
    /// Cube shattered; shards fade while waiting for a restart
    Collapsing,
    /// Decorative rain between a collapse and a fresh attempt
    Restarting,
    /// Won cube knocked out of the sky by flipping the device
    Smashing { anchor_passed: bool },
}

impl Scene {
    pub fn name(&self) -> &'static str {
        match self {
            Scene::Title => "title",
            Scene::Transitioning => "transitioning",
            Scene::Playing => "playing",
            Scene::Won => "won",
            Scene::Collapsing => "collapsing",
            Scene::Restarting => "restarting",
            Scene::Smashing { .. } => "smashing",
        }
    }

    /// Scenes that show the current level's layout
    pub fn owns_level(&self) -> bool {
        matches!(
            self,
            Scene::Playing | Scene::Won | Scene::Collapsing | Scene::Smashing { .. }
        )
    }
}

/// Current scene plus when it was entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneClock {
    pub scene: Scene,
    pub entered_at: u64,
    pub epoch: u32,
}

impl SceneClock {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            entered_at: 0,
            epoch: 0,
        }
    }

    /// Switch scene; returns the new epoch
    pub fn enter(&mut self, scene: Scene, now: u64) -> u32 {
        self.scene = scene;
        self.entered_at = now;
        self.epoch = self.epoch.wrapping_add(1);
        self.epoch
    }

    /// Ticks spent in the current scene
    pub fn elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.entered_at)
    }
}

/// Deferred work polled by the frame loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimedAction {
    ShowMessage { text: String, duration: u64 },
    EnterScene(Scene),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Scheduled {
    due: u64,
    epoch: u32,
    action: TimedAction,
}

/// Tick-stamped action queue
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    entries: Vec<Scheduled>,
}

impl Timeline {
    /// Queue `action` to run `delay` ticks after `now`, owned by `epoch`
    pub fn schedule(&mut self, now: u64, delay: u64, epoch: u32, action: TimedAction) {
        self.entries.push(Scheduled {
            due: now + delay,
            epoch,
            action,
        });
    }

    /// Remove and return every action due at `now` for `epoch`, in due order
    ///
    /// Entries from other epochs are discarded. Actions due at the same tick
    /// keep their scheduling order.
    pub fn drain_due(&mut self, now: u64, epoch: u32) -> Vec<TimedAction> {
        self.entries.retain(|e| e.epoch == epoch);

        let mut due: Vec<Scheduled> = Vec::new();
        let mut pending = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            if entry.due <= now {
                due.push(entry);
            } else {
                pending.push(entry);
            }
        }
        self.entries = pending;

        due.sort_by_key(|e| e.due);
        due.into_iter().map(|e| e.action).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
