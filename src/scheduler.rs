//! Named periodic tasks on one cooperative clock.
//!
//! Nothing here sleeps or spawns. The owner feeds elapsed time in and pulls
//! due tasks out one at a time, running each to completion before asking for
//! the next, so every task observes the effects of the ones before it.

use crate::model::Rules;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    Decay,
    LevelProgress,
    Autosave,
}

#[derive(Clone, Debug)]
struct Timer {
    task: Task,
    period: Duration,
    next_due: Duration,
    enabled: bool,
}

#[derive(Clone, Debug)]
pub struct Scheduler {
    now: Duration,
    timers: Vec<Timer>,
    running: bool,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            timers: Vec::new(),
            running: false,
        }
    }

    /// The three game timers, registered in tie-break order.
    pub fn from_rules(rules: &Rules) -> Self {
        let mut s = Self::new();
        s.register(Task::Decay, Duration::from_millis(rules.decay_interval_ms));
        s.register(Task::LevelProgress, Duration::from_millis(rules.level_interval_ms));
        s.register(Task::Autosave, Duration::from_millis(rules.autosave_interval_ms));
        s
    }

    /// Register a task firing every `period`, first at `now + period`.
    /// A zero period is bumped to one millisecond.
    pub fn register(&mut self, task: Task, period: Duration) {
        let period = period.max(Duration::from_millis(1));
        self.timers.retain(|t| t.task != task);
        self.timers.push(Timer {
            task,
            period,
            next_due: self.now + period,
            enabled: true,
        });
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Tear down: no task fires after this.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_enabled(&self, task: Task) -> bool {
        self.timers.iter().any(|t| t.task == task && t.enabled)
    }

    /// Suspend or re-arm a task. Re-arming starts a fresh period from now.
    pub fn set_enabled(&mut self, task: Task, enabled: bool) {
        let now = self.now;
        for t in self.timers.iter_mut().filter(|t| t.task == task) {
            if enabled && !t.enabled {
                t.next_due = now + t.period;
            }
            t.enabled = enabled;
        }
    }

    /// Pop the earliest task due at or before `deadline`, moving the clock to
    /// its firing time. Ties go to the task registered first.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<Task> {
        if !self.running {
            return None;
        }
        let timer = self
            .timers
            .iter_mut()
            .filter(|t| t.enabled && t.next_due <= deadline)
            .min_by_key(|t| t.next_due)?;
        let fired_at = timer.next_due;
        timer.next_due += timer.period;
        self.now = self.now.max(fired_at);
        Some(timer.task)
    }

    /// Move the clock forward to `deadline` once all due tasks have been popped.
    pub fn settle(&mut self, deadline: Duration) {
        if self.running {
            self.now = self.now.max(deadline);
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
