use crate::config::Settings;
use crate::error::{ActionError, StoreError};
use crate::model::{Band, ItemType, Meter, PetState, Rules, ShopItem, StatusMessage};
use crate::scheduler::{Scheduler, Task};
use crate::sim::{BattleOutcome, LevelTick, PlayerAction};
use crate::storage::{BlobStore, PersistenceManager};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

/// Owns the one pet, its timers and its save slot.
pub struct GameEngine<S: BlobStore> {
    state: PetState,
    rules: Rules,
    scheduler: Scheduler,
    persistence: PersistenceManager,
    store: S,
    rng: StdRng,
}

impl<S: BlobStore> GameEngine<S> {
    /// Restore the pet from `store` (or start fresh) and start all timers.
    pub fn new(store: S, settings: &Settings) -> Self {
        let rules = settings.rules.clone();
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let persistence = PersistenceManager::new(
            settings.save_key.clone(),
            Duration::from_millis(rules.save_coalesce_ms),
        );
        let mut state = persistence.load_or_default(&store);
        if state.check_critical() {
            log::info!("restored pet has an empty meter: game over");
        }

        let mut scheduler = Scheduler::from_rules(&rules);
        scheduler.start();

        let mut engine = Self {
            state,
            rules,
            scheduler,
            persistence,
            store,
            rng,
        };
        engine.sync_timers();
        engine
    }

    pub fn state(&self) -> &PetState {
        &self.state
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn status(&self) -> StatusMessage {
        self.state.status()
    }

    pub fn band(&self, meter: Meter) -> Band {
        Band::of(self.state.meter(meter))
    }

    pub fn can_afford(&self, cost: u64) -> bool {
        self.state.coins >= cost
    }

    /// Time the engine clock has advanced since start.
    pub fn elapsed(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn feed(&mut self) -> bool {
        self.act(PlayerAction::Feed).unwrap_or(false)
    }

    pub fn play(&mut self) -> bool {
        self.act(PlayerAction::Play).unwrap_or(false)
    }

    pub fn sleep(&mut self) -> bool {
        self.act(PlayerAction::Sleep).unwrap_or(false)
    }

    pub fn clean(&mut self) -> bool {
        self.act(PlayerAction::Clean).unwrap_or(false)
    }

    pub fn fight(&mut self) -> Option<BattleOutcome> {
        if !self.is_running() {
            return None;
        }
        let was_over = self.state.game_over;
        let outcome = self.state.fight(&self.rules, &mut self.rng)?;
        self.state.check_critical();
        self.after_change(was_over);
        Some(outcome)
    }

    pub fn buy_item(&mut self, item_type: ItemType, cost: u64) -> Result<(), ActionError> {
        self.act(PlayerAction::Buy(item_type, cost)).map(|_| ())
    }

    pub fn buy(&mut self, item: &ShopItem) -> Result<(), ActionError> {
        self.buy_item(item.item_type, item.cost)
    }

    pub fn restart(&mut self) {
        let _ = self.act(PlayerAction::Restart);
    }

    /// Route one intent. Ignored (`Ok(false)`) once the engine has shut down.
    pub fn act(&mut self, action: PlayerAction) -> Result<bool, ActionError> {
        if !self.is_running() {
            return Ok(false);
        }
        let was_over = self.state.game_over;
        let applied = self.state.apply(action, &self.rules, &mut self.rng)?;
        if applied {
            self.after_change(was_over);
        }
        Ok(applied)
    }

    /// Advance the clock by `dt`, firing every task that falls due in order.
    pub fn advance(&mut self, dt: Duration) {
        if !self.is_running() {
            return;
        }
        let deadline = self.scheduler.now() + dt;
        while let Some(task) = self.scheduler.pop_due(deadline) {
            self.run_task(task);
        }
        self.scheduler.settle(deadline);

        if self.persistence.flush_due(self.scheduler.now()) {
            self.flush();
        }
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::Decay => {
                let was_over = self.state.game_over;
                if self.state.decay_tick() {
                    self.after_change(was_over);
                }
            }
            Task::LevelProgress => match self.state.level_tick(&self.rules) {
                LevelTick::Idle => {}
                LevelTick::Progressed => self.persistence.mark_dirty(self.scheduler.now()),
                LevelTick::LeveledUp { level } => {
                    log::info!(
                        "level up: now level {level}, decay rate {}",
                        self.state.decay_rate
                    );
                    self.persistence.mark_dirty(self.scheduler.now());
                }
            },
            Task::Autosave => self.flush(),
        }
    }

    fn after_change(&mut self, was_over: bool) {
        self.persistence.mark_dirty(self.scheduler.now());
        match (was_over, self.state.game_over) {
            (false, true) => log::info!("game over at level {}", self.state.level),
            (true, false) => log::info!("pet restarted"),
            _ => {}
        }
        self.sync_timers();
    }

    fn sync_timers(&mut self) {
        self.scheduler.set_enabled(Task::Decay, !self.state.game_over);
    }

    fn flush(&mut self) {
        if let Err(e) = self.save_now() {
            log::warn!("autosave failed: {e}");
        }
    }

    /// Write the persisted subset now.
    pub fn save_now(&mut self) -> Result<(), StoreError> {
        self.persistence.save(&mut self.store, &self.state)
    }

    /// Stop every timer and write once more. Later calls are no-ops.
    pub fn shutdown(&mut self) -> Result<(), StoreError> {
        if !self.is_running() {
            return Ok(());
        }
        self.scheduler.stop();
        log::info!("shutting down after {:?}", self.scheduler.now());
        self.save_now()
    }

    /// Stop the engine and hand back the store.
    pub fn into_store(mut self) -> Result<S, StoreError> {
        self.shutdown()?;
        Ok(self.store)
    }
}
