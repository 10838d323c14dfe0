use crate::error::ActionError;
use crate::model::{ItemType, Meter, PetState, Rules};
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlayerAction {
    Feed,
    Play,
    Sleep,
    Clean,
    Fight,
    Buy(ItemType, u64),
    Restart,
}

impl PlayerAction {
    /// Whether the action can touch a meter, so the critical check must follow.
    fn touches_meters(self) -> bool {
        !matches!(self, PlayerAction::Restart)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BattleOutcome {
    Won { coins: u64 },
    Lost { health_lost: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelTick {
    Idle,
    Progressed,
    LeveledUp { level: u32 },
}

impl PetState {
    /// Route one intent. Returns `Ok(false)` when the intent was ignored.
    pub fn apply<R: Rng>(
        &mut self,
        action: PlayerAction,
        rules: &Rules,
        rng: &mut R,
    ) -> Result<bool, ActionError> {
        let applied = match action {
            PlayerAction::Feed => self.feed(),
            PlayerAction::Play => self.play(),
            PlayerAction::Sleep => self.sleep(),
            PlayerAction::Clean => self.clean(),
            PlayerAction::Fight => self.fight(rules, rng).is_some(),
            PlayerAction::Buy(item_type, cost) => {
                self.buy_item(item_type, cost, rules)?;
                true
            }
            PlayerAction::Restart => {
                self.restart();
                true
            }
        };
        if applied && action.touches_meters() {
            self.check_critical();
        }
        Ok(applied)
    }

    pub fn feed(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.adjust(Meter::Hunger, 20.0);
        self.adjust(Meter::Health, 5.0);
        self.adjust(Meter::Energy, -5.0);
        true
    }

    pub fn play(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.adjust(Meter::Happiness, 20.0);
        self.adjust(Meter::Hunger, -5.0);
        self.adjust(Meter::Health, -5.0);
        self.adjust(Meter::Energy, -10.0);
        true
    }

    pub fn sleep(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.adjust(Meter::Health, 10.0);
        self.adjust(Meter::Happiness, -5.0);
        self.adjust(Meter::Energy, 20.0);
        true
    }

    pub fn clean(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.adjust(Meter::Hygiene, 20.0);
        self.adjust(Meter::Energy, -5.0);
        true
    }

    /// Coin flip: win a purse of coins, or lose a fraction of current health.
    ///
    /// The health loss is not floored; health may become fractional.
    pub fn fight<R: Rng>(&mut self, rules: &Rules, rng: &mut R) -> Option<BattleOutcome> {
        if self.game_over {
            return None;
        }
        let won = rng.gen_bool(rules.fight_win_chance.clamp(0.0, 1.0));
        let outcome = if won {
            let lo = rules.fight_reward_min.min(rules.fight_reward_max);
            let coins = rng.gen_range(lo..=rules.fight_reward_max);
            self.coins = self.coins.saturating_add(coins);
            self.battle_result = format!("You won the fight and earned {coins} coins!");
            BattleOutcome::Won { coins }
        } else {
            let before = self.health;
            self.health = (before - before * rules.fight_loss_fraction).max(0.0);
            self.battle_result = format!(
                "You lost the fight and {:.0}% of your health.",
                rules.fight_loss_fraction * 100.0
            );
            BattleOutcome::Lost {
                health_lost: before - self.health,
            }
        };
        log::debug!("fight: {outcome:?}");
        Some(outcome)
    }

    pub fn buy_item(&mut self, item_type: ItemType, cost: u64, rules: &Rules) -> Result<(), ActionError> {
        if self.game_over {
            return Err(ActionError::GameOver);
        }
        if self.coins < cost {
            return Err(ActionError::InsufficientFunds {
                coins: self.coins,
                cost,
            });
        }
        self.coins -= cost;
        self.adjust(item_type.meter(), rules.shop_boost);
        Ok(())
    }

    pub fn restart(&mut self) {
        *self = PetState::default();
    }

    /// One decay step. Returns false while the pet is in game-over.
    pub fn decay_tick(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let rate = self.decay_rate;
        for m in Meter::ALL {
            self.adjust(m, -rate);
        }
        self.check_critical();
        true
    }

    /// One level-progress step. Not gated on game-over.
    pub fn level_tick(&mut self, rules: &Rules) -> LevelTick {
        let healthy = Meter::ALL
            .iter()
            .all(|&m| self.meter(m) > rules.healthy_threshold);
        if !healthy {
            return LevelTick::Idle;
        }
        if self.level_progress.saturating_add(1) >= rules.level_up_at {
            self.level = self.level.saturating_add(1);
            self.decay_rate += rules.decay_rate_step;
            self.level_progress = 0;
            LevelTick::LeveledUp { level: self.level }
        } else {
            self.level_progress += 1;
            LevelTick::Progressed
        }
    }

    /// Re-derive the critical and game-over flags. Returns true on entering game-over.
    pub fn check_critical(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        if self.any_meter_empty() {
            self.is_critical = true;
            self.game_over = true;
            true
        } else {
            self.is_critical = false;
            false
        }
    }
}
