use serde::{Deserialize, Serialize};
use std::fmt;

pub const METER_MIN: f64 = 0.0;
pub const METER_MAX: f64 = 100.0;

/// Floor, then pin into `[0, 100]`. Every meter write except a lost fight goes through here.
pub fn clamp_meter(v: f64) -> f64 {
    v.floor().clamp(METER_MIN, METER_MAX)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Meter {
    Hunger,
    Happiness,
    Health,
    Hygiene,
    Energy,
}

impl Meter {
    pub const ALL: [Meter; 5] = [
        Meter::Hunger,
        Meter::Happiness,
        Meter::Health,
        Meter::Hygiene,
        Meter::Energy,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Meter::Hunger => "Hunger",
            Meter::Happiness => "Happiness",
            Meter::Health => "Health",
            Meter::Hygiene => "Hygiene",
            Meter::Energy => "Energy",
        }
    }
}

/// Colour band a meter value falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Band {
    Low,
    Mid,
    High,
}

impl Band {
    pub fn of(value: f64) -> Self {
        if value >= 60.0 {
            Band::High
        } else if value >= 30.0 {
            Band::Mid
        } else {
            Band::Low
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusMessage {
    GameOver,
    Critical,
    Ok,
}

impl StatusMessage {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusMessage::GameOver => "game over",
            StatusMessage::Critical => "critical",
            StatusMessage::Ok => "ok",
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Meters the shop can restore. Health is not for sale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Hunger,
    Happiness,
    Hygiene,
    Energy,
}

impl ItemType {
    pub fn meter(self) -> Meter {
        match self {
            ItemType::Hunger => Meter::Hunger,
            ItemType::Happiness => Meter::Happiness,
            ItemType::Hygiene => Meter::Hygiene,
            ItemType::Energy => Meter::Energy,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShopItem {
    pub name: &'static str,
    pub item_type: ItemType,
    pub cost: u64,
}

pub const SHOP: [ShopItem; 4] = [
    ShopItem {
        name: "Food",
        item_type: ItemType::Hunger,
        cost: 500,
    },
    ShopItem {
        name: "Toy",
        item_type: ItemType::Happiness,
        cost: 500,
    },
    ShopItem {
        name: "Brush",
        item_type: ItemType::Hygiene,
        cost: 500,
    },
    ShopItem {
        name: "Energizer",
        item_type: ItemType::Energy,
        cost: 500,
    },
];

/// Tunables for the simulation. Defaults are the shipped game balance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub decay_interval_ms: u64,
    pub level_interval_ms: u64,
    pub autosave_interval_ms: u64,
    pub save_coalesce_ms: u64,
    /// Every meter must be strictly above this for level progress to accrue.
    pub healthy_threshold: f64,
    pub level_up_at: u32,
    pub decay_rate_step: f64,
    pub fight_win_chance: f64,
    pub fight_reward_min: u64,
    pub fight_reward_max: u64,
    pub fight_loss_fraction: f64,
    pub shop_boost: f64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            decay_interval_ms: 3000,
            level_interval_ms: 1000,
            autosave_interval_ms: 10_000,
            save_coalesce_ms: 500,
            healthy_threshold: 20.0,
            level_up_at: 100,
            decay_rate_step: 0.5,
            fight_win_chance: 0.5,
            fight_reward_min: 3000,
            fight_reward_max: 10_000,
            fight_loss_fraction: 0.05,
            shop_boost: 30.0,
        }
    }
}

/// Everything that changes while the pet lives.
///
/// Meters are `f64` because a lost fight leaves health fractional; all other
/// writes keep them whole.
#[derive(Clone, Debug, PartialEq)]
pub struct PetState {
    pub hunger: f64,
    pub happiness: f64,
    pub health: f64,
    pub hygiene: f64,
    pub energy: f64,
    pub level: u32,
    pub level_progress: u32,
    pub decay_rate: f64,
    pub coins: u64,
    pub is_critical: bool,
    pub game_over: bool,
    pub battle_result: String,
}

impl Default for PetState {
    fn default() -> Self {
        Self {
            hunger: 50.0,
            happiness: 50.0,
            health: 100.0,
            hygiene: 50.0,
            energy: 50.0,
            level: 1,
            level_progress: 0,
            decay_rate: 1.0,
            coins: 0,
            is_critical: false,
            game_over: false,
            battle_result: String::new(),
        }
    }
}

impl PetState {
    pub fn meter(&self, m: Meter) -> f64 {
        match m {
            Meter::Hunger => self.hunger,
            Meter::Happiness => self.happiness,
            Meter::Health => self.health,
            Meter::Hygiene => self.hygiene,
            Meter::Energy => self.energy,
        }
    }

    pub fn meter_mut(&mut self, m: Meter) -> &mut f64 {
        match m {
            Meter::Hunger => &mut self.hunger,
            Meter::Happiness => &mut self.happiness,
            Meter::Health => &mut self.health,
            Meter::Hygiene => &mut self.hygiene,
            Meter::Energy => &mut self.energy,
        }
    }

    /// Add `delta` to a meter, flooring and clamping the result.
    pub fn adjust(&mut self, m: Meter, delta: f64) {
        let slot = self.meter_mut(m);
        *slot = clamp_meter(*slot + delta);
    }

    pub fn meters(&self) -> [(Meter, f64); 5] {
        Meter::ALL.map(|m| (m, self.meter(m)))
    }

    pub fn any_meter_empty(&self) -> bool {
        Meter::ALL.iter().any(|&m| self.meter(m) == 0.0)
    }

    pub fn status(&self) -> StatusMessage {
        if self.game_over {
            StatusMessage::GameOver
        } else if self.is_critical {
            StatusMessage::Critical
        } else {
            StatusMessage::Ok
        }
    }
}

/// The persisted subset of [`PetState`]. Flags and the battle log are not saved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecord {
    pub hunger: f64,
    pub happiness: f64,
    pub health: f64,
    pub hygiene: f64,
    pub energy: f64,
    pub level: u32,
    pub level_progress: u32,
    pub decay_rate: f64,
    #[serde(default)]
    pub coins: u64,
}

impl From<&PetState> for SaveRecord {
    fn from(st: &PetState) -> Self {
        Self {
            hunger: st.hunger,
            happiness: st.happiness,
            health: st.health,
            hygiene: st.hygiene,
            energy: st.energy,
            level: st.level,
            level_progress: st.level_progress,
            decay_rate: st.decay_rate,
            coins: st.coins,
        }
    }
}

impl SaveRecord {
    /// Overwrite the persisted fields of `st` verbatim, without validation.
    pub fn apply_to(&self, st: &mut PetState) {
        st.hunger = self.hunger;
        st.happiness = self.happiness;
        st.health = self.health;
        st.hygiene = self.hygiene;
        st.energy = self.energy;
        st.level = self.level;
        st.level_progress = self.level_progress;
        st.decay_rate = self.decay_rate;
        st.coins = self.coins;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_floors_then_bounds() {
        assert_eq!(clamp_meter(105.0), 100.0);
        assert_eq!(clamp_meter(-3.0), 0.0);
        assert_eq!(clamp_meter(48.5), 48.0);
        assert_eq!(clamp_meter(0.5), 0.0);
    }

    #[test]
    fn defaults_match_a_fresh_pet() {
        let st = PetState::default();
        assert_eq!(st.hunger, 50.0);
        assert_eq!(st.happiness, 50.0);
        assert_eq!(st.health, 100.0);
        assert_eq!(st.hygiene, 50.0);
        assert_eq!(st.energy, 50.0);
        assert_eq!(st.level, 1);
        assert_eq!(st.level_progress, 0);
        assert_eq!(st.decay_rate, 1.0);
        assert_eq!(st.coins, 0);
        assert!(!st.is_critical);
        assert!(!st.game_over);
        assert!(st.battle_result.is_empty());
        assert_eq!(st.status(), StatusMessage::Ok);
    }

    #[test]
    fn bands_split_at_30_and_60() {
        assert_eq!(Band::of(0.0), Band::Low);
        assert_eq!(Band::of(29.0), Band::Low);
        assert_eq!(Band::of(30.0), Band::Mid);
        assert_eq!(Band::of(59.0), Band::Mid);
        assert_eq!(Band::of(60.0), Band::High);
        assert_eq!(Band::of(100.0), Band::High);
    }

    #[test]
    fn status_prefers_game_over() {
        let mut st = PetState::default();
        st.is_critical = true;
        assert_eq!(st.status().as_str(), "critical");
        st.game_over = true;
        assert_eq!(st.status().as_str(), "game over");
    }

    #[test]
    fn save_record_uses_camel_case_and_defaults_coins() {
        let st = PetState::default();
        let json = serde_json::to_value(SaveRecord::from(&st)).unwrap();
        assert!(json.get("levelProgress").is_some());
        assert!(json.get("decayRate").is_some());
        assert!(json.get("isCritical").is_none());
        assert!(json.get("battleResult").is_none());

        let rec: SaveRecord = serde_json::from_str(
            r#"{"hunger":10,"happiness":20,"health":30,"hygiene":40,"energy":50,
                "level":3,"levelProgress":7,"decayRate":2.0}"#,
        )
        .unwrap();
        assert_eq!(rec.coins, 0);
        assert_eq!(rec.level, 3);
    }

    #[test]
    fn save_record_rejects_missing_meter() {
        let res = serde_json::from_str::<SaveRecord>(
            r#"{"happiness":20,"health":30,"hygiene":40,"energy":50,
                "level":3,"levelProgress":7,"decayRate":2.0,"coins":5}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn shop_items_are_500_each_and_skip_health() {
        for item in SHOP {
            assert_eq!(item.cost, 500);
            assert_ne!(item.item_type.meter(), Meter::Health);
        }
    }
}
