use std::time::Duration;
use tamagotchi::config::{Settings, DEFAULT_SAVE_KEY};
use tamagotchi::{
    ActionError, BlobStore, GameEngine, ItemType, MemoryStore, PetState, Rules, SaveRecord,
    StatusMessage,
};

fn seeded() -> Settings {
    Settings {
        seed: Some(0x5EED),
        ..Settings::default()
    }
}

#[test]
fn feeding_a_fresh_pet() {
    let mut e = GameEngine::new(MemoryStore::new(), &seeded());
    assert!(e.feed());
    let st = e.state();
    assert_eq!(st.hunger, 70.0);
    assert_eq!(st.health, 100.0);
    assert_eq!(st.energy, 45.0);
}

#[test]
fn neglect_ends_the_game_for_good() {
    let mut e = GameEngine::new(MemoryStore::new(), &seeded());
    for _ in 0..50 {
        e.advance(Duration::from_millis(3000));
    }
    assert_eq!(e.state().hunger, 0.0);
    assert!(e.state().game_over);
    assert_eq!(e.status(), StatusMessage::GameOver);

    let frozen = e.state().clone();
    assert!(!e.feed());
    assert!(!e.play());
    assert!(!e.sleep());
    assert!(!e.clean());
    assert!(e.fight().is_none());
    assert_eq!(e.buy_item(ItemType::Hunger, 0), Err(ActionError::GameOver));
    e.advance(Duration::from_secs(60));
    assert!(e.state().game_over);
    assert_eq!(e.state().hunger, frozen.hunger);
}

#[test]
fn shopping_without_coins_is_refused() {
    let blob = r#"{"hunger":50,"happiness":50,"health":100,"hygiene":50,"energy":50,
                   "level":1,"levelProgress":0,"decayRate":1,"coins":300}"#;
    let mut e = GameEngine::new(MemoryStore::with_blob(DEFAULT_SAVE_KEY, blob), &seeded());
    assert_eq!(e.state().coins, 300);
    let before = e.state().clone();
    assert_eq!(
        e.buy_item(ItemType::Energy, 500),
        Err(ActionError::InsufficientFunds { coins: 300, cost: 500 })
    );
    assert_eq!(e.state(), &before);
}

#[test]
fn restart_after_game_over_restores_defaults() {
    let mut e = GameEngine::new(MemoryStore::new(), &seeded());
    e.advance(Duration::from_secs(200));
    assert!(e.state().game_over);
    e.restart();
    assert_eq!(e.state(), &PetState::default());
    assert_eq!(e.status(), StatusMessage::Ok);
}

#[test]
fn good_care_levels_up_and_speeds_decay() {
    let settings = Settings {
        rules: Rules {
            decay_interval_ms: 3_600_000,
            ..Rules::default()
        },
        ..seeded()
    };
    let mut e = GameEngine::new(MemoryStore::new(), &settings);
    e.advance(Duration::from_secs(99));
    assert_eq!(e.state().level, 1);
    assert_eq!(e.state().level_progress, 99);
    e.advance(Duration::from_secs(1));
    assert_eq!(e.state().level, 2);
    assert_eq!(e.state().level_progress, 0);
    assert_eq!(e.state().decay_rate, 1.5);
}

#[test]
fn fights_pay_out_or_hurt_by_five_percent() {
    let mut e = GameEngine::new(MemoryStore::new(), &seeded());
    for _ in 0..40 {
        let coins = e.state().coins;
        let health = e.state().health;
        match e.fight().expect("pet is alive") {
            tamagotchi::BattleOutcome::Won { coins: won } => {
                assert!((3000..=10_000).contains(&won));
                assert_eq!(e.state().coins, coins + won);
                assert_eq!(e.state().health, health);
            }
            tamagotchi::BattleOutcome::Lost { .. } => {
                assert_eq!(e.state().health, (health - health * 0.05).max(0.0));
                assert_eq!(e.state().coins, coins);
            }
        }
        assert!(!e.state().battle_result.is_empty());
    }
}

#[test]
fn session_end_persists_and_next_session_restores() {
    let mut e = GameEngine::new(MemoryStore::new(), &seeded());
    e.feed();
    e.fight();
    e.advance(Duration::from_secs(4));
    let saved = SaveRecord::from(e.state());
    let store = e.into_store().unwrap();

    let blob = store.get(DEFAULT_SAVE_KEY).unwrap().unwrap();
    let on_disk: SaveRecord = serde_json::from_str(&blob).unwrap();
    assert_eq!(on_disk, saved);

    let next = GameEngine::new(store, &seeded());
    assert_eq!(SaveRecord::from(next.state()), saved);
    assert!(next.state().battle_result.is_empty());
}

#[test]
fn corrupt_or_partial_save_starts_fresh() {
    for blob in [
        "not json at all",
        r#"{"hunger":10}"#,
        r#"{"hunger":"ten","happiness":50,"health":100,"hygiene":50,"energy":50,
            "level":1,"levelProgress":0,"decayRate":1}"#,
    ] {
        let e = GameEngine::new(MemoryStore::with_blob(DEFAULT_SAVE_KEY, blob), &seeded());
        assert_eq!(e.state(), &PetState::default());
    }
}
