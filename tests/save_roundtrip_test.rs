//! Integration test: save snapshots across a real session
//!
//! Plays part of a run, snapshots it through the storage port, and
//! verifies the restored state continues exactly where it left off.
//! Corruption of any byte rejects the save wholesale.

use bugslayer::battle::{Battle, BattleResult, PlayerAction};
use bugslayer::character::Character;
use bugslayer::data::classes::get_class;
use bugslayer::data::monsters::spawn;
use bugslayer::progression::ProgressionLedger;
use bugslayer::save::{MemoryStore, SaveStore, Snapshot};
use bugslayer::tech_debt::TechDebt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Plays through the first stage to victory and completes it in the
/// ledger. Caps at 500 turns.
fn play_first_stage(
    character: &mut Character,
    tech_debt: &mut TechDebt,
    ledger: &mut ProgressionLedger,
) {
    let mut battle = Battle::new(spawn("null_pointer").unwrap());
    let mut rng = ChaCha8Rng::seed_from_u64(41);
    ledger.record_attempt();
    for _ in 0..500 {
        let outcome = battle
            .resolve_turn(character, tech_debt, ledger, PlayerAction::Attack, &mut rng)
            .unwrap();
        if outcome.result == Some(BattleResult::Victory) {
            ledger.complete_stage(tech_debt.current(), 90);
            return;
        }
        assert!(outcome.result.is_none(), "stage 1 should be a win");
    }
    panic!("fight never ended");
}

#[test]
fn test_session_survives_a_save_load_cycle() {
    let mut character = Character::new("Save Dev", &get_class("junior_dev").unwrap());
    let mut tech_debt = TechDebt::new();
    let mut ledger = ProgressionLedger::new();
    play_first_stage(&mut character, &mut tech_debt, &mut ledger);
    ledger.add_play_time(300);

    let mut store = MemoryStore::new();
    store
        .save("slot1", &Snapshot::new(character.clone(), ledger.clone(), tech_debt.clone()))
        .unwrap();

    let restored = store.load("slot1").unwrap();
    assert_eq!(restored.character, character);
    assert_eq!(restored.progression, ledger);
    assert_eq!(restored.tech_debt, tech_debt);

    // The restored run continues: stage 2 is playable, stage 3 is not
    assert!(restored.progression.is_stage_playable(1, 2));
    assert!(!restored.progression.is_stage_playable(1, 3));
    assert_eq!(restored.progression.current_stage, 2);

    // And the restored character can fight on
    let mut character = restored.character;
    let mut tech_debt = restored.tech_debt;
    let mut ledger = restored.progression;
    let mut battle = Battle::new(spawn("type_mismatch").unwrap());
    let mut rng = ChaCha8Rng::seed_from_u64(43);
    battle
        .resolve_turn(&mut character, &mut tech_debt, &mut ledger, PlayerAction::Attack, &mut rng)
        .unwrap();
    assert_eq!(battle.turn_number, 1);
}

#[test]
fn test_mid_battle_state_is_not_persisted() {
    // Snapshots carry no encounter: saving during a fight and loading
    // resumes at stage select with the fight forgotten.
    let mut character = Character::new("Save Dev", &get_class("junior_dev").unwrap());
    let mut tech_debt = TechDebt::new();
    let mut ledger = ProgressionLedger::new();
    let mut battle = Battle::new(spawn("null_pointer").unwrap());
    let mut rng = ChaCha8Rng::seed_from_u64(47);
    battle
        .resolve_turn(&mut character, &mut tech_debt, &mut ledger, PlayerAction::Attack, &mut rng)
        .unwrap();

    let snapshot = Snapshot::new(character, ledger, tech_debt);
    let bytes = snapshot.to_bytes().unwrap();
    let restored = Snapshot::from_bytes(&bytes).unwrap();

    // The monster's chip damage is gone; only durable state came back
    assert!(restored.progression.stats.burst_damage_peak > 0);
    assert_eq!(restored.tech_debt.current(), 1);
}

#[test]
fn test_every_corrupted_byte_position_is_caught() {
    let character = Character::new("Save Dev", &get_class("junior_dev").unwrap());
    let snapshot = Snapshot::new(character, ProgressionLedger::new(), TechDebt::new());
    let bytes = snapshot.to_bytes().unwrap();

    // Sample positions across the magic, length, payload and checksum
    let positions = [0, 5, 9, bytes.len() / 2, bytes.len() - 1];
    for &pos in &positions {
        let mut corrupted = bytes.clone();
        corrupted[pos] ^= 0x01;
        assert!(
            Snapshot::from_bytes(&corrupted).is_err(),
            "corruption at byte {} went unnoticed",
            pos
        );
    }
}

#[test]
fn test_json_export_round_trips_a_session() {
    let mut character = Character::new("Save Dev", &get_class("junior_dev").unwrap());
    let mut tech_debt = TechDebt::new();
    let mut ledger = ProgressionLedger::new();
    play_first_stage(&mut character, &mut tech_debt, &mut ledger);

    let snapshot = Snapshot::new(character, ledger, tech_debt);
    let json = snapshot.to_json().unwrap();
    let restored = Snapshot::from_json(&json).unwrap();
    assert_eq!(restored, snapshot);
}
