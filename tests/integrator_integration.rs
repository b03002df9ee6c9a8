//! Integration tests for streaks, combos, bonuses and the interaction log

use std::cell::RefCell;
use std::rc::Rc;

use grove_progression::core::types::SECONDS_PER_DAY;
use grove_progression::core::{Manager, PlayerId, ProgressionError};
use grove_progression::integration::{IntegrationConfig, IntegratorEvent, ProgressionIntegrator};

const ALICE: PlayerId = PlayerId(1);
const BOB: PlayerId = PlayerId(2);

fn integrator() -> ProgressionIntegrator {
    let mut integrator = ProgressionIntegrator::new(IntegrationConfig::default());
    integrator.init();
    integrator
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn test_nothing_active_returns_base_multiplier() {
    let mut integrator = integrator();
    for (system, multiplier) in [("planting", 1.0), ("breeding", 1.25), ("exploration", 1.15)] {
        assert!(close(integrator.calculate_bonus(system, 100.0, ALICE), 100.0 * multiplier));
    }
}

#[test]
fn test_streak_grows_and_expires() {
    let mut integrator = integrator();
    for _ in 0..3 {
        assert!(integrator.record_interaction("planting", "sow", 0.9, ALICE));
    }
    let streak = integrator.streak("planting", ALICE).unwrap();
    assert_eq!(streak.count, 3);
    assert!(close(integrator.calculate_bonus("planting", 100.0, ALICE), 120.0));

    // Streaks are tracked per player
    assert!(integrator.streak("planting", BOB).is_none());
    assert!(close(integrator.calculate_bonus("planting", 100.0, BOB), 100.0));

    integrator.tick(SECONDS_PER_DAY + 1.0);
    let streak = integrator.streak("planting", ALICE).unwrap();
    assert!(!streak.active);
    assert_eq!(streak.best_count, 3);
    assert!(close(integrator.calculate_bonus("planting", 100.0, ALICE), 100.0));

    // A new qualifying interaction restarts at one
    integrator.record_interaction("planting", "sow", 0.9, ALICE);
    assert_eq!(integrator.streak("planting", ALICE).unwrap().count, 1);
}

#[test]
fn test_streak_multiplier_is_capped() {
    let mut integrator = integrator();
    for _ in 0..40 {
        integrator.record_interaction("research", "study", 1.0, ALICE);
    }
    assert!(close(integrator.streak_multiplier("research", ALICE), 2.0));
}

#[test]
fn test_combo_activates_and_expires_with_window() {
    let mut integrator = integrator();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    integrator.subscribe(move |e: &IntegratorEvent| sink.borrow_mut().push(e.clone()));

    integrator.record_interaction("planting", "sow", 0.9, ALICE);
    assert!(integrator.combo("green_cycle").map_or(false, |c| !c.active));

    integrator.tick(10.0);
    integrator.record_interaction("harvesting", "reap", 0.9, ALICE);
    let combo = integrator.combo("green_cycle").unwrap();
    assert!(combo.active);
    assert_eq!(combo.activation_count, 1);

    // planting: base 1.0, streak of one, green cycle 1.25
    assert!(close(integrator.calculate_bonus("planting", 100.0, ALICE), 125.0));
    // trading is not part of any active combo
    assert!(close(integrator.calculate_bonus("trading", 100.0, ALICE), 100.0));

    // Still active one second before the window closes
    integrator.tick(299.0);
    assert!(integrator.combo("green_cycle").unwrap().active);
    integrator.tick(1.0);
    assert!(!integrator.combo("green_cycle").unwrap().active);
    integrator.tick(1.0);
    assert!(!integrator.combo("green_cycle").unwrap().active);

    let events = log.borrow();
    assert!(events
        .iter()
        .any(|e| matches!(e, IntegratorEvent::ComboActivated { id, .. } if id == "green_cycle")));
    assert!(events
        .iter()
        .any(|e| matches!(e, IntegratorEvent::ComboDeactivated { id } if id == "green_cycle")));
}

#[test]
fn test_combo_needs_every_system_inside_window() {
    let mut integrator = integrator();
    integrator.record_interaction("trading", "sell", 0.9, ALICE);
    integrator.tick(600.0);
    integrator.record_interaction("exploration", "wander", 0.9, ALICE);
    assert!(!integrator.combo("travelling_merchant").unwrap().active);

    integrator.record_interaction("trading", "sell", 0.9, ALICE);
    assert!(integrator.combo("travelling_merchant").unwrap().active);
}

#[test]
fn test_multi_system_bonus_gated_by_duration() {
    let mut integrator = integrator();
    integrator.record_interaction("planting", "sow", 0.9, ALICE);
    integrator.record_interaction("research", "study", 0.9, ALICE);
    assert!(integrator.active_bonuses().next().is_none());

    integrator.record_interaction("exploration", "wander", 0.9, ALICE);
    let active: Vec<_> = integrator.active_bonuses().map(|b| b.id().to_string()).collect();
    assert_eq!(active, vec!["multi_system".to_string()]);

    // exploration 1.15, no combo, multi_system 1.2
    assert!(close(integrator.calculate_bonus("exploration", 100.0, ALICE), 100.0 * 1.15 * 1.2));

    integrator.tick(600.0);
    assert!(integrator.active_bonuses().next().is_none());
    // The flag stays set; only the read-time check gates the effect
    assert!(integrator.bonus("multi_system").unwrap().active);
    assert!(close(integrator.calculate_bonus("exploration", 100.0, ALICE), 115.0));
}

#[test]
fn test_external_bonus_cooldown() {
    let mut integrator = integrator();
    assert!(integrator.activate_bonus("discovery").is_ok());
    assert!(matches!(
        integrator.activate_bonus("discovery"),
        Err(ProgressionError::BonusOnCooldown(_))
    ));
    assert!(matches!(
        integrator.activate_bonus("jackpot"),
        Err(ProgressionError::UnknownBonus(_))
    ));

    // Duration 120 plus cooldown 600
    integrator.tick(719.0);
    assert!(integrator.activate_bonus("discovery").is_err());
    integrator.tick(1.0);
    assert!(integrator.activate_bonus("discovery").is_ok());
    assert_eq!(integrator.bonus("discovery").unwrap().activation_count, 2);
}

#[test]
fn test_external_bonus_never_auto_activates() {
    let mut integrator = integrator();
    for _ in 0..60 {
        integrator.record_interaction("breeding", "cross", 1.0, ALICE);
    }
    assert!(!integrator.bonus("discovery").unwrap().active);
    assert!(!integrator.bonus("perfect_performance").unwrap().active);
}

#[test]
fn test_bonuses_disabled() {
    let config = IntegrationConfig {
        enable_bonuses: false,
        ..IntegrationConfig::default()
    };
    let mut integrator = ProgressionIntegrator::new(config);
    integrator.init();
    assert!(matches!(
        integrator.activate_bonus("discovery"),
        Err(ProgressionError::BonusesDisabled)
    ));

    // Three distinct systems would normally trigger multi_system
    for system in ["planting", "research", "exploration"] {
        integrator.record_interaction(system, "act", 0.9, ALICE);
    }
    assert!(!integrator.bonus("multi_system").unwrap().active);
    assert!(integrator.active_bonuses().next().is_none());
    assert!(close(integrator.calculate_bonus("exploration", 100.0, ALICE), 115.0));
}

#[test]
fn test_combos_disabled() {
    let config = IntegrationConfig {
        enable_combos: false,
        ..IntegrationConfig::default()
    };
    let mut integrator = ProgressionIntegrator::new(config);
    integrator.init();

    integrator.record_interaction("planting", "sow", 0.9, ALICE);
    integrator.tick(10.0);
    integrator.record_interaction("harvesting", "reap", 0.9, ALICE);
    integrator.tick(10.0);

    assert!(!integrator.combo("green_cycle").unwrap().active);
    assert!(integrator.active_combos().next().is_none());
    // Base 1.0 and a streak of one, with no green cycle multiplier
    assert!(close(integrator.calculate_bonus("planting", 100.0, ALICE), 100.0));
}

#[test]
fn test_event_log_cap_and_pruning() {
    let mut integrator = integrator();
    for _ in 0..101 {
        integrator.record_interaction("planting", "sow", 0.3, ALICE);
    }
    assert_eq!(integrator.recent_events().len(), 81);

    integrator.tick(3600.0);
    assert_eq!(integrator.recent_events().len(), 81);
    integrator.tick(1.0);
    assert!(integrator.recent_events().is_empty());
}

#[test]
fn test_player_profiles() {
    let mut integrator = integrator();
    for system in ["planting", "planting", "trading", "trading", "trading"] {
        integrator.record_interaction(system, "act", 0.7, ALICE);
    }
    for _ in 0..12 {
        integrator.record_interaction("research", "study", 0.7, BOB);
    }

    let alice = integrator.player_profile(ALICE).unwrap();
    assert_eq!(alice.favorite_system.as_deref(), Some("trading"));
    assert_eq!(alice.total_interactions, 5);
    assert_eq!(alice.usage("planting"), 2);

    let bob = integrator.player_profile(BOB).unwrap();
    assert_eq!(bob.recent_activity.len(), 10);
    assert_eq!(bob.distinct_systems(), 1);

    let summary = integrator.summary();
    assert_eq!(summary.tracked_players, 2);
    assert_eq!(summary.total_interactions, 17);
    assert_eq!(summary.favorite_system.as_deref(), Some("research"));
}

#[test]
fn test_running_average_and_ranking() {
    let mut integrator = integrator();
    integrator.record_interaction("breeding", "cross", 1.0, ALICE);
    integrator.record_interaction("breeding", "cross", 1.0, ALICE);
    integrator.record_interaction("trading", "sell", 0.4, ALICE);

    assert!(close(integrator.system_profile("breeding").unwrap().average_engagement, 0.75));
    assert!(close(integrator.system_profile("trading").unwrap().average_engagement, 0.2));

    let ranking = integrator.engagement_ranking();
    assert_eq!(ranking[0].0, "breeding");
    assert_eq!(ranking[1].0, "trading");
}

#[test]
fn test_non_finite_engagement_rejected() {
    let mut integrator = integrator();
    assert!(!integrator.record_interaction("planting", "sow", f32::NAN, ALICE));
    assert_eq!(integrator.system_profile("planting").unwrap().interaction_count, 0);
}

#[test]
fn test_bonus_totals_accumulate() {
    let mut integrator = integrator();
    integrator.record_interaction("breeding", "cross", 0.1, ALICE);
    integrator.calculate_bonus("breeding", 100.0, ALICE);
    integrator.calculate_bonus("breeding", 100.0, ALICE);

    assert!(close(integrator.total_bonus_awarded(), 50.0));
    assert!(close(integrator.player_profile(ALICE).unwrap().total_bonus_earned, 50.0));
}
