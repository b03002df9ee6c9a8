//! Integration tests for milestone unlock chains and reward dispatch

use std::cell::RefCell;
use std::rc::Rc;

use grove_progression::core::Manager;
use grove_progression::milestones::{
    MilestoneConfig, MilestoneEvent, MilestoneSeed, MilestoneState, MilestoneTracker, RewardSink,
};

/// Collects every reward grant
#[derive(Default)]
struct Ledger {
    experience: f32,
    skill_points: u32,
    unlocks: Vec<String>,
}

impl RewardSink for Ledger {
    fn grant_experience(&mut self, amount: f32) {
        self.experience += amount;
    }

    fn grant_skill_points(&mut self, points: u32) {
        self.skill_points += points;
    }

    fn unlock(&mut self, feature: &str) {
        self.unlocks.push(feature.to_string());
    }
}

fn tracker() -> MilestoneTracker {
    let mut tracker = MilestoneTracker::new(MilestoneConfig::default());
    tracker.init();
    tracker
}

fn record_events(tracker: &mut MilestoneTracker) -> Rc<RefCell<Vec<MilestoneEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    tracker.subscribe(move |e: &MilestoneEvent| sink.borrow_mut().push(e.clone()));
    log
}

fn unlocked_ids(events: &[MilestoneEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            MilestoneEvent::Unlocked { id, .. } => Some(id.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_default_chain_unlocks_step_by_step() {
    let mut tracker = tracker();
    let mut ledger = Ledger::default();
    let log = record_events(&mut tracker);

    assert_eq!(tracker.milestone_state("first_germination"), Some(MilestoneState::Locked));

    assert!(tracker.complete_milestone("first_seed", &mut ledger));
    assert_eq!(unlocked_ids(&log.borrow()), vec!["first_germination".to_string()]);

    assert!(tracker.complete_milestone("first_germination", &mut ledger));
    assert!(tracker.complete_milestone("first_harvest", &mut ledger));

    // market_day still waits on the external visit_market tag
    assert_eq!(tracker.milestone_state("green_thumb"), Some(MilestoneState::Active));
    assert_eq!(tracker.milestone_state("market_day"), Some(MilestoneState::Locked));
    assert_eq!(tracker.milestone_state("cross_pollination"), Some(MilestoneState::Locked));

    assert_eq!(tracker.satisfy_requirement("visit_market"), 1);
    assert_eq!(tracker.milestone_state("market_day"), Some(MilestoneState::Active));
    // A repeated tag changes nothing
    assert_eq!(tracker.satisfy_requirement("visit_market"), 0);

    assert!(tracker.complete_milestone("first_research", &mut ledger));
    assert_eq!(tracker.milestone_state("cross_pollination"), Some(MilestoneState::Active));

    assert_eq!(ledger.experience, 50.0 + 100.0 + 200.0 + 100.0);
    assert_eq!(ledger.skill_points, 1);
    assert_eq!(
        ledger.unlocks,
        vec!["watering_can".to_string(), "research_lab".to_string()]
    );
}

#[test]
fn test_partitions_always_cover_every_seed() {
    let mut tracker = tracker();
    let mut ledger = Ledger::default();
    let total = MilestoneConfig::default().seeds.len();

    for id in ["first_seed", "master_gardener", "first_seed", "unknown", "first_harvest"] {
        tracker.complete_milestone(id, &mut ledger);
        assert_eq!(tracker.counts().total(), total);
    }
    tracker.satisfy_requirement("visit_market");
    tracker.update_milestone_progress("green_thumb", 0.4, &mut ledger);
    assert_eq!(tracker.counts().total(), total);
}

#[test]
fn test_completing_locked_milestone_relocates_it() {
    let mut tracker = tracker();
    let mut ledger = Ledger::default();

    assert!(tracker.complete_milestone("master_gardener", &mut ledger));
    assert_eq!(tracker.milestone_state("master_gardener"), Some(MilestoneState::Completed));
    assert!(!tracker.locked().iter().any(|m| m.id == "master_gardener"));
    assert!(tracker.find_milestone("master_gardener").unwrap().completed_at.is_some());
    assert_eq!(ledger.unlocks, vec!["rare_seeds".to_string()]);
}

#[test]
fn test_progress_completion_needs_requirements() {
    let mut tracker = tracker();
    let mut ledger = Ledger::default();

    // Locked: full progress is recorded but does not complete
    assert!(!tracker.update_milestone_progress("first_harvest", 1.0, &mut ledger));
    assert_eq!(tracker.find_milestone("first_harvest").unwrap().progress, 1.0);
    assert!(!tracker.is_completed("first_harvest"));

    // Active, below the threshold
    assert!(!tracker.update_milestone_progress("first_seed", 0.6, &mut ledger));
    assert!(!tracker.is_completed("first_seed"));

    // Values above 1.0 clamp and complete
    assert!(tracker.update_milestone_progress("first_seed", 3.0, &mut ledger));
    assert!(tracker.is_completed("first_seed"));
    assert!(!tracker.update_milestone_progress("first_seed", 1.0, &mut ledger));
    assert_eq!(ledger.experience, 50.0);
}

#[test]
fn test_custom_threshold() {
    let config = MilestoneConfig {
        completion_threshold: 0.5,
        seeds: vec![MilestoneSeed::new("half", "Halfway").rewards("skill_points_2")],
    };
    let mut tracker = MilestoneTracker::new(config);
    let mut ledger = Ledger::default();

    assert!(!tracker.update_milestone_progress("half", 0.49, &mut ledger));
    assert!(tracker.update_milestone_progress("half", 0.5, &mut ledger));
    assert_eq!(ledger.skill_points, 2);
}

#[test]
fn test_progress_events_are_emitted() {
    let mut tracker = tracker();
    let mut ledger = Ledger::default();
    let log = record_events(&mut tracker);

    tracker.update_milestone_progress("first_seed", -2.0, &mut ledger);
    tracker.update_milestone_progress("first_seed", f32::NAN, &mut ledger);

    let events = log.borrow();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        MilestoneEvent::Progress { id, progress } if id == "first_seed" && *progress == 0.0
    ));
}

#[test]
fn test_malformed_rewards_are_skipped() {
    let config = MilestoneConfig {
        completion_threshold: 1.0,
        seeds: vec![MilestoneSeed::new("odd", "Odd")
            .rewards("experience_lots")
            .rewards("confetti")
            .rewards("experience_25")],
    };
    let mut tracker = MilestoneTracker::new(config);
    let mut ledger = Ledger::default();

    assert!(tracker.complete_milestone("odd", &mut ledger));
    assert_eq!(ledger.experience, 25.0);
    assert!(ledger.unlocks.is_empty());
}

#[test]
fn test_shutdown_drops_subscribers() {
    let mut tracker = tracker();
    let log = record_events(&mut tracker);
    tracker.shutdown();

    let mut ledger = Ledger::default();
    tracker.complete_milestone("first_seed", &mut ledger);
    assert!(log.borrow().is_empty());
    assert_eq!(tracker.subscriber_count(), 0);
}
