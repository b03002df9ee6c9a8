//! Headless Progression Simulator
//!
//! Runs a seeded, scripted play session through every progression manager
//! and prints the final snapshot.

use std::path::PathBuf;

use clap::Parser;
use grove_progression::core::error::Result;
use grove_progression::progression::{ExperienceSource, LevelUpPayment};
use grove_progression::{Manager, PlayerId, ProgressionConfig, ProgressionHub, ProgressionSnapshot};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Headless Progression Simulator - scripted sessions for balancing
#[derive(Parser, Debug)]
#[command(name = "progression_sim")]
#[command(about = "Run a scripted progression session and output a snapshot")]
struct Args {
    /// TOML config file (built-in defaults when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 240)]
    ticks: u32,

    /// Seconds of game time per tick
    #[arg(long, default_value_t = 30.0)]
    dt: f64,

    /// Number of simulated players
    #[arg(long, default_value_t = 2)]
    players: u32,

    /// Experience offered per interaction before multipliers
    #[arg(long, default_value_t = 10.0)]
    base_experience: f32,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Serialize)]
struct SimReport {
    seed: u64,
    ticks: u32,
    players: u32,
    experience_awarded: f32,
    snapshot: ProgressionSnapshot,
}

fn experience_source(system: &str) -> ExperienceSource {
    match system {
        "planting" => ExperienceSource::Planting,
        "harvesting" => ExperienceSource::Harvesting,
        "breeding" => ExperienceSource::Breeding,
        "research" => ExperienceSource::Research,
        "trading" => ExperienceSource::Trading,
        "exploration" => ExperienceSource::Exploration,
        _ => ExperienceSource::Discovery,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "grove_progression=debug"
    } else {
        "grove_progression=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    let config = match &args.config {
        Some(path) => ProgressionConfig::load_from_toml(path)?,
        None => ProgressionConfig::default(),
    };
    let systems: Vec<String> = config.integration.systems.iter().map(|s| s.name.clone()).collect();
    let projects: Vec<String> = config.skills.projects.iter().map(|p| p.id.clone()).collect();

    let mut hub = ProgressionHub::new(config)?;
    hub.init();

    let players: Vec<PlayerId> = (1..=args.players.max(1)).map(PlayerId::new).collect();
    let mut experience_awarded = 0.0;

    for tick in 0..args.ticks {
        for &player in &players {
            let Some(system) = systems.choose(&mut rng) else {
                break;
            };
            let engagement: f32 = rng.gen_range(0.2..1.0);
            if hub.record_interaction(system, "play", engagement, player) {
                experience_awarded += hub.award_experience(
                    system,
                    args.base_experience,
                    experience_source(system),
                    None,
                    player,
                );
            }
        }

        if tick == 0 {
            hub.complete_milestone("first_seed");
        }
        if tick == args.ticks / 3 {
            hub.satisfy_requirement("visit_market");
        }
        if rng.gen_bool(0.02) {
            if let Err(e) = hub.integration_mut().activate_bonus("discovery") {
                tracing::debug!("Discovery bonus skipped: {}", e);
            }
        }

        // Nudge one active milestone forward
        let active: Vec<(String, f32)> = hub
            .milestones()
            .active()
            .iter()
            .map(|m| (m.id.clone(), m.progress))
            .collect();
        if let Some((id, progress)) = active.choose(&mut rng) {
            let step: f32 = rng.gen_range(0.05..0.3);
            hub.update_milestone_progress(id, progress + step);
        }

        spend_skill_points(&mut hub, &mut rng);

        for project in &projects {
            if hub.skills().active_research().len() >= hub.skills().config().max_active_research {
                break;
            }
            if let Err(e) = hub.skills_mut().start_research(project) {
                tracing::debug!("Research {} not started: {}", project, e);
            }
        }

        hub.tick(args.dt);
        if !hub.skills().completed_research().is_empty() {
            hub.complete_milestone("first_research");
        }
    }

    let report = SimReport {
        seed,
        ticks: args.ticks,
        players: players.len() as u32,
        experience_awarded,
        snapshot: hub.snapshot(),
    };
    hub.shutdown();

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text(&report);
    }
    Ok(())
}

/// Learn something new when possible, otherwise level a random learned skill
fn spend_skill_points(hub: &mut ProgressionHub, rng: &mut StdRng) {
    let available: Vec<String> = hub
        .skills()
        .available_skills()
        .iter()
        .map(|s| s.id.clone())
        .collect();
    if let Some(skill) = available.choose(rng) {
        if hub.skills_mut().learn_skill(skill).is_ok() {
            return;
        }
    }

    let learned: Vec<String> = hub
        .skills()
        .skills()
        .filter(|s| !s.mastered)
        .map(|s| s.skill.clone())
        .collect();
    if let Some(skill) = learned.choose(rng) {
        let skills = hub.skills_mut();
        if skills.level_up_skill(skill, LevelUpPayment::Experience).is_err() {
            let _ = skills.level_up_skill(skill, LevelUpPayment::SkillPoints);
        }
    }
}

fn print_text(report: &SimReport) {
    let snapshot = &report.snapshot;
    println!("=== Progression Session (seed {}) ===", report.seed);
    println!("Ticks: {}  Players: {}  Game time: {:.0}s", report.ticks, report.players, snapshot.time);
    println!(
        "Milestones: {} completed, {} active, {} locked ({:.0}%)",
        snapshot.milestones.completed,
        snapshot.milestones.active,
        snapshot.milestones.locked,
        snapshot.completion_ratio * 100.0
    );
    println!(
        "Player level {} ({:.0} xp, {} skill points)",
        snapshot.skills.player_level, snapshot.skills.total_experience, snapshot.skills.skill_points
    );
    println!(
        "Skills: {} learned, {} mastered",
        snapshot.skills.learned_skills, snapshot.skills.mastered_skills
    );
    println!("Research completed: {:?}", snapshot.skills.completed_research);
    println!(
        "Interactions: {}  Bonus awarded: {:.1}  Experience awarded: {:.1}",
        snapshot.integration.total_interactions,
        snapshot.integration.total_bonus_awarded,
        report.experience_awarded
    );
    for (system, engagement) in &snapshot.engagement {
        println!("  {:<12} {:.2}", system, engagement);
    }
}
