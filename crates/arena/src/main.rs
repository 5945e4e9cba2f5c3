//! Headless arena: spawns a scripted player against a few archetypes and runs
//! the combat loop at a fixed tick, logging what happens.
mod config;

use std::path::Path;

use anyhow::{Context, Result};
use combat_content::ContentRegistry;
use combat_core::{Actor, AgentId, Combatant, Position};
use combat_runtime::{CombatEvent, CombatWorld, RecordedEvent};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ArenaConfig;

/// Distance within which agents keep sensing the player.
const SIGHT_RADIUS: f32 = 2500.0;
/// Distance at which the scripted player swings or dodges.
const PLAYER_REACH: f32 = 200.0;

const ROSTER: &[(&str, Position)] = &[
    ("grunt", Position::new(900.0, 0.0, 0.0)),
    ("archer", Position::new(-1200.0, 400.0, 0.0)),
    ("sentinel", Position::new(0.0, -700.0, 0.0)),
];

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let config = ArenaConfig::from_env();
    let _guard = setup_logging(config.log_dir.as_deref())?;

    tracing::info!(
        seed = config.seed,
        duration = config.duration_secs,
        tick_hz = config.tick_hz,
        "arena starting"
    );

    let content = match &config.content_dir {
        Some(dir) => ContentRegistry::load(dir)
            .with_context(|| format!("loading content from {}", dir.display()))?,
        None => ContentRegistry::builtin().context("loading built-in content")?,
    };

    let mut world = CombatWorld::builder()
        .seed(config.seed)
        .content(content)
        .build();

    let player = world.spawn_player(Position::ORIGIN);
    let mut agents = Vec::with_capacity(ROSTER.len());
    for &(archetype, position) in ROSTER {
        let id = world
            .spawn_archetype(archetype, position)
            .with_context(|| format!("spawning '{archetype}'"))?;
        agents.push(id);
    }

    let dt = config.frame();
    for _ in 0..config.frames() {
        sense(&mut world, player, &agents)?;
        drive_player(&mut world, player)?;
        world.advance(dt);

        for recorded in world.drain_events() {
            log_event(&recorded);
        }

        if is_down(&world, player) || agents.iter().all(|&id| is_down(&world, id)) {
            tracing::info!(time = world.now(), "fight decided");
            break;
        }
    }

    summarize(&world);
    Ok(())
}

fn setup_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let Some(dir) = log_dir else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;
    let file_appender = tracing_appender::rolling::never(dir, "arena.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(Some(guard))
}

/// Feeds each agent a sight stimulus for the player: positive inside the
/// sight radius, zero outside it.
fn sense(world: &mut CombatWorld, player: AgentId, agents: &[AgentId]) -> Result<()> {
    let Some(player_pos) = world.player(player).map(|p| p.position()) else {
        return Ok(());
    };
    for &agent in agents {
        let Some(agent_pos) = world.agent(agent).map(|a| a.position()) else {
            continue;
        };
        let strength = if agent_pos.distance(player_pos) <= SIGHT_RADIUS {
            1.0
        } else {
            0.0
        };
        world.perceive(agent, player, strength)?;
    }
    Ok(())
}

/// Scripted player: dodges a swinging neighbour, otherwise swings at anyone
/// in reach.
fn drive_player(world: &mut CombatWorld, player: AgentId) -> Result<()> {
    let Some(me) = world.player(player) else {
        return Ok(());
    };
    if me.is_dead() {
        return Ok(());
    }
    let origin = me.position();

    let mut threatened = false;
    let mut in_reach = false;
    for (_, actor) in world.registry().iter() {
        let Actor::Ai(agent) = actor else { continue };
        if agent.is_dead() || agent.position().distance(origin) > PLAYER_REACH {
            continue;
        }
        in_reach = true;
        threatened |= agent.is_attacking();
    }

    if threatened {
        world.player_dodge(player)?;
    } else if in_reach {
        world.player_attack(player)?;
    }
    Ok(())
}

fn is_down(world: &CombatWorld, id: AgentId) -> bool {
    world
        .registry()
        .combatant(id)
        .is_none_or(|combatant| combatant.is_dead())
}

fn log_event(recorded: &RecordedEvent) {
    let time = recorded.time;
    match &recorded.event {
        CombatEvent::AbilitySelected {
            agent,
            ability,
            draw,
            executed,
        } => tracing::debug!(time, %agent, %ability, draw, executed, "ability selected"),
        CombatEvent::DamageApplied {
            target,
            source,
            amount,
            remaining,
        } => tracing::info!(
            time,
            %target,
            source = ?source,
            amount,
            remaining,
            "damage"
        ),
        CombatEvent::Died { actor, killer } => {
            tracing::info!(time, %actor, killer = ?killer, "died")
        }
        CombatEvent::EnemyDetected { agent, enemy } => {
            tracing::info!(time, %agent, %enemy, "enemy detected")
        }
        CombatEvent::EnemyLost { agent, enemy } => {
            tracing::info!(time, %agent, %enemy, "enemy lost")
        }
        other => tracing::trace!(time, event = ?other),
    }
}

fn summarize(world: &CombatWorld) {
    tracing::info!(time = world.now(), "arena finished");
    for (id, actor) in world.registry().iter() {
        let combatant = actor.as_combatant();
        let (kind, state) = match actor {
            Actor::Ai(agent) => ("agent", agent.state()),
            Actor::Player(player) => ("player", player.state()),
        };
        tracing::info!(
            %id,
            kind,
            health = combatant.health(),
            %state,
            position = %combatant.position(),
            "final"
        );
    }
}
