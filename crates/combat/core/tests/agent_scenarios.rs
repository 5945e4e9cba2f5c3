mod common;

use combat_core::{
    Ability, AgentConfig, Clip, CombatBehaviorProfile, CombatState, Combatant, CommandOutcome,
    Cooldown, CooldownRange, DamageOutcome, Evaluation, IgnoreReason, MIN_EVALUATION_DELAY,
    Perception, Release, StrafeDirection, TimerTask,
};
use common::Fight;

fn melee_profile() -> CombatBehaviorProfile {
    CombatBehaviorProfile::new(1.0, 0.0, 0.0, 0.0, 0.1)
}

#[test]
fn in_range_agent_attacks_on_low_draw() {
    let mut fight = Fight::new(AgentConfig::default(), melee_profile(), 100.0);
    fight.detect_player();
    fight.backends.rng.push_float(0.05);
    fight.backends.rng.push_int(2);

    let evaluation = fight.with_agent(|agent, view, svc| agent.evaluate(view.as_ref(), svc));

    let Evaluation::Decided {
        scores,
        draw,
        ability,
        outcome,
    } = evaluation
    else {
        panic!("expected a decision, got {evaluation:?}");
    };
    assert_eq!(draw, 0.05);
    assert!(scores.get(Ability::Attack) > 0.0);
    assert!((scores.get(Ability::Attack) - 0.6).abs() < 1e-6);
    assert_eq!(scores.get(Ability::Seek), 0.0);
    assert_eq!(ability, Ability::Attack);
    assert_eq!(outcome, CommandOutcome::Executed);

    let agent = fight.agent();
    assert_eq!(agent.state(), CombatState::Attacking);
    assert_eq!(agent.combo_index(), 2);
    assert!(agent.is_attacking());
    assert_eq!(fight.backends.animation.sections(Clip::Attack), ["Attack03"]);
}

#[test]
fn blocking_halves_non_lethal_damage() {
    let mut fight = Fight::new(AgentConfig::default(), melee_profile(), 100.0);

    let outcome = fight.with_agent(|agent, _, svc| {
        assert!(agent.blocking(svc).is_executed());
        agent.take_damage(30.0, svc)
    });

    assert_eq!(
        outcome,
        DamageOutcome::Applied {
            amount: 15.0,
            remaining: 85.0
        }
    );
    assert_eq!(fight.agent().health(), 85.0);
    assert!(!fight.agent().can_block());
}

#[test]
fn dodging_negates_non_lethal_damage() {
    let mut fight = Fight::new(AgentConfig::default(), melee_profile(), 100.0);

    fight.with_agent(|agent, _, svc| {
        assert!(agent.dodging(svc).is_executed());
        agent.take_damage(20.0, svc)
    });

    assert_eq!(fight.agent().health(), 100.0);
    assert!(!fight.agent().can_dodge());
}

#[test]
fn lethal_hit_ignores_mitigation() {
    let mut fight = Fight::new(AgentConfig::default(), melee_profile(), 100.0);

    let outcome = fight.with_agent(|agent, _, svc| {
        assert!(agent.blocking(svc).is_executed());
        agent.take_damage(100.0, svc)
    });

    assert_eq!(outcome, DamageOutcome::Killed);
    assert_eq!(fight.agent().health(), 0.0);
    assert_eq!(fight.agent().state(), CombatState::Dead);
}

#[test]
fn lethal_hit_kills_and_later_commands_are_ignored() {
    let config = AgentConfig::default().with_max_health(20.0);
    let mut fight = Fight::new(config, melee_profile(), 100.0);
    fight.detect_player();

    let (damage, attack) = fight.with_agent(|agent, _, svc| {
        let damage = agent.take_damage(30.0, svc);
        (damage, agent.attack_combo(svc))
    });

    assert_eq!(damage, DamageOutcome::Killed);
    assert_eq!(attack, CommandOutcome::Ignored(IgnoreReason::Dead));
    assert_eq!(fight.agent().health(), 0.0);
    assert_eq!(fight.agent().state(), CombatState::Dead);
    assert!(fight.backends.animation.sections(Clip::Attack).is_empty());
}

#[test]
fn release_drops_dead_enemy_reference() {
    let mut fight = Fight::new(AgentConfig::default(), melee_profile(), 100.0);
    fight.detect_player();
    fight.with_agent(|agent, _, svc| assert!(agent.attack_combo(svc).is_executed()));

    {
        let player = fight.registry.player_mut(fight.player).unwrap();
        let mut svc = fight.backends.services();
        assert_eq!(player.take_damage(500.0, &mut svc), DamageOutcome::Killed);
    }

    let release = fight.with_agent(|agent, view, svc| agent.set_unoccupied(view.as_ref(), svc));

    assert_eq!(release, Release::Released);
    let agent = fight.agent();
    assert_eq!(agent.enemy(), None);
    assert!(!agent.enemy_detected());
    assert_eq!(agent.state(), CombatState::Unoccupied);
    assert_eq!(agent.combo_index(), 0);
}

#[test]
fn death_is_idempotent() {
    let mut fight = Fight::new(AgentConfig::default(), melee_profile(), 100.0);
    fight.backends.rng.push_int(1);

    let (first, second) = fight.with_agent(|agent, _, svc| {
        agent.schedule_evaluation(svc);
        assert!(agent.blocking(svc).is_executed());
        (agent.death(svc), agent.death(svc))
    });

    assert!(first);
    assert!(!second);
    assert_eq!(fight.backends.animation.sections(Clip::Death), ["Death02"]);
    assert_eq!(fight.backends.animation.stopped.len(), 1);
    assert!(fight.backends.timers.is_empty());
    assert_eq!(fight.backends.navigation.stopped, [fight.agent]);

    // A late completion signal pins the corpse instead of reviving it.
    let release = fight.with_agent(|agent, view, svc| {
        assert_eq!(agent.schedule_evaluation(svc), None);
        agent.set_unoccupied(view.as_ref(), svc)
    });
    assert_eq!(release, Release::Dead);
    assert_eq!(fight.backends.animation.frozen, [fight.agent]);
}

#[test]
fn busy_agent_ignores_new_actions() {
    let mut fight = Fight::new(AgentConfig::default(), melee_profile(), 100.0);
    fight.detect_player();

    fight.with_agent(|agent, view, svc| {
        assert!(agent.attack_combo(svc).is_executed());
        let busy = CommandOutcome::Ignored(IgnoreReason::Busy(CombatState::Attacking));
        assert_eq!(agent.blocking(svc), busy);
        assert_eq!(agent.dodging(svc), busy);
        assert_eq!(agent.ranged_attack(svc), busy);
        assert_eq!(agent.strafe_around_enemy(view.as_ref(), svc), busy);
        assert_eq!(agent.seek_enemy(view.as_ref(), svc), busy);
        assert!(agent.can_block() && agent.can_dodge() && agent.can_strafe());
    });
    assert_eq!(fight.agent().state(), CombatState::Attacking);
    assert!(fight.backends.navigation.orders.is_empty());
}

#[test]
fn melee_combo_requires_range() {
    let mut fight = Fight::new(AgentConfig::default(), melee_profile(), 400.0);
    fight.detect_player();

    let outcome = fight.with_agent(|agent, _, svc| agent.attack_combo(svc));

    assert_eq!(outcome, CommandOutcome::Ignored(IgnoreReason::OutOfRange));
    assert!(fight.agent().in_ranged_range());
    assert_eq!(fight.agent().state(), CombatState::Unoccupied);
}

#[test]
fn seek_issues_move_and_releases_immediately() {
    let mut fight = Fight::new(AgentConfig::default(), melee_profile(), 900.0);
    fight.detect_player();

    let outcome = fight.with_agent(|agent, view, svc| agent.seek_enemy(view.as_ref(), svc));

    assert_eq!(outcome, CommandOutcome::Executed);
    assert_eq!(fight.agent().state(), CombatState::Unoccupied);
    let order = fight.backends.navigation.orders[0];
    assert_eq!(order.destination.x, 900.0);
    assert!(order.stop_on_overlap);
}

#[test]
fn passive_agents_do_not_seek() {
    let mut config = AgentConfig::default();
    config.aggressive = false;
    let mut fight = Fight::new(config, melee_profile(), 900.0);
    fight.detect_player();

    let outcome = fight.with_agent(|agent, view, svc| agent.seek_enemy(view.as_ref(), svc));

    assert_eq!(outcome, CommandOutcome::Ignored(IgnoreReason::NotAggressive));
    assert!(fight.backends.navigation.orders.is_empty());
}

#[test]
fn strafe_direction_is_held_until_cooldown_expires() {
    let mut fight = Fight::new(AgentConfig::default(), melee_profile(), 100.0);
    fight.detect_player();
    // First roll picks Left, a second roll would pick Right.
    fight.backends.rng.push_int(1);
    fight.backends.rng.push_int(2);

    fight.with_agent(|agent, view, svc| {
        assert!(agent.strafe_around_enemy(view.as_ref(), svc).is_executed());
        assert_eq!(agent.state(), CombatState::Unoccupied);
        assert!(!agent.can_strafe());
        assert_eq!(agent.strafe_direction(), StrafeDirection::Left);
        let first = agent.cooldown_timer(Cooldown::Strafe).unwrap();

        assert!(agent.strafe_around_enemy(view.as_ref(), svc).is_executed());
        assert_eq!(agent.strafe_direction(), StrafeDirection::Left);
        let second = agent.cooldown_timer(Cooldown::Strafe).unwrap();
        assert_ne!(first, second);

        agent.cooldown_expired(Cooldown::Strafe, second);
        assert!(agent.can_strafe());
        assert_eq!(agent.strafe_direction(), StrafeDirection::None);
    });

    // Facing +x, a left strafe of 300 lands at y = -300.
    let order = fight.backends.navigation.orders[0];
    assert!(order.destination.x.abs() < 1e-3);
    assert!((order.destination.y + 300.0).abs() < 1e-3);
}

#[test]
fn stale_cooldown_expiry_keeps_the_newer_lockout() {
    let mut fight = Fight::new(AgentConfig::default(), melee_profile(), 100.0);
    fight.detect_player();

    fight.with_agent(|agent, view, svc| {
        assert!(agent.strafe_around_enemy(view.as_ref(), svc).is_executed());
        let first = agent.cooldown_timer(Cooldown::Strafe).unwrap();
        assert!(agent.strafe_around_enemy(view.as_ref(), svc).is_executed());
        let second = agent.cooldown_timer(Cooldown::Strafe).unwrap();

        // The first timer was cancelled by the re-arm; a late report of it
        // must not unlock the ability.
        assert!(!agent.cooldown_expired(Cooldown::Strafe, first));
        assert!(!agent.can_strafe());
        assert_eq!(agent.cooldown_timer(Cooldown::Strafe), Some(second));

        // A token belonging to another cooldown is ignored as well.
        assert!(!agent.cooldown_expired(Cooldown::Block, second));

        assert!(agent.cooldown_expired(Cooldown::Strafe, second));
        assert!(agent.can_strafe());
        assert!(!agent.cooldown_expired(Cooldown::Strafe, second));
    });
}

#[test]
fn animation_failure_releases_immediately() {
    let mut fight = Fight::new(AgentConfig::default(), melee_profile(), 100.0);
    fight.detect_player();
    fight.backends.animation.missing = true;

    let outcome = fight.with_agent(|agent, _, svc| agent.attack_combo(svc));

    assert!(matches!(outcome, CommandOutcome::Failed(_)));
    assert_eq!(fight.agent().state(), CombatState::Unoccupied);
    assert!(fight.backends.timers.is_empty());
}

#[test]
fn action_timeout_fallback_releases_the_agent() {
    let mut fight = Fight::new(AgentConfig::default(), melee_profile(), 100.0);
    fight.detect_player();
    fight.with_agent(|agent, _, svc| assert!(agent.attack_combo(svc).is_executed()));

    assert_eq!(fight.backends.timers.pop_due(2.9), None);
    let (_, task) = fight.backends.timers.pop_due(3.0).unwrap();
    assert_eq!(task, TimerTask::ActionTimeout { agent: fight.agent });

    fight.with_agent(|agent, view, svc| agent.set_unoccupied(view.as_ref(), svc));
    assert_eq!(fight.agent().state(), CombatState::Unoccupied);
}

#[test]
fn completion_signal_cancels_the_timeout() {
    let mut fight = Fight::new(AgentConfig::default(), melee_profile(), 100.0);
    fight.detect_player();

    fight.with_agent(|agent, view, svc| {
        assert!(agent.attack_combo(svc).is_executed());
        agent.set_unoccupied(view.as_ref(), svc)
    });

    assert_eq!(fight.backends.timers.pop_due(10.0), None);
}

#[test]
fn patrol_runs_until_move_completes() {
    let mut config = AgentConfig::default();
    config.can_patrol = true;
    let mut fight = Fight::new(config, melee_profile(), 100.0);

    let evaluation = fight.with_agent(|agent, view, svc| agent.evaluate(view.as_ref(), svc));
    assert!(matches!(
        evaluation,
        Evaluation::Idle {
            patrol: Some(CommandOutcome::Executed),
            ..
        }
    ));
    assert_eq!(fight.agent().state(), CombatState::Patrol);

    let request = fight.agent().pending_move().unwrap();
    let released =
        fight.with_agent(|agent, _, svc| agent.move_completed(request, false, svc));
    assert!(released);
    assert_eq!(fight.agent().state(), CombatState::Unoccupied);
}

#[test]
fn detecting_an_enemy_interrupts_patrol() {
    let mut config = AgentConfig::default();
    config.can_patrol = true;
    let mut fight = Fight::new(config, melee_profile(), 100.0);
    fight.with_agent(|agent, _, svc| assert!(agent.patrol(svc).is_executed()));

    let perception = fight.with_agent(|agent, view, svc| {
        agent.on_actor_observed(&view.unwrap(), 1.0, svc)
    });

    assert_eq!(perception, Perception::Detected(fight.player));
    assert_eq!(fight.agent().state(), CombatState::Unoccupied);
    assert_eq!(fight.backends.navigation.stopped, [fight.agent]);
}

#[test]
fn losing_the_stimulus_clears_the_enemy() {
    let mut fight = Fight::new(AgentConfig::default(), melee_profile(), 100.0);
    fight.detect_player();
    assert!(fight.agent().in_attack_range());

    let perception = fight.with_agent(|agent, view, svc| {
        agent.on_actor_observed(&view.unwrap(), 0.0, svc)
    });

    assert_eq!(perception, Perception::Lost(fight.player));
    assert_eq!(fight.agent().enemy(), None);
    assert!(!fight.agent().in_attack_range());
}

#[test]
fn gated_evaluation_skips_scoring_without_enemy() {
    let mut config = AgentConfig::default();
    config.evaluate_only_when_enemy_detected = true;
    let mut fight = Fight::new(config, melee_profile(), 100.0);

    let evaluation = fight.with_agent(|agent, view, svc| agent.evaluate(view.as_ref(), svc));

    assert_eq!(
        evaluation,
        Evaluation::Idle {
            scores: None,
            patrol: None
        }
    );
}

#[test]
fn zero_evaluation_roll_is_floored_to_a_positive_delay() {
    let mut config = AgentConfig::default();
    config.evaluation_period = CooldownRange::new(0.0, 1.0);
    let mut fight = Fight::new(config, melee_profile(), 100.0);

    // The empty script rolls 0.0, the bottom of the period.
    assert!(fight.with_agent(|agent, _, svc| agent.schedule_evaluation(svc)).is_some());

    let timers = &mut fight.backends.timers;
    assert!(timers.pop_due(0.0).is_none());
    let (_, task) = timers.pop_due(f64::from(MIN_EVALUATION_DELAY)).unwrap();
    assert!(matches!(task, TimerTask::Evaluate { .. }));
}

#[test]
fn defensive_abilities_fire_against_a_swinging_enemy() {
    let profile = CombatBehaviorProfile::new(0.0, 1.0, 0.0, 0.0, 0.0);
    let mut fight = Fight::new(AgentConfig::default(), profile, 100.0);
    fight.detect_player();
    {
        let player = fight.registry.player_mut(fight.player).unwrap();
        let mut svc = fight.backends.services();
        assert!(player.attack_combo(&mut svc).is_executed());
    }
    fight.backends.rng.push_float(0.5);

    let evaluation = fight.with_agent(|agent, view, svc| agent.evaluate(view.as_ref(), svc));

    assert_eq!(evaluation.ability(), Some(Ability::Block));
    assert_eq!(fight.agent().state(), CombatState::Blocking);
}

#[test]
fn despawned_enemy_is_forgotten_on_refresh() {
    let mut fight = Fight::new(AgentConfig::default(), melee_profile(), 100.0);
    fight.detect_player();
    fight.registry.despawn(fight.player);

    fight.with_agent(|agent, view, _| {
        assert!(view.is_none());
        agent.refresh_ranges(view.as_ref());
    });

    assert_eq!(fight.agent().enemy(), None);
    assert!(!fight.agent().enemy_detected());
}
