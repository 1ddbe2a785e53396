//! Headless demo run
//!
//! Generates a maze, lets the spawn director escalate for a minute of
//! simulated time, and scripts the player to fight back from the start
//! cell. Events and a periodic status line go to the log.

use mazecrawl::prelude::*;

/// Fixed simulation step.
const DT: f32 = 1.0 / 60.0;
/// Simulated seconds to run.
const RUN_TIME: f32 = 60.0;

fn main() {
    env_logger::init();

    let config = SessionConfig::default()
        .with_dimensions(21, 21)
        .with_corridor_width(2)
        .with_extra_walls(0.3)
        .with_seed(2024);

    let mut session = match Session::new(config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("failed to start session: {e}");
            std::process::exit(1);
        }
    };

    let mut next_status = 0.0;
    while !session.is_game_over() && session.survival_time() < RUN_TIME {
        face_nearest_agent(&mut session);
        session.tick(DT);

        for event in session.drain_events() {
            match event {
                SimEvent::AgentSpawned { id, position } => {
                    log::info!("{id} spawned at ({:.1}, {:.1})", position.x, position.z);
                }
                SimEvent::AgentDied { id, .. } => log::info!("{id} slain"),
                SimEvent::PlayerDamaged { amount, remaining } => {
                    log::info!("player hit for {amount}, {remaining} hp left");
                }
                SimEvent::SpawnRateRaised { rate } => {
                    log::info!("waves escalate to {rate} agents");
                }
                _ => {}
            }
        }

        if let Some((id, DamageOutcome::Killed)) = session.player_attack() {
            log::debug!("swing killed {id}");
        }

        if session.survival_time() >= next_status {
            log::info!(
                "t={:5.1}s  score={:<4} hp={:<3} agents={}",
                session.survival_time(),
                session.score(),
                session.player().health,
                session.agents().len()
            );
            next_status += 5.0;
        }
    }

    let outcome = if session.is_game_over() { "died" } else { "survived" };
    println!(
        "{outcome} after {:.1}s with score {} and {} agents on the field",
        session.survival_time(),
        session.score(),
        session.agents().len()
    );
}

/// Point the player at the closest live agent so scripted swings connect.
fn face_nearest_agent(session: &mut Session) {
    let player_position = session.player().position;
    let nearest = session
        .agents()
        .iter()
        .filter(|agent| agent.is_active())
        .min_by(|a, b| {
            distance_xz(a.position, player_position)
                .total_cmp(&distance_xz(b.position, player_position))
        })
        .map(|agent| agent.position);

    if let Some(target) = nearest {
        let mut forward = target - player_position;
        forward.y = 0.0;
        let forward = forward.normalize_or_zero();
        if forward != Vec3::ZERO {
            session.player_mut().forward = forward;
        }
    }
}
