//! Simulation session
//!
//! Owns the maze, the world probe geometry, the spawn director, and the
//! player, and drives them in a fixed per-tick order. Hosts write the
//! player's position and facing each frame, call [`Session::tick`], and
//! read events back out.

use glam::Vec3;

use crate::maze::{self, Layout, LayoutError, MazeGrid};
use crate::nav::{AgentNavigator, GridWorld, NavAction, NavGrid, NavigatorConfig, find_path};
use crate::sim::{
    AgentId, CombatConfig, CombatController, DamageOutcome, EventQueue, PlayerState, SimEvent,
    SpawnConfig, SpawnDirector,
};

/// Session construction parameters.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Requested maze width in cells, rounded up to fit the lattice
    pub width: usize,
    /// Requested maze height in cells
    pub height: usize,
    /// Corridor width in cells
    pub corridor_width: usize,
    /// Probability of re-walling each dead end after generation
    pub extra_wall_probability: f32,
    /// Hand-authored layout; bypasses generation entirely
    pub manual_layout: Option<Layout>,
    /// World-space size of one maze cell
    pub cell_size: f32,
    /// RNG seed for generation and spawning
    pub seed: u64,
    /// Spawn director tuning
    pub spawn: SpawnConfig,
    /// Combat tuning
    pub combat: CombatConfig,
    /// Navigator tuning
    pub navigator: NavigatorConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 21,
            height: 21,
            corridor_width: 2,
            extra_wall_probability: 0.0,
            manual_layout: None,
            cell_size: 4.0,
            seed: 0,
            spawn: SpawnConfig::default(),
            combat: CombatConfig::default(),
            navigator: NavigatorConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Set the requested maze dimensions.
    #[must_use]
    pub fn with_dimensions(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the corridor width.
    #[must_use]
    pub fn with_corridor_width(mut self, corridor_width: usize) -> Self {
        self.corridor_width = corridor_width;
        self
    }

    /// Set the dead-end re-walling probability.
    #[must_use]
    pub fn with_extra_walls(mut self, probability: f32) -> Self {
        self.extra_wall_probability = probability;
        self
    }

    /// Use a hand-authored layout instead of generating one.
    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.manual_layout = Some(layout);
        self
    }

    /// Set the world-space cell size.
    #[must_use]
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the spawn director tuning.
    #[must_use]
    pub fn with_spawn(mut self, spawn: SpawnConfig) -> Self {
        self.spawn = spawn;
        self
    }

    /// Set the combat tuning.
    #[must_use]
    pub fn with_combat(mut self, combat: CombatConfig) -> Self {
        self.combat = combat;
        self
    }

    /// Set the navigator tuning.
    #[must_use]
    pub fn with_navigator(mut self, navigator: NavigatorConfig) -> Self {
        self.navigator = navigator;
        self
    }
}

/// A running dungeon-crawl simulation.
pub struct Session {
    grid: MazeGrid,
    nav_grid: NavGrid,
    world: GridWorld,
    cell_size: f32,
    start_cell: (usize, usize),
    director: SpawnDirector,
    navigator: AgentNavigator,
    combat: CombatController,
    events: EventQueue,
    player: PlayerState,
    rng: fastrand::Rng,
    clock: f32,
    score: u32,
    game_over: bool,
}

impl Session {
    /// Build a session: generate or load the maze, place the player at the
    /// start marker, and arm the spawn director.
    ///
    /// # Errors
    ///
    /// Returns an error if a manual layout is invalid or carries no
    /// player-start marker.
    pub fn new(config: SessionConfig) -> Result<Self, LayoutError> {
        let mut rng = fastrand::Rng::with_seed(config.seed);

        let (mut grid, start) = match config.manual_layout {
            Some(layout) => {
                let grid = layout.into_grid()?;
                let start = grid.find_start().ok_or(LayoutError::MissingStart)?;
                (grid, start)
            }
            None => {
                let (mut grid, sx, sy) = maze::generate(
                    config.width,
                    config.height,
                    config.corridor_width,
                    None,
                    &mut rng,
                );
                if config.extra_wall_probability > 0.0 {
                    maze::add_extra_walls(
                        &mut grid,
                        config.corridor_width,
                        config.extra_wall_probability,
                        &mut rng,
                    );
                }
                (grid, (sx, sy))
            }
        };
        grid.consume_start();

        let nav_grid = NavGrid::from_maze(&grid);
        let world = GridWorld::new(&grid, config.cell_size);

        // Agents never spawn on the player's start cell.
        let spawn_points: Vec<Vec3> = grid
            .floor_cells()
            .filter(|&cell| cell != start)
            .map(|(x, y)| world.cell_to_world(x, y))
            .collect();

        let player = PlayerState::at(world.cell_to_world(start.0, start.1) + Vec3::Y);
        log::info!(
            "session started: {}x{} maze, {} spawn cells, player at {:?}",
            grid.width(),
            grid.height(),
            spawn_points.len(),
            player.position
        );
        let director = SpawnDirector::new(config.spawn, spawn_points, 0.0);

        Ok(Self {
            grid,
            nav_grid,
            world,
            cell_size: config.cell_size,
            start_cell: start,
            director,
            navigator: AgentNavigator::new(config.navigator),
            combat: CombatController::new(config.combat),
            events: EventQueue::new(),
            player,
            rng,
            clock: 0.0,
            score: 0,
            game_over: false,
        })
    }

    /// Advance the simulation by `dt` simulated seconds.
    ///
    /// Order within a tick: clock, event buffer swap, player snapshot,
    /// spawn timers, per-agent knockback or steering plus attacks, reap,
    /// game-over check. A finished session ignores further ticks.
    pub fn tick(&mut self, dt: f32) {
        if self.game_over {
            return;
        }
        self.clock += dt;
        let now = self.clock;
        self.events.swap();
        self.world.set_player(self.player.position, self.player.radius);

        let Session {
            director,
            navigator,
            combat,
            events,
            player,
            world,
            rng,
            ..
        } = self;

        director.tick(now, rng, events);

        for agent in director.agents_mut() {
            if !agent.is_active() {
                continue;
            }
            // Knockback suspends steering until it decays.
            if !combat.tick_knockback(agent, dt) {
                if navigator.tick(agent, player.position, world, dt) == NavAction::Attack {
                    combat.try_agent_attack(agent, player, world, now, events);
                }
            }
            if let Some(animation) = agent.animation.as_mut() {
                animation.advance(dt);
            }
        }

        self.director.reap();

        if self.player.health == 0 {
            self.game_over = true;
            log::info!(
                "game over: survived {:.1}s, score {}",
                self.director.survival_time(now),
                self.score
            );
        }
    }

    /// Swing the player's melee attack.
    ///
    /// Cooldown-gated; a kill awards score. Returns the struck agent and
    /// outcome, or `None` on a whiff or while on cooldown.
    pub fn player_attack(&mut self) -> Option<(AgentId, DamageOutcome)> {
        if self.game_over {
            return None;
        }
        let Session {
            director,
            combat,
            events,
            player,
            world,
            clock,
            score,
            ..
        } = self;

        let result =
            combat.resolve_player_attack(player, director.agents_mut(), world, *clock, events);
        if let Some((id, DamageOutcome::Killed)) = result {
            *score += combat.score_per_kill();
            log::info!("player killed {id}, score {score}");
        }
        result
    }

    /// Apply external damage to the player.
    ///
    /// Health saturates at 0 and reaching it ends the session, same as
    /// damage dealt by agents.
    pub fn player_take_damage(&mut self, amount: u32) {
        if self.game_over {
            return;
        }
        self.player.health = self.player.health.saturating_sub(amount);
        self.events.push(SimEvent::PlayerDamaged {
            amount,
            remaining: self.player.health,
        });
        if self.player.health == 0 {
            self.game_over = true;
            log::info!(
                "game over: survived {:.1}s, score {}",
                self.director.survival_time(self.clock),
                self.score
            );
        }
    }

    /// Spawn one agent from the configured template at a maze cell.
    pub fn spawn_agent(&mut self, cell: (usize, usize)) -> AgentId {
        let position = self.world.cell_to_world(cell.0, cell.1);
        let visual = self.director.template_visual();
        self.director.spawn_at(position, visual, &mut self.events)
    }

    /// Shortest cell path from a world position to the player.
    ///
    /// Returns the path excluding the start cell and including the goal
    /// cell; empty when no route exists, which also raises
    /// [`SimEvent::PathFailed`].
    pub fn path_to_player(&mut self, from: Vec3) -> Vec<(usize, usize)> {
        let start = self.world.world_to_cell(from);
        let goal = self.world.world_to_cell(self.player.position);
        let path = find_path(&self.nav_grid, start, goal);
        if path.is_empty() && start != goal {
            log::warn!("no path from {start:?} to player at {goal:?}");
            self.events.push(SimEvent::PathFailed {
                from: start,
                to: goal,
            });
        }
        path
    }

    /// The maze grid.
    #[must_use]
    pub fn grid(&self) -> &MazeGrid {
        &self.grid
    }

    /// World-space cell size.
    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell the player started on.
    #[must_use]
    pub fn start_cell(&self) -> (usize, usize) {
        self.start_cell
    }

    /// Player state; hosts write position and facing here between ticks.
    pub fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }

    /// Player state, read-only.
    #[must_use]
    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// Live agents.
    #[must_use]
    pub fn agents(&self) -> &[crate::sim::Agent] {
        self.director.agents()
    }

    /// Events from the previous tick.
    #[must_use]
    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    /// Drain the previous tick's events.
    pub fn drain_events(&mut self) -> impl Iterator<Item = SimEvent> + '_ {
        self.events.drain()
    }

    /// Current score.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Simulated seconds survived.
    #[must_use]
    pub fn survival_time(&self) -> f32 {
        self.director.survival_time(self.clock)
    }

    /// Whether the player has died.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::distance_xz;

    /// One east-west corridor, start at (1, 1), nine cells wide.
    fn corridor_layout() -> Layout {
        Layout {
            rows: vec![
                vec![0; 9],
                vec![0, 4, 1, 1, 1, 1, 1, 1, 0],
                vec![0; 9],
            ],
        }
    }

    /// Session with spawning disabled so tests control the population.
    fn corridor_session() -> Session {
        let spawn = SpawnConfig {
            initial_rate: 0,
            spawn_interval: 1e9,
            increment_interval: 1e9,
            ..SpawnConfig::default()
        };
        let config = SessionConfig::default()
            .with_layout(corridor_layout())
            .with_cell_size(1.0)
            .with_spawn(spawn);
        Session::new(config).unwrap()
    }

    #[test]
    fn test_missing_start_marker_is_fatal() {
        let layout = Layout {
            rows: vec![vec![0, 0], vec![0, 1]],
        };
        let config = SessionConfig::default().with_layout(layout);
        assert!(matches!(
            Session::new(config),
            Err(LayoutError::MissingStart)
        ));
    }

    #[test]
    fn test_player_starts_on_the_start_marker() {
        let session = corridor_session();
        assert_eq!(session.start_cell(), (1, 1));
        assert_eq!(session.player().position.x, 1.0);
        assert_eq!(session.player().position.z, 1.0);
        // Marker consumed; the grid carries plain floor there.
        assert!(session.grid().find_start().is_none());
        assert!(session.grid().is_floor(1, 1));
    }

    #[test]
    fn test_agent_approaches_and_attacks_on_cooldown() {
        let mut session = corridor_session();
        session.spawn_agent((7, 1));
        let dt = 0.05;

        // The agent closes in with strictly decreasing distance until it
        // reaches attack range, then holds position.
        let mut last = distance_xz(session.agents()[0].position, session.player().position);
        let mut damage_events = 0;
        for _ in 0..140 {
            session.tick(dt);
            damage_events += session
                .events()
                .iter()
                .filter(|e| matches!(e, SimEvent::PlayerDamaged { .. }))
                .count();
            let agent = &session.agents()[0];
            let dist = distance_xz(agent.position, session.player().position);
            if last > agent.attack_range {
                assert!(dist < last, "agent must close in while out of range");
            } else {
                assert!((dist - last).abs() < 1e-5, "agent holds position in range");
            }
            last = dist;
        }

        // 7.0 simulated seconds: walk-in plus attacks every 1.5s.
        assert_eq!(damage_events, 4);
        assert_eq!(session.player().health, 60);
    }

    #[test]
    fn test_player_kill_awards_score_and_reaps() {
        let mut session = corridor_session();
        session.spawn_agent((2, 1));
        session.player_mut().forward = Vec3::X;
        session.player_mut().attack_damage = 100;

        let (_, outcome) = session.player_attack().expect("agent in reach");
        assert_eq!(outcome, DamageOutcome::Killed);
        assert_eq!(session.score(), 10);

        session.tick(0.05);
        assert!(session.agents().is_empty(), "dead agent reaped");
    }

    #[test]
    fn test_player_swing_blocked_by_wall() {
        let layout = Layout {
            rows: vec![
                vec![0; 5],
                vec![0, 4, 0, 1, 0],
                vec![0; 5],
            ],
        };
        let spawn = SpawnConfig {
            initial_rate: 0,
            spawn_interval: 1e9,
            increment_interval: 1e9,
            ..SpawnConfig::default()
        };
        let config = SessionConfig::default()
            .with_layout(layout)
            .with_cell_size(1.0)
            .with_spawn(spawn);
        let mut session = Session::new(config).unwrap();
        session.spawn_agent((3, 1));
        session.player_mut().forward = Vec3::X;
        session.player_mut().attack_damage = 100;

        // The wall at (2, 1) occludes the agent at (3, 1) entirely.
        assert!(session.player_attack().is_none());
        assert_eq!(session.agents()[0].health, 100);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_external_player_damage_clamps_and_ends_session() {
        let mut session = corridor_session();

        session.player_take_damage(30);
        session.tick(0.05);
        assert_eq!(session.player().health, 70);
        assert!(session
            .events()
            .iter()
            .any(|e| matches!(e, SimEvent::PlayerDamaged { amount: 30, remaining: 70 })));

        session.player_take_damage(500);
        assert_eq!(session.player().health, 0, "health saturates at zero");
        assert!(session.is_game_over());

        // A finished session ignores further damage.
        session.player_take_damage(10);
        assert_eq!(session.player().health, 0);
    }

    #[test]
    fn test_game_over_when_player_dies() {
        let mut session = corridor_session();
        session.player_mut().health = 10;
        session.spawn_agent((2, 1));

        for _ in 0..40 {
            session.tick(0.05);
        }
        assert!(session.is_game_over());
        assert_eq!(session.player().health, 0);

        // Further ticks are inert.
        let clock_score = (session.survival_time(), session.score());
        session.tick(0.05);
        assert_eq!((session.survival_time(), session.score()), clock_score);
    }

    #[test]
    fn test_path_to_player_follows_the_corridor() {
        let mut session = corridor_session();
        let from = Vec3::new(7.0, 1.0, 1.0);

        let path = session.path_to_player(from);
        assert_eq!(path.len(), 6, "six steps from (7,1) to (1,1)");
        assert_eq!(path.last(), Some(&(1, 1)));
    }

    #[test]
    fn test_unreachable_path_raises_event() {
        let layout = Layout {
            rows: vec![
                vec![0; 5],
                vec![0, 4, 0, 1, 0],
                vec![0; 5],
            ],
        };
        let config = SessionConfig::default()
            .with_layout(layout)
            .with_cell_size(1.0)
            .with_spawn(SpawnConfig {
                initial_rate: 0,
                spawn_interval: 1e9,
                increment_interval: 1e9,
                ..SpawnConfig::default()
            });
        let mut session = Session::new(config).unwrap();

        let path = session.path_to_player(Vec3::new(3.0, 1.0, 1.0));
        assert!(path.is_empty());

        session.tick(0.05);
        assert!(session
            .events()
            .iter()
            .any(|e| matches!(e, SimEvent::PathFailed { from: (3, 1), to: (1, 1) })));
    }

    #[test]
    fn test_generated_session_spawns_waves() {
        let config = SessionConfig::default()
            .with_dimensions(17, 17)
            .with_corridor_width(1)
            .with_seed(42)
            .with_cell_size(2.0);
        let mut session = Session::new(config).unwrap();

        session.tick(0.05);
        assert_eq!(session.agents().len(), 2, "first wave fires immediately");

        session.tick(0.05);
        let spawned = session
            .events()
            .iter()
            .filter(|e| matches!(e, SimEvent::AgentSpawned { .. }))
            .count();
        assert_eq!(spawned, 2);
    }

    #[test]
    fn test_seeded_sessions_are_identical() {
        let build = || {
            Session::new(
                SessionConfig::default()
                    .with_dimensions(21, 21)
                    .with_seed(7),
            )
            .unwrap()
        };
        let mut a = build();
        let mut b = build();
        for _ in 0..50 {
            a.tick(0.05);
            b.tick(0.05);
        }

        assert_eq!(a.agents().len(), b.agents().len());
        for (x, y) in a.agents().iter().zip(b.agents()) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.position, y.position);
        }
    }
}
