use crate::config::{ContactRule, EngineOptions};
use crate::constants::{
    hunt_threshold_tick, CAPTURE_SCORE, CHASE_DURATION_TICKS, COLLECTIBLE_SCORE,
    CONTACT_RADIUS, POWER_COLLECTIBLE_SCORE, POWER_DURATION_TICKS, SCATTER_DURATION_TICKS,
    SEEKER_ALIGN_FACTOR, SEEKER_SPEED,
};
use crate::error::ConfigError;
use crate::hunter::{Hunter, PursuitContext};
use crate::maze::{Grid, Mover};
use crate::pathing::{direction_to_nearest_collectible, direction_toward};
use crate::rng::{RandomSource, Rng};
use crate::types::{
    Cell, Direction, GlobalMode, HunterMode, Position, RuntimeEvent, SeekerView, SessionStatus,
    Snapshot, Vec2,
};

mod hunter_system;
mod lifecycle;
mod seeker_system;

#[derive(Clone, Debug)]
struct SeekerState {
    pos: Position,
    dir: Direction,
    next_dir: Direction,
    autopilot: bool,
}

#[derive(Clone, Debug)]
pub struct GameEngine<R: RandomSource = Rng> {
    options: EngineOptions,
    pristine: Grid,
    grid: Grid,
    rng: R,
    seeker: SeekerState,
    hunters: Vec<Hunter>,
    attractor: Option<Vec2>,
    events: Vec<RuntimeEvent>,

    status: SessionStatus,
    level: u32,
    score: u32,
    lives: u32,
    global_mode: GlobalMode,
    mode_timer: u32,
    collectibles_remaining: u32,
    power_ticks_left: u32,
    awaiting_input: bool,
    tick_counter: u64,
    play_ticks: u64,
    life_ticks: u64,
}

impl GameEngine<Rng> {
    pub fn with_seed(options: EngineOptions, seed: u32) -> Result<Self, ConfigError> {
        Self::new(options, Rng::new(seed))
    }
}

impl<R: RandomSource> GameEngine<R> {
    pub fn new(options: EngineOptions, rng: R) -> Result<Self, ConfigError> {
        options.validate()?;
        let pristine = options.layout.build()?;
        let layout = &options.layout;
        let hunters = layout
            .hunter_homes
            .iter()
            .zip(layout.scatter_corners.iter())
            .enumerate()
            .map(|(exit_order, (home, corner))| Hunter::new(exit_order, *home, *corner))
            .collect();
        let seeker = SeekerState {
            pos: Position::from_cell(layout.seeker_start),
            dir: Direction::None,
            next_dir: Direction::None,
            autopilot: false,
        };
        let lives = options.starting_lives;

        let mut engine = Self {
            grid: pristine.clone(),
            pristine,
            rng,
            seeker,
            hunters,
            attractor: None,
            events: Vec::new(),
            status: SessionStatus::Idle,
            level: 1,
            score: 0,
            lives,
            global_mode: GlobalMode::Scatter,
            mode_timer: 0,
            collectibles_remaining: 0,
            power_ticks_left: 0,
            awaiting_input: false,
            tick_counter: 0,
            play_ticks: 0,
            life_ticks: 0,
            options,
        };
        engine.init_level(1, 0, lives);
        Ok(engine)
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn hunters(&self) -> &[Hunter] {
        &self.hunters
    }

    pub fn step(&mut self) {
        if !self.status.is_running() {
            return;
        }
        if self.awaiting_input && !self.seeker.autopilot {
            if self.collectibles_remaining == 0 {
                self.win_level();
            }
            return;
        }
        self.tick_counter += 1;
        self.play_ticks += 1;
        self.life_ticks += 1;

        self.update_global_mode();
        self.update_seeker();
        self.update_power();
        self.release_hunters();
        let life_lost = self.update_hunters();
        if life_lost {
            self.lose_life();
        }
        if self.status.is_running() && self.collectibles_remaining == 0 {
            self.win_level();
        }
    }

    pub fn build_snapshot(&mut self, include_events: bool) -> Snapshot {
        let snapshot = Snapshot {
            tick: self.tick_counter,
            play_ticks: self.play_ticks,
            level: self.level,
            score: self.score,
            lives: self.lives,
            status: self.status,
            global_mode: self.global_mode,
            mode_timer: self.mode_timer,
            collectibles_remaining: self.collectibles_remaining,
            power_ticks_left: self.power_ticks_left,
            awaiting_input: self.awaiting_input,
            seeker: SeekerView {
                x: self.seeker.pos.x,
                y: self.seeker.pos.y,
                dir: self.seeker.dir,
                next_dir: self.seeker.next_dir,
                autopilot: self.seeker.autopilot,
            },
            hunters: self.hunters.iter().map(Hunter::to_view).collect(),
            attractor: self.attractor,
            tiles: self.grid.tiles(),
            events: if include_events {
                self.events.clone()
            } else {
                Vec::new()
            },
        };
        if include_events {
            self.events.clear();
        }
        snapshot
    }

    fn is_hunting(&self) -> bool {
        self.play_ticks >= hunt_threshold_tick(self.level)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ContactRule, EngineOptions};
    use crate::constants::{
        release_tick, CAPTURE_SCORE, CHASE_DURATION_TICKS, CONTACT_RADIUS,
        POWER_COLLECTIBLE_SCORE, POWER_DURATION_TICKS, RESPAWN_TICKS, SCATTER_DURATION_TICKS,
        STUN_GRACE_TICKS, STUN_TICKS,
    };
    use crate::engine::GameEngine;
    use crate::maze::{MazeLayout, Mover};
    use crate::rng::{Rng, ScriptedRandom};
    use crate::types::{
        Cell, Direction, GlobalMode, HunterMode, Position, RuntimeEvent, SessionStatus, Vec2,
    };

    fn engine() -> GameEngine {
        GameEngine::with_seed(EngineOptions::default(), 7).expect("default options are valid")
    }

    fn engine_with(options: EngineOptions) -> GameEngine<ScriptedRandom> {
        GameEngine::new(options, ScriptedRandom::constant(0.3)).expect("options are valid")
    }

    fn empty_layout() -> MazeLayout {
        let mut layout = MazeLayout::classic();
        layout.rows = layout
            .rows
            .iter()
            .map(|row| row.replace(['.', 'o'], " "))
            .collect();
        layout
    }

    fn release_hunter_at<R: crate::rng::RandomSource>(
        engine: &mut GameEngine<R>,
        idx: usize,
        cell: Vec2,
        mode: HunterMode,
    ) {
        let hunter = &mut engine.hunters[idx];
        hunter.mode = mode;
        hunter.pos = Position::from_cell(cell);
        hunter.dir = Direction::Left;
    }

    #[test]
    fn new_engine_is_idle_with_a_full_maze() {
        let mut engine = engine();
        let snapshot = engine.build_snapshot(true);
        assert_eq!(snapshot.status, SessionStatus::Idle);
        assert_eq!(snapshot.lives, 3);
        assert_eq!(snapshot.level, 1);
        assert_eq!(snapshot.collectibles_remaining, engine.grid.count_collectibles());
        assert_eq!(snapshot.hunters.len(), 4);
        assert_eq!(snapshot.hunters[3].id, "hunter_3");
        assert!(snapshot
            .hunters
            .iter()
            .all(|hunter| hunter.mode == HunterMode::Confined));
    }

    #[test]
    fn step_is_a_no_op_while_idle() {
        let mut engine = engine();
        engine.step();
        let snapshot = engine.build_snapshot(false);
        assert_eq!(snapshot.tick, 0);
        assert_eq!(snapshot.seeker.x, 9.0);
    }

    #[test]
    fn same_seed_produces_same_progression() {
        let mut a = engine();
        let mut b = engine();
        a.start_session(true, 4, 0, 3);
        b.start_session(true, 4, 0, 3);
        for _ in 0..3_000 {
            a.step();
            b.step();
            let sa = a.build_snapshot(false);
            let sb = b.build_snapshot(false);
            assert_eq!(sa.seeker.x.to_bits(), sb.seeker.x.to_bits());
            assert_eq!(sa.seeker.y.to_bits(), sb.seeker.y.to_bits());
            assert_eq!(sa.score, sb.score);
            for (ha, hb) in sa.hunters.iter().zip(sb.hunters.iter()) {
                assert_eq!(ha.x.to_bits(), hb.x.to_bits());
                assert_eq!(ha.y.to_bits(), hb.y.to_bits());
                assert_eq!(ha.mode, hb.mode);
            }
            if !sa.status.is_running() {
                assert_eq!(sa.status, sb.status);
                break;
            }
        }
    }

    #[test]
    fn build_snapshot_drains_events_when_requested() {
        let mut engine = engine();
        engine.start_session(true, 1, 0, 3);
        let kept = engine.build_snapshot(false);
        assert!(kept.events.is_empty());
        let first = engine.build_snapshot(true);
        let second = engine.build_snapshot(true);
        assert!(matches!(
            first.events.as_slice(),
            [RuntimeEvent::LevelStarted { level: 1 }]
        ));
        assert!(second.events.is_empty());
    }

    #[test]
    fn manual_session_waits_for_the_first_input() {
        let mut engine = engine();
        engine.start_session(false, 1, 0, 3);
        for _ in 0..30 {
            engine.step();
        }
        let snapshot = engine.build_snapshot(false);
        assert!(snapshot.awaiting_input);
        assert_eq!(snapshot.play_ticks, 0);
        assert_eq!((snapshot.seeker.x, snapshot.seeker.y), (9.0, 15.0));

        engine.set_next_direction(Direction::Left);
        engine.step();
        let snapshot = engine.build_snapshot(false);
        assert!(!snapshot.awaiting_input);
        assert_eq!(snapshot.play_ticks, 1);
        assert_eq!(snapshot.seeker.dir, Direction::Left);
        assert!(snapshot.seeker.x < 9.0);
    }

    #[test]
    fn input_is_ignored_outside_a_running_session() {
        let mut engine = engine();
        engine.set_next_direction(Direction::Left);
        assert!(!engine.set_attractor(1, 1));
        let snapshot = engine.build_snapshot(false);
        assert_eq!(snapshot.seeker.next_dir, Direction::None);
        assert_eq!(snapshot.attractor, None);
    }

    #[test]
    fn global_mode_flips_to_chase_after_exactly_the_scatter_duration() {
        let mut engine = engine();
        engine.start_session(true, 1, 0, 3);
        for _ in 0..SCATTER_DURATION_TICKS - 1 {
            engine.step();
        }
        assert_eq!(engine.global_mode, GlobalMode::Scatter);
        assert_eq!(engine.mode_timer, SCATTER_DURATION_TICKS - 1);

        engine.step();
        let snapshot = engine.build_snapshot(true);
        assert_eq!(snapshot.global_mode, GlobalMode::Chase);
        assert_eq!(snapshot.mode_timer, 0);
        assert!(snapshot.events.iter().any(|event| matches!(
            event,
            RuntimeEvent::ModeChanged {
                mode: GlobalMode::Chase
            }
        )));
    }

    #[test]
    fn global_mode_returns_to_scatter_after_the_chase_duration() {
        let mut engine = engine();
        engine.start_session(false, 1, 0, 3);
        engine.set_next_direction(Direction::Up);
        for _ in 0..SCATTER_DURATION_TICKS {
            engine.step();
        }
        assert_eq!(engine.global_mode, GlobalMode::Chase);
        engine.build_snapshot(true);

        for _ in 0..CHASE_DURATION_TICKS - 1 {
            engine.step();
        }
        assert_eq!(engine.global_mode, GlobalMode::Chase);
        assert_eq!(engine.mode_timer, CHASE_DURATION_TICKS - 1);

        engine.step();
        let snapshot = engine.build_snapshot(true);
        assert_eq!(snapshot.global_mode, GlobalMode::Scatter);
        assert_eq!(snapshot.mode_timer, 0);
        assert!(matches!(
            snapshot.events.as_slice(),
            [RuntimeEvent::ModeChanged {
                mode: GlobalMode::Scatter
            }]
        ));
    }

    #[test]
    fn hunt_threshold_pins_chase() {
        let mut engine = engine();
        engine.start_session(true, 6, 0, 3);
        engine.step();
        assert_eq!(engine.global_mode, GlobalMode::Chase);
        for _ in 0..CHASE_DURATION_TICKS + 10 {
            engine.step();
            if !engine.status.is_running() {
                break;
            }
            assert_eq!(engine.global_mode, GlobalMode::Chase);
        }
    }

    #[test]
    fn power_collectible_frightens_released_hunters_only() {
        let mut engine = engine();
        engine.start_session(false, 1, 0, 3);
        engine.set_next_direction(Direction::Right);
        engine.seeker.pos = Position::new(1.0, 15.0);
        release_hunter_at(&mut engine, 0, Vec2::new(17, 1), HunterMode::Scatter);
        engine.hunters[1].mode = HunterMode::Releasing;
        let before = engine.collectibles_remaining;

        engine.step();
        let snapshot = engine.build_snapshot(true);
        assert_eq!(snapshot.status, SessionStatus::PowerActive);
        assert_eq!(snapshot.score, POWER_COLLECTIBLE_SCORE);
        assert_eq!(snapshot.collectibles_remaining, before - 1);
        assert_eq!(snapshot.power_ticks_left, POWER_DURATION_TICKS - 1);
        assert!(snapshot.hunters[0].vulnerable);
        assert!(!snapshot.hunters[1].vulnerable);
        assert!(!snapshot.hunters[2].vulnerable);
        assert_eq!(engine.grid.cell(1, 15), Cell::Collected);
        assert!(snapshot
            .events
            .iter()
            .any(|event| matches!(event, RuntimeEvent::PowerTaken { x: 1, y: 15 })));
    }

    #[test]
    fn power_expires_and_clears_vulnerability() {
        let mut engine = engine();
        engine.start_session(false, 1, 0, 3);
        engine.set_next_direction(Direction::Right);
        engine.seeker.pos = Position::new(1.0, 15.0);
        release_hunter_at(&mut engine, 0, Vec2::new(17, 1), HunterMode::Scatter);
        engine.step();
        assert!(engine.hunters[0].vulnerable);

        for _ in 1..POWER_DURATION_TICKS {
            assert_eq!(engine.status, SessionStatus::PowerActive);
            engine.step();
        }
        let snapshot = engine.build_snapshot(true);
        assert_eq!(snapshot.status, SessionStatus::Active);
        assert!(snapshot.hunters.iter().all(|hunter| !hunter.vulnerable));
        assert!(snapshot
            .events
            .iter()
            .any(|event| matches!(event, RuntimeEvent::PowerExpired)));
    }

    #[test]
    fn capturing_a_vulnerable_hunter_scores_and_sends_it_home() {
        let mut engine = engine();
        engine.start_session(false, 1, 0, 3);
        engine.set_next_direction(Direction::Left);
        release_hunter_at(&mut engine, 2, Vec2::new(9, 15), HunterMode::Chase);
        engine.hunters[2].vulnerable = true;
        engine.status = SessionStatus::PowerActive;
        engine.power_ticks_left = 100;

        engine.step();
        let snapshot = engine.build_snapshot(true);
        let hunter = &engine.hunters[2];
        assert_eq!(snapshot.score, CAPTURE_SCORE);
        assert_eq!(snapshot.lives, 3);
        assert_eq!(hunter.mode, HunterMode::Confined);
        assert!(!hunter.vulnerable);
        assert_eq!(hunter.pos, Position::from_cell(hunter.home));
        assert_eq!(hunter.respawn_ticks, RESPAWN_TICKS);
        assert!(!snapshot.hunters[2].visible);
        assert!(snapshot.events.iter().any(|event| matches!(
            event,
            RuntimeEvent::HunterCaptured {
                hunter_id,
                bonus: CAPTURE_SCORE,
            } if hunter_id == "hunter_2"
        )));
    }

    #[test]
    fn respawning_hunter_is_excluded_from_contact() {
        let mut engine = engine();
        engine.start_session(false, 1, 0, 3);
        engine.set_next_direction(Direction::Left);
        engine.hunters[0].capture();
        engine.hunters[0].pos = Position::from_cell(Vec2::new(9, 15));
        engine.step();
        assert_eq!(engine.lives, 3);
        assert_eq!(engine.hunters[0].respawn_ticks, RESPAWN_TICKS - 1);
    }

    #[test]
    fn contact_costs_a_life_and_resets_positions() {
        let mut engine = engine();
        engine.start_session(false, 1, 120, 3);
        engine.set_next_direction(Direction::Left);
        release_hunter_at(&mut engine, 1, Vec2::new(9, 15), HunterMode::Chase);

        engine.step();
        let snapshot = engine.build_snapshot(true);
        assert_eq!(snapshot.lives, 2);
        assert_eq!(snapshot.status, SessionStatus::Active);
        assert_eq!(snapshot.score, 120);
        assert!(snapshot.awaiting_input);
        assert_eq!((snapshot.seeker.x, snapshot.seeker.y), (9.0, 15.0));
        assert_eq!(snapshot.seeker.dir, Direction::None);
        for (hunter, home) in snapshot.hunters.iter().zip(engine.options.layout.hunter_homes) {
            assert_eq!(hunter.mode, HunterMode::Confined);
            assert_eq!((hunter.x, hunter.y), (home.x as f32, home.y as f32));
        }
        assert!(snapshot
            .events
            .iter()
            .any(|event| matches!(event, RuntimeEvent::LifeLost { lives_left: 2 })));
    }

    #[test]
    fn contact_on_the_last_life_loses_the_session() {
        let mut engine = engine();
        engine.start_session(false, 1, 0, 1);
        engine.set_next_direction(Direction::Left);
        release_hunter_at(&mut engine, 1, Vec2::new(9, 15), HunterMode::Chase);

        engine.step();
        let snapshot = engine.build_snapshot(true);
        assert_eq!(snapshot.lives, 0);
        assert_eq!(snapshot.status, SessionStatus::Lost);
        assert!(snapshot
            .events
            .iter()
            .any(|event| matches!(event, RuntimeEvent::SessionLost)));

        engine.step();
        assert_eq!(engine.build_snapshot(false).tick, snapshot.tick);
    }

    #[test]
    fn stun_rule_freezes_the_hunter_instead_of_costing_a_life() {
        let mut engine = engine_with(EngineOptions {
            contact_rule: ContactRule::Stun,
            ..EngineOptions::default()
        });
        engine.start_session(false, 1, 0, 3);
        engine.set_next_direction(Direction::Left);
        release_hunter_at(&mut engine, 1, Vec2::new(9, 15), HunterMode::Chase);

        engine.step();
        let snapshot = engine.build_snapshot(true);
        assert_eq!(snapshot.lives, 3);
        assert!(snapshot.hunters[1].stunned);
        assert_eq!(engine.hunters[1].stun_ticks, STUN_TICKS);
        let frozen = engine.hunters[1].pos;
        engine.step();
        assert_eq!(engine.hunters[1].pos, frozen);
        assert!(snapshot.events.iter().any(|event| matches!(
            event,
            RuntimeEvent::HunterStunned { hunter_id } if hunter_id == "hunter_1"
        )));
    }

    #[test]
    fn stunned_hunter_turns_away_from_a_stationary_seeker() {
        let mut engine = engine_with(EngineOptions {
            contact_rule: ContactRule::Stun,
            ..EngineOptions::default()
        });
        engine.start_session(false, 1, 0, 3);
        engine.set_next_direction(Direction::Up);
        release_hunter_at(&mut engine, 1, Vec2::new(9, 15), HunterMode::Chase);
        engine.hunters[1].pos = Position::new(9.5, 15.0);

        engine.step();
        assert!(engine.hunters[1].is_stunned());
        assert_eq!(engine.hunters[1].pos, Position::new(9.5, 15.0));
        for _ in 0..STUN_TICKS {
            engine.step();
        }
        let hunter = &engine.hunters[1];
        assert!(!hunter.is_stunned());
        assert_eq!(hunter.dir, Direction::Right);
        assert!(hunter.pos.x > 9.5);

        for _ in 0..STUN_GRACE_TICKS {
            engine.step();
        }
        let snapshot = engine.build_snapshot(true);
        assert_eq!((snapshot.seeker.x, snapshot.seeker.y), (9.0, 15.0));
        assert_eq!(snapshot.lives, 3);
        let stuns = snapshot
            .events
            .iter()
            .filter(|event| matches!(event, RuntimeEvent::HunterStunned { .. }))
            .count();
        assert_eq!(stuns, 1);
        assert!(engine.hunters[1].pos.distance_to(engine.seeker.pos) > CONTACT_RADIUS);
    }

    #[test]
    fn empty_maze_wins_on_the_first_active_tick() {
        let mut engine = engine_with(EngineOptions {
            layout: empty_layout(),
            ..EngineOptions::default()
        });
        engine.start_session(false, 1, 0, 3);
        assert_eq!(engine.collectibles_remaining, 0);
        assert_eq!(engine.status, SessionStatus::Active);
        engine.step();
        let snapshot = engine.build_snapshot(true);
        assert_eq!(snapshot.status, SessionStatus::Won);
        assert_eq!(snapshot.collectibles_remaining, 0);
        assert!(snapshot
            .events
            .iter()
            .any(|event| matches!(event, RuntimeEvent::LevelWon { level: 1 })));
    }

    #[test]
    fn confined_hunters_stay_home_until_their_release_slot() {
        let mut engine = engine();
        engine.start_session(true, 1, 0, 3);
        let first_release = release_tick(1, 0);
        while engine.play_ticks + 1 < first_release && engine.status.is_running() {
            engine.step();
            for hunter in &engine.hunters {
                assert_eq!(hunter.mode, HunterMode::Confined);
                assert_eq!(hunter.pos, Position::from_cell(hunter.home));
            }
        }
    }

    #[test]
    fn released_hunter_leaves_through_the_gate() {
        let mut engine = engine();
        engine.start_session(true, 5, 0, 3);
        let mut released = false;
        for _ in 0..200 {
            engine.step();
            let snapshot = engine.build_snapshot(true);
            let left_house = snapshot.events.iter().any(|event| {
                matches!(
                    event,
                    RuntimeEvent::HunterReleased { hunter_id } if hunter_id == "hunter_0"
                )
            });
            if left_house {
                released = true;
                break;
            }
            if !snapshot.status.is_running() {
                break;
            }
        }
        assert!(released);
        assert!(engine.hunters[0].mode.is_released());
    }

    #[test]
    fn autopilot_run_keeps_score_and_collectibles_monotonic() {
        let mut engine = GameEngine::new(EngineOptions::default(), Rng::new(99)).expect("engine");
        engine.start_session(true, 1, 0, 3);
        let mut last = engine.build_snapshot(true);
        for _ in 0..6_000 {
            engine.step();
            let snapshot = engine.build_snapshot(true);
            assert!(snapshot.collectibles_remaining <= last.collectibles_remaining);
            assert!(snapshot.score >= last.score);
            if snapshot.status == SessionStatus::Won {
                assert_eq!(snapshot.collectibles_remaining, 0);
            }
            if snapshot.collectibles_remaining == 0 && snapshot.lives > 0 {
                assert_eq!(snapshot.status, SessionStatus::Won);
            }
            for hunter in &snapshot.hunters {
                if hunter.mode == HunterMode::Confined {
                    assert!(!hunter.vulnerable);
                }
            }
            let done = !snapshot.status.is_running();
            last = snapshot;
            if done {
                break;
            }
        }
        assert!(last.score > 0);
    }

    #[test]
    fn autopilot_warmup_holds_the_first_move() {
        let mut engine = engine_with(EngineOptions {
            autopilot_warmup_ticks: 30,
            ..EngineOptions::default()
        });
        engine.start_session(true, 1, 0, 3);
        for _ in 0..30 {
            engine.step();
        }
        assert_eq!(engine.seeker.pos, Position::new(9.0, 15.0));
        engine.step();
        assert_eq!(engine.seeker.dir, Direction::Left);
        assert!(engine.seeker.pos.x < 9.0);
    }

    #[test]
    fn attractor_steers_the_seeker_and_clears_on_arrival() {
        let mut engine = engine();
        engine.start_session(false, 1, 0, 3);
        assert!(!engine.set_attractor(0, 0));
        assert!(!engine.set_attractor(19, 3));
        assert!(!engine.set_attractor(9, 8));
        assert!(engine.build_snapshot(false).awaiting_input);

        assert!(engine.set_attractor(12, 15));
        assert!(!engine.awaiting_input);
        let mut arrived = false;
        for _ in 0..100 {
            engine.step();
            if engine.attractor.is_none() {
                arrived = true;
                break;
            }
        }
        assert!(arrived);
        assert_eq!(engine.seeker.pos, Position::new(12.0, 15.0));
        assert_eq!(engine.seeker.dir, Direction::None);
    }

    #[test]
    fn attractor_rejects_open_cells_the_seeker_cannot_reach() {
        let mut engine = engine();
        engine.start_session(true, 1, 0, 3);
        assert!(!engine.grid.is_blocked_cell(Vec2::new(9, 9), Mover::Seeker));
        assert!(!engine.set_attractor(9, 9));
        assert_eq!(engine.attractor, None);

        engine.step();
        assert_eq!(engine.seeker.dir, Direction::Left);
    }

    #[test]
    fn direction_request_clears_the_attractor() {
        let mut engine = engine();
        engine.start_session(false, 1, 0, 3);
        assert!(engine.set_attractor(12, 15));
        engine.set_next_direction(Direction::Left);
        assert_eq!(engine.attractor, None);
        assert_eq!(engine.seeker.next_dir, Direction::Left);
    }

    #[test]
    fn seeker_stops_at_walls() {
        let mut engine = engine();
        engine.start_session(false, 1, 0, 3);
        engine.set_next_direction(Direction::Up);
        engine.step();
        let snapshot = engine.build_snapshot(false);
        assert_eq!(snapshot.seeker.dir, Direction::None);
        assert_eq!(snapshot.seeker.next_dir, Direction::Up);
        assert_eq!((snapshot.seeker.x, snapshot.seeker.y), (9.0, 15.0));
    }

    #[test]
    fn buffered_turn_waits_for_an_open_cell_center() {
        let mut engine = engine();
        engine.start_session(false, 1, 0, 3);
        engine.set_next_direction(Direction::Left);
        engine.seeker.pos = Position::new(7.0, 15.0);
        engine.step();
        assert_eq!(engine.seeker.dir, Direction::Left);

        engine.set_next_direction(Direction::Up);
        let mut turned_at = None;
        for _ in 0..60 {
            engine.step();
            if engine.seeker.dir == Direction::Up {
                turned_at = Some(engine.seeker.pos.x);
                break;
            }
            assert_eq!(engine.seeker.dir, Direction::Left);
            assert_eq!(engine.seeker.next_dir, Direction::Up);
        }
        assert_eq!(turned_at, Some(4.0));
        assert_eq!(engine.seeker.next_dir, Direction::None);
        assert!(engine.seeker.pos.y < 15.0);
    }

    #[test]
    fn tunnel_wraps_the_seeker() {
        let mut engine = engine();
        engine.start_session(false, 1, 0, 3);
        engine.set_next_direction(Direction::Left);
        engine.seeker.pos = Position::new(0.0, 9.0);
        engine.step();
        assert!(engine.seeker.pos.x > 18.0);
        assert_eq!(engine.seeker.dir, Direction::Left);
    }

    #[test]
    fn advancing_keeps_score_and_lives_and_completes_after_the_final_level() {
        let mut engine = engine_with(EngineOptions {
            layout: empty_layout(),
            final_level: 2,
            ..EngineOptions::default()
        });
        engine.start_session(true, 1, 40, 2);
        engine.advance_to_next_level();
        assert_eq!(engine.level, 1);

        engine.step();
        assert_eq!(engine.status, SessionStatus::Won);
        engine.advance_to_next_level();
        assert_eq!(engine.level, 2);
        assert_eq!(engine.score, 40);
        assert_eq!(engine.lives, 2);
        assert_eq!(engine.status, SessionStatus::Active);
        assert!(engine.seeker.autopilot);

        engine.step();
        engine.advance_to_next_level();
        let snapshot = engine.build_snapshot(true);
        assert_eq!(snapshot.status, SessionStatus::Complete);
        assert!(snapshot
            .events
            .iter()
            .any(|event| matches!(event, RuntimeEvent::SessionComplete)));
    }

    #[test]
    fn abort_returns_to_idle() {
        let mut engine = engine();
        engine.start_session(false, 1, 0, 3);
        assert!(engine.set_attractor(12, 15));
        engine.abort_session();
        let snapshot = engine.build_snapshot(false);
        assert_eq!(snapshot.status, SessionStatus::Idle);
        assert_eq!(snapshot.attractor, None);
    }

    #[test]
    fn starting_again_restores_the_maze() {
        let mut engine = engine();
        engine.start_session(false, 1, 0, 3);
        engine.set_next_direction(Direction::Left);
        for _ in 0..20 {
            engine.step();
        }
        assert!(engine.score > 0);
        engine.start_session(false, 1, 0, 3);
        assert_eq!(engine.grid, engine.pristine);
        assert_eq!(engine.collectibles_remaining, engine.pristine.count_collectibles());
        assert_eq!(engine.score, 0);
    }
}
