use crate::constants::{
    release_tick, EXIT_COLUMN_TOLERANCE, EXIT_ROW_TOLERANCE, HUNTER_ALIGN_FACTOR,
    HUNTER_BASE_SPEED, PATROL_WAYPOINT_CHANCE, RESPAWN_TICKS, STUN_GRACE_TICKS, STUN_TICKS,
    VULNERABLE_SPEED_MULTIPLIER, WAYPOINT_REACHED_RADIUS,
};
use crate::maze::{Grid, Mover};
use crate::pathing::direction_toward;
use crate::rng::RandomSource;
use crate::types::{Direction, GlobalMode, HunterMode, HunterView, Position, Vec2};

#[derive(Clone, Copy, Debug)]
pub struct PursuitContext<'a> {
    pub grid: &'a Grid,
    pub seeker: Position,
    pub global_mode: GlobalMode,
    pub hunting: bool,
    pub waypoints: &'a [Vec2],
    pub house_exit: Vec2,
}

#[derive(Clone, Debug)]
pub struct Hunter {
    pub id: String,
    pub exit_order: usize,
    pub pos: Position,
    pub dir: Direction,
    pub home: Vec2,
    pub scatter_corner: Vec2,
    pub mode: HunterMode,
    pub vulnerable: bool,
    pub respawn_ticks: u32,
    pub stun_ticks: u32,
    pub stun_grace_ticks: u32,
    pub patrol_target: Option<Vec2>,
}

impl Hunter {
    pub fn new(exit_order: usize, home: Vec2, scatter_corner: Vec2) -> Self {
        Self {
            id: format!("hunter_{exit_order}"),
            exit_order,
            pos: Position::from_cell(home),
            dir: Direction::Up,
            home,
            scatter_corner,
            mode: HunterMode::Confined,
            vulnerable: false,
            respawn_ticks: 0,
            stun_ticks: 0,
            stun_grace_ticks: 0,
            patrol_target: None,
        }
    }

    pub fn reset(&mut self) {
        self.pos = Position::from_cell(self.home);
        self.dir = Direction::Up;
        self.mode = HunterMode::Confined;
        self.vulnerable = false;
        self.respawn_ticks = 0;
        self.stun_ticks = 0;
        self.stun_grace_ticks = 0;
        self.patrol_target = None;
    }

    pub fn is_respawning(&self) -> bool {
        self.respawn_ticks > 0
    }

    pub fn is_stunned(&self) -> bool {
        self.stun_ticks > 0
    }

    pub fn speed(&self) -> f32 {
        if self.vulnerable {
            HUNTER_BASE_SPEED * VULNERABLE_SPEED_MULTIPLIER
        } else {
            HUNTER_BASE_SPEED
        }
    }

    pub fn should_release(&self, level: u32, play_ticks: u64) -> bool {
        self.mode == HunterMode::Confined
            && !self.is_respawning()
            && play_ticks >= release_tick(level, self.exit_order)
    }

    pub fn frighten(&mut self) -> bool {
        if !self.mode.is_released() || self.is_respawning() {
            return false;
        }
        self.vulnerable = true;
        self.dir = self.dir.opposite();
        true
    }

    pub fn capture(&mut self) {
        self.reset();
        self.respawn_ticks = RESPAWN_TICKS;
    }

    pub fn stun(&mut self) {
        self.stun_ticks = STUN_TICKS;
    }

    pub fn tick_respawn(&mut self) -> bool {
        if self.respawn_ticks == 0 {
            return false;
        }
        self.respawn_ticks -= 1;
        if self.respawn_ticks > 0 {
            return false;
        }
        self.pos = Position::from_cell(self.home);
        self.mode = HunterMode::Confined;
        self.vulnerable = false;
        true
    }

    pub fn is_stun_immune(&self) -> bool {
        self.stun_grace_ticks > 0
    }

    /// Counts the stun down. On the tick it ends the hunter turns around,
    /// gains a grace window and returns true so it moves that same tick.
    pub fn tick_stun(&mut self) -> bool {
        if self.stun_ticks == 0 {
            return false;
        }
        self.stun_ticks -= 1;
        if self.stun_ticks > 0 {
            return false;
        }
        self.dir = self.dir.opposite();
        self.stun_grace_ticks = STUN_GRACE_TICKS;
        true
    }

    pub fn tick_stun_grace(&mut self) {
        self.stun_grace_ticks = self.stun_grace_ticks.saturating_sub(1);
    }

    pub fn is_aligned(&self) -> bool {
        self.pos.distance_to_nearest_cell() < self.speed() * HUNTER_ALIGN_FACTOR
    }

    /// Picks a new heading when the hunter sits on a cell center.
    /// Returns true on the tick the hunter leaves the house.
    pub fn update_heading<R: RandomSource + ?Sized>(
        &mut self,
        ctx: &PursuitContext<'_>,
        rng: &mut R,
    ) -> bool {
        if !self.is_aligned() {
            return false;
        }
        match self.mode {
            HunterMode::Confined => false,
            HunterMode::Releasing => self.steer_exit(ctx, rng),
            HunterMode::Scatter | HunterMode::Chase => {
                self.steer_released(ctx, rng);
                false
            }
        }
    }

    fn steer_exit<R: RandomSource + ?Sized>(
        &mut self,
        ctx: &PursuitContext<'_>,
        rng: &mut R,
    ) -> bool {
        let exit = Position::from_cell(ctx.house_exit);
        if self.pos.y <= exit.y + EXIT_ROW_TOLERANCE {
            self.mode = ctx.global_mode.into();
            self.dir = if rng.next_f32() > 0.5 {
                Direction::Left
            } else {
                Direction::Right
            };
            self.pos = exit;
            return true;
        }
        if (self.pos.x - exit.x).abs() < EXIT_COLUMN_TOLERANCE {
            self.dir = Direction::Up;
            self.pos.x = exit.x;
        } else if self.pos.x < exit.x {
            self.dir = Direction::Right;
        } else {
            self.dir = Direction::Left;
        }
        false
    }

    fn steer_released<R: RandomSource + ?Sized>(&mut self, ctx: &PursuitContext<'_>, rng: &mut R) {
        let nearest = self.pos.nearest_cell();
        let cell = ctx.grid.wrap(nearest.x, nearest.y);
        let mover = Mover::Hunter(self.mode);

        if self.vulnerable {
            self.dir = random_legal_direction(ctx.grid, cell, self.dir, mover, rng);
        } else {
            let target = self.pick_target(ctx, rng);
            let dir = direction_toward(
                ctx.grid,
                Position::from_cell(cell),
                target,
                self.dir,
                false,
                mover,
            );
            self.dir = if dir == Direction::None {
                random_legal_direction(ctx.grid, cell, self.dir, mover, rng)
            } else {
                dir
            };
        }
        self.pos = Position::from_cell(cell);
    }

    fn pick_target<R: RandomSource + ?Sized>(
        &mut self,
        ctx: &PursuitContext<'_>,
        rng: &mut R,
    ) -> Position {
        if ctx.hunting {
            return ctx.seeker;
        }
        if ctx.global_mode == GlobalMode::Scatter {
            return Position::from_cell(self.scatter_corner);
        }

        let reached = match self.patrol_target {
            Some(target) => {
                self.pos.distance_to(Position::from_cell(target)) < WAYPOINT_REACHED_RADIUS
            }
            None => true,
        };
        if reached {
            let seeker_cell = ctx.seeker.nearest_cell();
            let seeker_cell = ctx.grid.wrap(seeker_cell.x, seeker_cell.y);
            let next = if rng.chance(PATROL_WAYPOINT_CHANCE) {
                pick_patrol_waypoint(ctx.waypoints, self.patrol_target, rng)
            } else {
                None
            };
            self.patrol_target = Some(next.unwrap_or(seeker_cell));
        }
        self.patrol_target.map_or(ctx.seeker, Position::from_cell)
    }

    pub fn advance(&mut self, grid: &Grid) {
        if self.mode == HunterMode::Confined {
            return;
        }
        let (dx, dy) = self.dir.delta();
        let speed = self.speed();
        self.pos.x = (self.pos.x + dx as f32 * speed).rem_euclid(grid.width() as f32);
        self.pos.y = (self.pos.y + dy as f32 * speed).rem_euclid(grid.height() as f32);
    }

    pub fn to_view(&self) -> HunterView {
        HunterView {
            id: self.id.clone(),
            exit_order: self.exit_order,
            x: self.pos.x,
            y: self.pos.y,
            dir: self.dir,
            mode: self.mode,
            vulnerable: self.vulnerable,
            visible: !self.is_respawning(),
            stunned: self.is_stunned(),
        }
    }
}

pub fn random_legal_direction<R: RandomSource + ?Sized>(
    grid: &Grid,
    cell: Vec2,
    current: Direction,
    mover: Mover,
    rng: &mut R,
) -> Direction {
    let reverse = current.opposite();
    let candidates = Direction::CARDINALS
        .into_iter()
        .filter(|dir| *dir != reverse)
        .filter(|dir| !grid.is_blocked_cell(grid.neighbor(cell, *dir), mover))
        .collect::<Vec<_>>();
    if candidates.is_empty() {
        return reverse;
    }
    candidates[rng.pick_index(candidates.len())]
}

pub fn pick_patrol_waypoint<R: RandomSource + ?Sized>(
    waypoints: &[Vec2],
    exclude: Option<Vec2>,
    rng: &mut R,
) -> Option<Vec2> {
    let pool = waypoints
        .iter()
        .copied()
        .filter(|waypoint| Some(*waypoint) != exclude)
        .collect::<Vec<_>>();
    if pool.is_empty() {
        return waypoints.first().copied();
    }
    Some(pool[rng.pick_index(pool.len())])
}
