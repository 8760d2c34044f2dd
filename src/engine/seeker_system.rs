use super::*;

impl<R: RandomSource> GameEngine<R> {
    pub fn set_next_direction(&mut self, dir: Direction) {
        if !self.status.is_running() {
            return;
        }
        self.seeker.next_dir = dir;
        self.attractor = None;
        self.awaiting_input = false;
    }

    /// Places the attractor on a cell the seeker can walk to. Returns false
    /// and changes nothing when the cell is outside the maze, blocked, or
    /// cut off from the seeker's current cell.
    pub fn set_attractor(&mut self, x: i32, y: i32) -> bool {
        if !self.status.is_running() {
            return false;
        }
        if x < 0 || y < 0 || x >= self.grid.width() || y >= self.grid.height() {
            return false;
        }
        let cell = Vec2::new(x, y);
        if self.grid.is_blocked_cell(cell, Mover::Seeker) {
            return false;
        }
        let nearest = self.seeker.pos.nearest_cell();
        let reachable = self.grid.reachable_from(nearest, Mover::Seeker);
        if !reachable[self.grid.index(cell)] {
            return false;
        }
        self.attractor = Some(cell);
        self.awaiting_input = false;
        true
    }

    pub(super) fn update_seeker(&mut self) {
        let nearest = self.seeker.pos.nearest_cell();
        let offset = self.seeker.pos.distance_to(Position::from_cell(nearest));
        if offset < SEEKER_SPEED * SEEKER_ALIGN_FACTOR {
            let cell = self.grid.wrap(nearest.x, nearest.y);
            self.collect_at(cell);
            self.steer_seeker(cell);
        }

        if self.seeker.dir != Direction::None {
            let (dx, dy) = self.seeker.dir.delta();
            let pos = &mut self.seeker.pos;
            pos.x = (pos.x + dx as f32 * SEEKER_SPEED).rem_euclid(self.grid.width() as f32);
            pos.y = (pos.y + dy as f32 * SEEKER_SPEED).rem_euclid(self.grid.height() as f32);
        }
    }

    fn steer_seeker(&mut self, cell: Vec2) {
        let center = Position::from_cell(cell);

        if let Some(target) = self.attractor {
            if target == cell {
                self.attractor = None;
                self.seeker.dir = Direction::None;
                self.seeker.pos = center;
            } else {
                let dir = direction_toward(
                    &self.grid,
                    center,
                    Position::from_cell(target),
                    Direction::None,
                    true,
                    Mover::Seeker,
                );
                if dir != Direction::None {
                    self.seeker.dir = dir;
                    self.seeker.pos = center;
                }
            }
        } else if self.seeker.autopilot
            && self.life_ticks > u64::from(self.options.autopilot_warmup_ticks)
        {
            let dir = direction_to_nearest_collectible(&self.grid, center);
            if dir != Direction::None {
                self.seeker.dir = dir;
                self.seeker.pos = center;
            }
        }

        let next_dir = self.seeker.next_dir;
        if next_dir != Direction::None
            && !self.grid.is_blocked_cell(self.grid.neighbor(cell, next_dir), Mover::Seeker)
        {
            self.seeker.dir = next_dir;
            self.seeker.next_dir = Direction::None;
            self.seeker.pos = center;
            self.attractor = None;
        }

        let dir = self.seeker.dir;
        if dir != Direction::None
            && self.grid.is_blocked_cell(self.grid.neighbor(cell, dir), Mover::Seeker)
        {
            self.seeker.dir = Direction::None;
            self.seeker.pos = center;
        }
    }

    fn collect_at(&mut self, cell: Vec2) {
        match self.grid.cell(cell.x, cell.y) {
            Cell::Collectible => {
                self.score += COLLECTIBLE_SCORE;
                self.take_collectible(cell);
                self.events.push(RuntimeEvent::CollectibleTaken {
                    x: cell.x,
                    y: cell.y,
                });
            }
            Cell::PowerCollectible => {
                self.score += POWER_COLLECTIBLE_SCORE;
                self.take_collectible(cell);
                self.status = SessionStatus::PowerActive;
                self.power_ticks_left = POWER_DURATION_TICKS;
                for hunter in &mut self.hunters {
                    hunter.frighten();
                }
                self.events.push(RuntimeEvent::PowerTaken {
                    x: cell.x,
                    y: cell.y,
                });
            }
            _ => {}
        }
    }

    fn take_collectible(&mut self, cell: Vec2) {
        self.grid.set_cell(cell.x, cell.y, Cell::Collected);
        self.collectibles_remaining = self.collectibles_remaining.saturating_sub(1);
    }

    pub(super) fn update_power(&mut self) {
        if self.power_ticks_left == 0 {
            return;
        }
        self.power_ticks_left -= 1;
        if self.power_ticks_left > 0 {
            return;
        }
        self.status = SessionStatus::Active;
        for hunter in &mut self.hunters {
            hunter.vulnerable = false;
        }
        self.events.push(RuntimeEvent::PowerExpired);
    }
}
