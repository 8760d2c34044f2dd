use super::*;

impl<R: RandomSource> GameEngine<R> {
    pub fn start_session(&mut self, autopilot: bool, level: u32, score: u32, lives: u32) {
        self.init_level(level.max(1), score, lives.max(1));
        self.seeker.autopilot = autopilot;
        self.status = SessionStatus::Active;
        self.awaiting_input = !autopilot;
        self.events.push(RuntimeEvent::LevelStarted { level: self.level });
    }

    pub fn abort_session(&mut self) {
        if self.status == SessionStatus::Idle {
            return;
        }
        self.status = SessionStatus::Idle;
        self.attractor = None;
        self.awaiting_input = false;
    }

    pub fn advance_to_next_level(&mut self) {
        if self.status != SessionStatus::Won {
            return;
        }
        if self.level >= self.options.final_level {
            self.status = SessionStatus::Complete;
            self.events.push(RuntimeEvent::SessionComplete);
            return;
        }
        let autopilot = self.seeker.autopilot;
        self.init_level(self.level + 1, self.score, self.lives);
        self.seeker.autopilot = autopilot;
        self.status = SessionStatus::Active;
        self.awaiting_input = !autopilot;
        self.events.push(RuntimeEvent::LevelStarted { level: self.level });
    }

    pub(super) fn init_level(&mut self, level: u32, score: u32, lives: u32) {
        self.grid = self.pristine.clone();
        self.collectibles_remaining = self.grid.count_collectibles();
        self.level = level;
        self.score = score;
        self.lives = lives;
        self.status = SessionStatus::Idle;
        self.global_mode = GlobalMode::Scatter;
        self.mode_timer = 0;
        self.power_ticks_left = 0;
        self.play_ticks = 0;
        self.awaiting_input = false;
        self.attractor = None;
        self.reset_actors();
    }

    pub(super) fn reset_actors(&mut self) {
        self.seeker.pos = Position::from_cell(self.options.layout.seeker_start);
        self.seeker.dir = Direction::None;
        self.seeker.next_dir = Direction::None;
        for hunter in &mut self.hunters {
            hunter.reset();
        }
        self.life_ticks = 0;
    }

    pub(super) fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.events.push(RuntimeEvent::LifeLost {
            lives_left: self.lives,
        });
        if self.lives == 0 {
            self.status = SessionStatus::Lost;
            self.events.push(RuntimeEvent::SessionLost);
            return;
        }
        self.reset_actors();
        self.status = SessionStatus::Active;
        self.power_ticks_left = 0;
        self.attractor = None;
        self.awaiting_input = !self.seeker.autopilot;
    }

    pub(super) fn win_level(&mut self) {
        self.status = SessionStatus::Won;
        self.events.push(RuntimeEvent::LevelWon { level: self.level });
    }
}
