use super::*;

impl<R: RandomSource> GameEngine<R> {
    pub(super) fn update_global_mode(&mut self) {
        self.mode_timer += 1;
        if self.is_hunting() {
            if self.global_mode != GlobalMode::Chase {
                self.set_global_mode(GlobalMode::Chase);
            }
            return;
        }
        let (duration, next) = match self.global_mode {
            GlobalMode::Scatter => (SCATTER_DURATION_TICKS, GlobalMode::Chase),
            GlobalMode::Chase => (CHASE_DURATION_TICKS, GlobalMode::Scatter),
        };
        if self.mode_timer >= duration {
            self.set_global_mode(next);
        }
    }

    fn set_global_mode(&mut self, mode: GlobalMode) {
        self.global_mode = mode;
        self.mode_timer = 0;
        self.events.push(RuntimeEvent::ModeChanged { mode });
    }

    pub(super) fn release_hunters(&mut self) {
        for hunter in &mut self.hunters {
            if hunter.should_release(self.level, self.play_ticks) {
                hunter.mode = HunterMode::Releasing;
            }
        }
    }

    /// Resolves contact and moves every hunter. Returns true when a
    /// non-vulnerable contact cost the seeker a life.
    pub(super) fn update_hunters(&mut self) -> bool {
        let hunting = self.is_hunting();
        let mut life_lost = false;

        for idx in 0..self.hunters.len() {
            if self.hunters[idx].is_respawning() {
                if self.hunters[idx].tick_respawn() {
                    let hunter_id = self.hunters[idx].id.clone();
                    self.events.push(RuntimeEvent::HunterRespawned { hunter_id });
                }
                continue;
            }
            if self.hunters[idx].is_stunned() {
                if !self.hunters[idx].tick_stun() {
                    continue;
                }
            } else {
                self.hunters[idx].tick_stun_grace();
            }
            if self.hunters[idx].mode.is_released() {
                self.hunters[idx].mode = self.global_mode.into();
            }

            if self.hunters[idx].pos.distance_to(self.seeker.pos) < CONTACT_RADIUS {
                if self.hunters[idx].vulnerable {
                    self.capture_hunter(idx);
                    continue;
                }
                match self.options.contact_rule {
                    ContactRule::LoseLife => life_lost = true,
                    ContactRule::Stun if self.hunters[idx].is_stun_immune() => {}
                    ContactRule::Stun => {
                        self.hunters[idx].stun();
                        let hunter_id = self.hunters[idx].id.clone();
                        self.events.push(RuntimeEvent::HunterStunned { hunter_id });
                        continue;
                    }
                }
            }

            let ctx = PursuitContext {
                grid: &self.grid,
                seeker: self.seeker.pos,
                global_mode: self.global_mode,
                hunting,
                waypoints: &self.options.layout.patrol_waypoints,
                house_exit: self.options.layout.house_exit,
            };
            let hunter = &mut self.hunters[idx];
            let left_house = hunter.update_heading(&ctx, &mut self.rng);
            hunter.advance(&self.grid);
            if left_house {
                let hunter_id = hunter.id.clone();
                self.events.push(RuntimeEvent::HunterReleased { hunter_id });
            }
        }
        life_lost
    }

    fn capture_hunter(&mut self, idx: usize) {
        self.hunters[idx].capture();
        self.score += CAPTURE_SCORE;
        self.events.push(RuntimeEvent::HunterCaptured {
            hunter_id: self.hunters[idx].id.clone(),
            bonus: CAPTURE_SCORE,
        });
    }
}
