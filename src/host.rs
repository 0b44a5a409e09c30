//! Host-side driver
//!
//! Everything the simulation refuses to own lives here: wall-clock frame
//! deltas, fixed-timestep accumulation, pause gating, input merging,
//! restart seeds, and the session hi-score scalar. The simulation itself
//! only ever sees `tick(state, snapshot, SIM_DT)`.

use rand::Rng;

use crate::consts::*;
use crate::sim::{self, GameState, TickInput};

/// Logical input actions a device source can report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Duck,
}

/// Merges per-device snapshots into the single snapshot a tick consumes
///
/// Each source keeps its own held-state; the merged snapshot is the logical
/// OR across sources. No ambient or global input flags anywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputAggregator {
    keyboard: TickInput,
    touch: TickInput,
}

impl InputAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key(&mut self, action: Action, held: bool) {
        Self::set(&mut self.keyboard, action, held);
    }

    pub fn set_touch(&mut self, action: Action, held: bool) {
        Self::set(&mut self.touch, action, held);
    }

    fn set(snapshot: &mut TickInput, action: Action, held: bool) {
        match action {
            Action::MoveLeft => snapshot.left = held,
            Action::MoveRight => snapshot.right = held,
            Action::Jump => snapshot.jump = held,
            Action::Duck => snapshot.duck = held,
        }
    }

    /// The merged snapshot passed by value into each tick
    pub fn snapshot(&self) -> TickInput {
        TickInput {
            left: self.keyboard.left || self.touch.left,
            right: self.keyboard.right || self.touch.right,
            jump: self.keyboard.jump || self.touch.jump,
            duck: self.keyboard.duck || self.touch.duck,
        }
    }

    pub fn release_all(&mut self) {
        *self = Self::default();
    }
}

/// Drives the simulation at a fixed timestep from variable frame times
#[derive(Debug)]
pub struct Runner {
    pub state: GameState,
    pub input: InputAggregator,
    accumulator: f32,
    /// Best score seen this session; never persisted
    pub hi_score: u64,
}

impl Runner {
    pub fn new(seed: u64) -> Self {
        log::info!("starting run with seed {seed}");
        Self {
            state: GameState::new(seed),
            input: InputAggregator::new(),
            accumulator: 0.0,
            hi_score: 0,
        }
    }

    /// Advance by one rendered frame's worth of wall-clock time.
    ///
    /// While paused or after game over nothing ticks; restarting is the
    /// only way back. Oversized frame deltas are clamped and at most
    /// `MAX_SUBSTEPS` fixed steps run per frame, so a long stall cannot
    /// spiral or tunnel.
    pub fn advance(&mut self, frame_dt: f32) {
        if self.state.paused || self.state.game_over {
            return;
        }

        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);
        let snapshot = self.input.snapshot();

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            sim::tick(&mut self.state, &snapshot, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
            if self.state.game_over {
                log::info!(
                    "run over at tick {} with score {}",
                    self.state.time_ticks,
                    self.state.score as u64
                );
                break;
            }
        }

        let score = self.state.score as u64;
        if score > self.hi_score {
            self.hi_score = score;
        }
    }

    /// Toggle the pause flag; ticking is gated here, not inside the core
    pub fn toggle_pause(&mut self) {
        if !self.state.game_over {
            self.state.paused = !self.state.paused;
        }
    }

    /// Discard the run and start over with a fresh seed
    pub fn restart(&mut self) {
        self.restart_with_seed(rand::rng().random());
    }

    pub fn restart_with_seed(&mut self, seed: u64) {
        log::info!("restarting with seed {seed}");
        self.state = GameState::new(seed);
        self.accumulator = 0.0;
        self.input.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_merge_with_logical_or() {
        let mut input = InputAggregator::new();
        input.set_key(Action::MoveRight, true);
        input.set_touch(Action::Jump, true);

        let snap = input.snapshot();
        assert!(snap.right);
        assert!(snap.jump);
        assert!(!snap.left);

        // releasing one source leaves the other held
        input.set_touch(Action::MoveRight, true);
        input.set_key(Action::MoveRight, false);
        assert!(input.snapshot().right);
    }

    #[test]
    fn advance_runs_whole_fixed_steps() {
        let mut runner = Runner::new(1);
        runner.advance(SIM_DT * 3.5);
        assert_eq!(runner.state.time_ticks, 3);
        // the partial step stays in the accumulator
        runner.advance(SIM_DT * 0.6);
        assert_eq!(runner.state.time_ticks, 4);
    }

    #[test]
    fn substeps_are_capped_per_frame() {
        let mut runner = Runner::new(2);
        runner.advance(10.0);
        assert_eq!(runner.state.time_ticks, MAX_SUBSTEPS as u64);
    }

    #[test]
    fn paused_runner_does_not_tick() {
        let mut runner = Runner::new(3);
        runner.toggle_pause();
        runner.advance(SIM_DT * 4.0);
        assert_eq!(runner.state.time_ticks, 0);
        runner.toggle_pause();
        runner.advance(SIM_DT);
        assert_eq!(runner.state.time_ticks, 1);
    }

    #[test]
    fn restart_matches_a_fresh_state() {
        let mut runner = Runner::new(4);
        runner.input.set_key(Action::MoveRight, true);
        for _ in 0..120 {
            runner.advance(SIM_DT);
        }
        runner.restart_with_seed(42);
        assert_eq!(runner.state, GameState::new(42));
        assert!(!runner.input.snapshot().right);
    }

    #[test]
    fn hi_score_tracks_the_best_run() {
        let mut runner = Runner::new(5);
        runner.input.set_key(Action::MoveRight, true);
        for _ in 0..600 {
            runner.advance(SIM_DT);
            if runner.state.game_over {
                break;
            }
        }
        let best = runner.hi_score;
        assert!(best > 0);
        runner.restart_with_seed(6);
        assert_eq!(runner.hi_score, best);
    }
}
