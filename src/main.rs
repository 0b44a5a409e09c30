//! Story Dash entry point
//!
//! There is no windowing front end here; the binary runs a seeded headless
//! demo: a scripted run through the fixed-step host loop, then one recorded
//! frame to census the draw-call stream. Pass a seed as the first argument
//! to replay a specific run.

use story_dash::consts::*;
use story_dash::host::{Action, Runner};
use story_dash::render::record::Recorder;
use story_dash::render::draw_frame;
use story_dash::theme::Theme;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    log::info!("Story Dash (headless) starting with seed {seed}");

    let mut runner = Runner::new(seed);
    let theme = Theme::default();

    // thirty simulated seconds: run right, short hop every second
    runner.input.set_key(Action::MoveRight, true);
    let frames = (30.0 / SIM_DT) as u64;
    for frame in 0..frames {
        runner.input.set_key(Action::Jump, frame % 120 < 20);
        runner.advance(SIM_DT);
        if runner.state.game_over {
            break;
        }
    }

    let state = &runner.state;
    log::info!(
        "ticks={} camera_x={:.1} obstacles={} billboards={} story={}/{}",
        state.time_ticks,
        state.camera.x,
        state.obstacles.len(),
        state.billboards.len(),
        state.story_index,
        state.script.len(),
    );

    let mut recorder = Recorder::new();
    draw_frame(&mut recorder, state, &theme, runner.hi_score, false);

    println!(
        "seed {seed}: score {:.0} over {} ticks, {} draw calls per frame{}",
        state.score,
        state.time_ticks,
        recorder.calls.len(),
        if state.game_over { " (run ended)" } else { "" },
    );
}
