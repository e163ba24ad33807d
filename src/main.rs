/// Demo driver: a seeded random agent playing the configured board.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

use pacman_rl::config::GameConfig;
use pacman_rl::ui::renderer::Renderer;
use pacman_rl::{make_with_render, Direction, Environment, Outcome, RenderMode};

struct EpisodeSummary {
    outcome: Outcome,
    score: u32,
    steps: u32,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = GameConfig::load();

    let mut env = match make_with_render(config.env.clone(), config.driver.render) {
        Ok(env) => env,
        Err(e) => {
            eprintln!("Invalid config: {e}");
            std::process::exit(1);
        }
    };

    let draw = env.render_mode() == RenderMode::Text;
    if !draw {
        tracing::warn!(mode = ?env.render_mode(), "render mode not available here, running headless");
    }

    let mut renderer = Renderer::new();
    if draw {
        if let Err(e) = renderer.init() {
            eprintln!("Terminal init failed: {e}");
            return;
        }
    }

    let result = run(&mut env, &mut renderer, &config, draw);

    if draw {
        if let Err(e) = renderer.cleanup() {
            eprintln!("Terminal cleanup failed: {e}");
        }
    }

    match result {
        Ok(summaries) => {
            for (i, s) in summaries.iter().enumerate() {
                println!("Episode {}: {:?}  score {}  steps {}", i + 1, s.outcome, s.score, s.steps);
            }
        }
        Err(e) => eprintln!("Driver error: {e}"),
    }
}

fn run(
    env: &mut Environment,
    renderer: &mut Renderer,
    config: &GameConfig,
    draw: bool,
) -> Result<Vec<EpisodeSummary>, Box<dyn std::error::Error>> {
    let mut picker = StdRng::seed_from_u64(config.driver.action_seed);
    let tick_rate = Duration::from_millis(config.driver.tick_rate_ms);
    let mut summaries = Vec::with_capacity(config.driver.episodes as usize);

    for episode in 0..config.driver.episodes {
        let seed = config.env.seed.wrapping_add(u64::from(episode));
        let mut state = env.reset_with_seed(seed);
        if draw {
            renderer.present(env)?;
        }

        while !state.completed {
            let action = Direction::ALL[picker.gen_range(0..Direction::ALL.len())];
            state = env.step(action)?;
            if draw {
                renderer.present(env)?;
                std::thread::sleep(tick_rate);
            }
        }

        tracing::info!(
            episode,
            seed,
            outcome = ?state.outcome,
            score = state.score,
            steps = state.steps_taken,
            "episode finished"
        );
        summaries.push(EpisodeSummary {
            outcome: state.outcome,
            score: state.score,
            steps: state.steps_taken,
        });
    }

    Ok(summaries)
}
