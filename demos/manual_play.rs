//! Play the writing environment by hand in the terminal.
//!
//! Arrow keys move, space fills, enter submits the copy. `q` or `Esc` exits.
//! Set `SCRIBE_PATTERN_SET` (default `3x3`) and `SCRIBE_ROTATE=1` to change the patterns.

use std::{error::Error, time::Duration};

use crossterm::event::KeyCode;
use log::{info, LevelFilter};
use scribe::{
    env::{Action, Environment, WritingEnv},
    pattern::{pattern_set, PatternSetConfig},
    viz::{self, Display},
};

const FPS: f64 = 30.0;
const HELP: &str = "arrows move, space fills, enter submits, q quits";

fn action_for(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Up => Some(Action::MoveUp),
        KeyCode::Down => Some(Action::MoveDown),
        KeyCode::Left => Some(Action::MoveLeft),
        KeyCode::Right => Some(Action::MoveRight),
        KeyCode::Char(' ') => Some(Action::FillSquare),
        KeyCode::Enter => Some(Action::Quit),
        _ => None,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    viz::init_logger(LevelFilter::Debug)?;

    let config = PatternSetConfig {
        name: std::env::var("SCRIBE_PATTERN_SET").unwrap_or_else(|_| String::from("3x3")),
        rotate: std::env::var("SCRIBE_ROTATE").is_ok_and(|v| v == "1"),
        ..Default::default()
    };
    let mut env = WritingEnv::new(pattern_set(&config)?);
    let mut display = Display::open();
    let frame = Duration::from_secs_f64(1.0 / FPS);

    let mut episode = 0;
    'episodes: while !display.should_quit() {
        episode += 1;
        let mut observation = env.reset()?;
        let mut ret = 0.0;

        loop {
            let status = format!("Episode {episode:02} - Steps: {} - Return: {ret:.0} - {HELP}", env.steps());
            display.show(&observation, &status)?;
            display.poll(frame)?;
            if display.should_quit() {
                break 'episodes;
            }
            if display.keys().is_none() {
                info!("no keyboard available, exiting");
                break 'episodes;
            }

            let actions: Vec<_> = display.pressed().iter().filter_map(|&k| action_for(k)).collect();
            for action in actions {
                let step = env.step(action)?;
                ret += step.reward;
                observation = step.observation;
                info!("{action:?}: reward {}", step.reward);

                if step.done {
                    let outcome = if env.is_match() { "copied" } else { "failed" };
                    info!("episode {episode} {outcome} with return {ret}");
                    display.show(&observation, &format!("Episode {episode:02} {outcome} - Return: {ret:.0}"))?;
                    if !display.wait(Duration::from_millis(750))? {
                        break 'episodes;
                    }
                    continue 'episodes;
                }
            }
        }
    }

    display.close()?;
    Ok(())
}
