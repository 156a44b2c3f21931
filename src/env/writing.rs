use log::{debug, trace};
use rand::random;
use strum::{EnumIter, FromRepr, VariantArray};

use super::{DiscreteActionSpace, Environment, Report};
use crate::{
    assert_interval,
    grid::{Grid, Pos},
    pattern::{PatternSet, PatternSource},
    render::{self, PixelFrame, RenderMode},
    Error, Result,
};

pub const MOVE_REWARD: f32 = -1.0;
pub const OUT_OF_BOUNDS_REWARD: f32 = -1000.0;
pub const CORRECT_SQUARE_REWARD: f32 = 3.0;
/// Filling a cell unset in the reference, or any cell that is already filled
pub const INCORRECT_SQUARE_REWARD: f32 = -2.0;
pub const WIN_REWARD: f32 = 100.0;
pub const LOSS_REWARD: f32 = -100.0;

/// Actions available to the agent
///
/// The discriminants are the wire encoding shared with drivers and must not change.
#[derive(FromRepr, EnumIter, VariantArray, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp = 0,
    MoveDown = 1,
    MoveLeft = 2,
    MoveRight = 3,
    FillSquare = 4,
    Quit = 5,
}

impl TryFrom<usize> for Action {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        Self::from_repr(value).ok_or(Error::InvalidAction(value))
    }
}

/// Lifecycle of a [`WritingEnv`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed but never reset
    Uninitialized,
    /// Accepting actions
    Ready,
    /// The episode has ended; only a reset is accepted
    Terminal,
}

/// A snapshot of the environment as seen by an agent
///
/// Three layers of equal shape: the work pattern, the reference pattern, and a one-hot
/// grid marking the agent's position.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub work: Grid,
    pub reference: Grid,
    pub position: Grid,
}

impl Observation {
    /// The layers in encoding order
    pub fn layers(&self) -> [&Grid; 3] {
        [&self.work, &self.reference, &self.position]
    }

    /// `[layers, rows, cols]`
    pub fn shape(&self) -> [usize; 3] {
        let (rows, cols) = self.work.shape();
        [3, rows, cols]
    }

    /// The agent's `(row, col)`, or `None` if the position layer has no set cell
    pub fn agent(&self) -> Option<Pos> {
        let cols = self.position.cols();
        self.position
            .cells()
            .iter()
            .position(|&c| c == 1)
            .map(|i| (i / cols, i % cols))
    }

    /// All layers flattened in encoding order
    pub fn to_vec(&self) -> Vec<f32> {
        self.layers().into_iter().flat_map(Grid::to_f32).collect()
    }
}

/// Auxiliary data returned alongside each transition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Info {
    /// Steps taken in the current episode, including this one
    pub steps: u32,
}

/// The result of a single environment step
#[derive(Debug, Clone, PartialEq)]
pub struct Step<S> {
    pub observation: S,
    pub reward: f32,
    pub done: bool,
    pub info: Info,
}

/// Configuration for [`WritingEnv`]
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// Edge length in pixels of one cell when rendering to pixels
    pub cell_size: u32,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self { cell_size: 80 }
    }
}

/// An environment in which an agent learns to copy a reference pattern
///
/// The agent moves a cursor around a grid and fills cells, trying to reproduce the
/// reference pattern exactly, then declares it is done with [`Action::Quit`]. Moving off
/// the grid ends the episode with a large penalty.
pub struct WritingEnv<P: PatternSource = PatternSet> {
    patterns: P,
    config: EnvConfig,
    work: Grid,
    reference: Grid,
    pos: Pos,
    steps: u32,
    phase: Phase,
    pub report: Report,
}

impl<P: PatternSource> WritingEnv<P> {
    pub fn new(patterns: P) -> Self {
        Self::with_config(patterns, EnvConfig::default())
    }

    /// **Panics** if `config.cell_size` is not in the interval `[2, 512]`
    pub fn with_config(patterns: P, config: EnvConfig) -> Self {
        assert_interval!(config.cell_size, 2, 512);
        let (rows, cols) = patterns.shape();
        Self {
            patterns,
            config,
            work: Grid::zeros(rows, cols),
            reference: Grid::zeros(rows, cols),
            pos: (0, 0),
            steps: 0,
            phase: Phase::Uninitialized,
            report: Report::new(vec!["reward", "steps", "correct"]),
        }
    }

    /// Seed the pattern source, drawing a seed from entropy if none is given
    ///
    /// **Returns** the seed used
    pub fn seed(&mut self, seed: Option<u64>) -> u64 {
        let seed = seed.unwrap_or_else(random);
        self.patterns.seed(seed);
        seed
    }

    /// The current observation
    ///
    /// Fails with [`Error::InvalidState`] before the first reset.
    pub fn observe(&self) -> Result<Observation> {
        if self.phase == Phase::Uninitialized {
            return Err(Error::InvalidState {
                op: "observe",
                phase: self.phase,
            });
        }

        let (rows, cols) = self.shape();
        Ok(Observation {
            work: self.work.clone(),
            reference: self.reference.clone(),
            position: Grid::one_hot(rows, cols, self.pos),
        })
    }

    /// Step with an action given by its wire encoding
    ///
    /// Fails with [`Error::InvalidAction`] for values outside `0..6` without touching
    /// the episode.
    pub fn step_index(&mut self, action: usize) -> Result<Step<Observation>> {
        let action = Action::try_from(action)?;
        self.step(action)
    }

    /// Render the current state
    ///
    /// Text is printed and `None` returned; pixel mode returns the frame.
    pub fn render(&self, mode: RenderMode) -> Result<Option<PixelFrame>> {
        let observation = self.observe()?;
        Ok(render::render(&observation, mode, self.config.cell_size))
    }

    /// Whether the work pattern exactly equals the reference pattern
    pub fn is_match(&self) -> bool {
        self.work == self.reference
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        self.work.shape()
    }

    pub fn position(&self) -> Pos {
        self.pos
    }

    pub fn work(&self) -> &Grid {
        &self.work
    }

    pub fn reference(&self) -> &Grid {
        &self.reference
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn patterns(&self) -> &P {
        &self.patterns
    }

    /// Move the agent by `(dr, dc)` if the destination is on the grid
    ///
    /// **Returns** `(reward, done)`
    fn walk(&mut self, dr: isize, dc: isize) -> (f32, bool) {
        let dest = self
            .pos
            .0
            .checked_add_signed(dr)
            .zip(self.pos.1.checked_add_signed(dc))
            .filter(|&p| self.work.contains(p));

        match dest {
            Some(pos) => {
                self.pos = pos;
                (MOVE_REWARD, false)
            }
            None => (OUT_OF_BOUNDS_REWARD, true),
        }
    }

    /// Fill the cell under the agent
    fn fill(&mut self) -> f32 {
        // Refilling is penalized even where the reference is set
        if self.work.is_set(self.pos) {
            return INCORRECT_SQUARE_REWARD;
        }

        self.work.set(self.pos);
        if self.reference.is_set(self.pos) {
            CORRECT_SQUARE_REWARD
        } else {
            INCORRECT_SQUARE_REWARD
        }
    }
}

impl<P: PatternSource> Environment for WritingEnv<P> {
    type State = Observation;
    type Action = Action;

    fn step(&mut self, action: Self::Action) -> Result<Step<Self::State>> {
        if self.phase != Phase::Ready {
            return Err(Error::InvalidState {
                op: "step",
                phase: self.phase,
            });
        }

        let (reward, done) = match action {
            Action::MoveUp => self.walk(-1, 0),
            Action::MoveDown => self.walk(1, 0),
            Action::MoveLeft => self.walk(0, -1),
            Action::MoveRight => self.walk(0, 1),
            Action::FillSquare => (self.fill(), false),
            Action::Quit if self.is_match() => (WIN_REWARD, true),
            Action::Quit => (LOSS_REWARD, true),
        };

        self.steps += 1;
        if done {
            self.phase = Phase::Terminal;
        }

        *self.report.entry("reward") += reward as f64;
        *self.report.entry("steps") += 1.0;
        if action == Action::Quit && reward == WIN_REWARD {
            *self.report.entry("correct") += 1.0;
        }

        trace!(
            "step {}: {:?} -> reward {reward}, pos {:?}, done {done}",
            self.steps,
            action,
            self.pos
        );

        Ok(Step {
            observation: self.observe()?,
            reward,
            done,
            info: Info { steps: self.steps },
        })
    }

    fn reset(&mut self) -> Result<Self::State> {
        let reference = self.patterns.sample()?;
        assert_eq!(
            reference.shape(),
            self.work.shape(),
            "Pattern source returned a pattern of the wrong shape"
        );

        let (rows, cols) = self.shape();
        self.work = Grid::zeros(rows, cols);
        self.reference = reference;
        self.pos = (0, 0);
        self.steps = 0;
        self.phase = Phase::Ready;

        debug!("reset: reference has {} of {} cells set", self.reference.count(), rows * cols);

        self.observe()
    }

    fn is_active(&self) -> bool {
        self.phase == Phase::Ready
    }
}

impl<P: PatternSource> DiscreteActionSpace for WritingEnv<P> {
    fn actions(&self) -> Vec<Self::Action> {
        Action::VARIANTS.to_vec()
    }
}
