mod report;
mod writing;

pub use report::Report;
pub use writing::{
    Action, EnvConfig, Info, Observation, Phase, Step, WritingEnv, CORRECT_SQUARE_REWARD,
    INCORRECT_SQUARE_REWARD, LOSS_REWARD, MOVE_REWARD, OUT_OF_BOUNDS_REWARD, WIN_REWARD,
};

use crate::Result;

/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time MDP with one agent.
/// Unlike a purely functional MDP, stepping is fallible: an environment may reject an
/// action or refuse to step outside of an active episode.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// A representation of an action that an agent can take to affect the environment
    type Action;

    /// Update the environment in response to an action taken by an agent
    fn step(&mut self, action: Self::Action) -> Result<Step<Self::State>>;

    /// Reset the environment to an initial state
    ///
    /// **Returns** the initial state
    fn reset(&mut self) -> Result<Self::State>;

    /// Whether the current episode is still accepting actions
    fn is_active(&self) -> bool;
}

/// An environment with a finite set of actions
pub trait DiscreteActionSpace: Environment {
    /// Get the available actions for the current state
    ///
    /// The returned vector should never be empty.
    fn actions(&self) -> Vec<Self::Action>;
}
