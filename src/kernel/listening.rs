use serde::{Deserialize, Serialize};

/// Lifecycle of the speech-to-text capability while witness mode runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RecognitionState {
    #[default]
    Stopped,
    Starting,
    Active,
    Stopping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenRequest {
    /// Witness mode switched on.
    Enable,
    /// Witness mode switched off.
    Disable,
    /// The environment confirmed recognition is running.
    Started,
    /// Recognition stopped, expected or not.
    Ended,
    /// The environment reported an error.
    Failed,
}

/// What the driver must ask the environment to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenCommand {
    Start,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenTransition {
    pub next: RecognitionState,
    pub command: Option<ListenCommand>,
    /// Set when recognition died under us and is being brought back.
    pub restarted: bool,
}

impl ListenTransition {
    fn to(next: RecognitionState) -> Self {
        Self { next, command: None, restarted: false }
    }

    fn with(next: RecognitionState, command: ListenCommand) -> Self {
        Self { next, command: Some(command), restarted: false }
    }
}

pub struct RecognitionGraph;

impl RecognitionGraph {
    /// Pure function: (current, enabled, request) -> transition.
    /// `enabled` is the witness-mode flag *after* the request is applied.
    /// Returns None when the request does not apply in the current state.
    pub fn transition(
        current: RecognitionState,
        enabled: bool,
        request: ListenRequest,
    ) -> Option<ListenTransition> {
        use ListenRequest::*;
        use RecognitionState::*;

        match (current, request) {
            (Stopped, Enable) => Some(ListenTransition::with(Starting, ListenCommand::Start)),
            // Re-enabled before the stop landed: wait for its Ended, then start.
            (Stopping, Enable) => Some(ListenTransition::to(Stopping)),

            (Starting, Started) if enabled => Some(ListenTransition::to(Active)),
            // Start confirmed after the user already turned it off.
            (Starting, Started) => Some(ListenTransition::with(Stopping, ListenCommand::Stop)),

            (Starting, Disable) | (Active, Disable) => {
                Some(ListenTransition::with(Stopping, ListenCommand::Stop))
            }

            (Stopping, Ended) if enabled => {
                Some(ListenTransition::with(Starting, ListenCommand::Start))
            }
            (Starting, Ended) | (Active, Ended) if enabled => Some(ListenTransition {
                next: Starting,
                command: Some(ListenCommand::Start),
                restarted: true,
            }),
            (_, Ended) => Some(ListenTransition::to(Stopped)),

            // An Ended always follows an error while enabled.
            (_, Failed) if enabled => None,
            (Stopped, Failed) => None,
            (_, Failed) => Some(ListenTransition::to(Stopped)),

            _ => None,
        }
    }
}
