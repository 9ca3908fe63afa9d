//! The unified cross-chain state and its transition rules
//!
//! Every protocol adapter classifies its raw relay vocabulary onto
//! [`CrossChainState`]. The enum is totally ordered by declaration: each error
//! variant sits directly above the rung it branches from, so `state >=
//! DestinationPending` means "the relay has handed the message to the
//! destination side" regardless of how that hand-off ended.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a tracked message currently is.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CrossChainState {
    /// Nothing sent yet, or the tracker was reset.
    #[default]
    None,
    /// Origin transaction broadcast, waiting to be mined.
    OriginPending,
    /// Origin transaction failed, was rejected, or has no hash.
    OriginError,
    /// Origin transaction mined; the relay network has not dispatched yet.
    RelayPending,
    /// The relay status source cannot resolve the message.
    RelayError,
    /// The relay approved delivery to the destination gateway.
    DestinationPending,
    /// Execution on the destination chain failed.
    DestinationError,
    /// Delivered. For reduced-visibility protocols this means "relay confirmed
    /// delivery", not "destination execution observed".
    Success,
}

/// Outcome of asking the state machine to move to a new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The state changed.
    Advanced,
    /// The requested state is the current state.
    Unchanged,
    /// The move is not in the transition table and was discarded.
    Rejected,
}

impl CrossChainState {
    /// Returns true for the three sticky error states.
    pub fn is_error(self) -> bool {
        matches!(
            self,
            Self::OriginError | Self::RelayError | Self::DestinationError
        )
    }

    /// Returns true once the tracker can make no further progress without a reset.
    pub fn is_terminal(self) -> bool {
        self == Self::Success || self.is_error()
    }

    /// Returns true while a send is in flight (neither idle nor terminal).
    pub fn is_in_progress(self) -> bool {
        self != Self::None && !self.is_terminal()
    }

    /// Whether the transition table permits `self -> next`.
    ///
    /// Reset (`-> None`) is not part of the table; it is handled by the
    /// tracker, which also invalidates the poller generation.
    pub fn can_transition_to(self, next: Self) -> bool {
        use CrossChainState::*;

        matches!(
            (self, next),
            (None, OriginPending)
                | (OriginPending, OriginError)
                | (OriginPending, RelayPending)
                | (RelayPending, RelayError)
                | (RelayPending, DestinationPending)
                | (RelayPending, DestinationError)
                | (RelayPending, Success)
                | (DestinationPending, DestinationError)
                | (DestinationPending, Success)
        )
    }

    /// Applies `next` in place if the table allows it.
    pub fn transition(&mut self, next: Self) -> Transition {
        if *self == next {
            Transition::Unchanged
        } else if self.can_transition_to(next) {
            *self = next;
            Transition::Advanced
        } else {
            Transition::Rejected
        }
    }
}

impl fmt::Display for CrossChainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::OriginPending => "origin_pending",
            Self::OriginError => "origin_error",
            Self::RelayPending => "relay_pending",
            Self::RelayError => "relay_error",
            Self::DestinationPending => "destination_pending",
            Self::DestinationError => "destination_error",
            Self::Success => "success",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use CrossChainState::*;

    const ALL: [CrossChainState; 8] = [
        None,
        OriginPending,
        OriginError,
        RelayPending,
        RelayError,
        DestinationPending,
        DestinationError,
        Success,
    ];

    #[test]
    fn test_declaration_order_is_the_total_order() {
        assert!(None < OriginPending);
        assert!(OriginPending < OriginError);
        assert!(OriginPending < RelayPending);
        assert!(RelayPending < RelayError);
        assert!(RelayPending < DestinationPending);
        assert!(DestinationPending < DestinationError);
        assert!(DestinationPending < Success);
    }

    #[rstest]
    #[case(None, OriginPending)]
    #[case(OriginPending, OriginError)]
    #[case(OriginPending, RelayPending)]
    #[case(RelayPending, RelayError)]
    #[case(RelayPending, DestinationPending)]
    #[case(RelayPending, DestinationError)]
    #[case(RelayPending, Success)]
    #[case(DestinationPending, DestinationError)]
    #[case(DestinationPending, Success)]
    fn test_permitted_transitions_advance(
        #[case] from: CrossChainState,
        #[case] to: CrossChainState,
    ) {
        let mut state = from;
        assert_eq!(state.transition(to), Transition::Advanced);
        assert_eq!(state, to);
    }

    #[test]
    fn test_every_successful_transition_is_non_decreasing() {
        for from in ALL {
            for to in ALL {
                if from.can_transition_to(to) {
                    assert!(from < to, "{from} -> {to} moves backwards");
                }
            }
        }
    }

    #[test]
    fn test_errors_and_success_are_sticky() {
        for from in [OriginError, RelayError, DestinationError, Success] {
            for to in ALL {
                let mut state = from;
                let outcome = state.transition(to);
                assert_ne!(outcome, Transition::Advanced, "{from} -> {to}");
                assert_eq!(state, from);
            }
        }
    }

    #[rstest]
    #[case(None, RelayPending)]
    #[case(None, Success)]
    #[case(OriginPending, Success)]
    #[case(DestinationPending, RelayPending)]
    #[case(DestinationPending, RelayError)]
    #[case(RelayPending, OriginError)]
    fn test_unlisted_transitions_are_rejected(
        #[case] from: CrossChainState,
        #[case] to: CrossChainState,
    ) {
        let mut state = from;
        assert_eq!(state.transition(to), Transition::Rejected);
        assert_eq!(state, from);
    }

    #[test]
    fn test_same_state_is_unchanged() {
        let mut state = RelayPending;
        assert_eq!(state.transition(RelayPending), Transition::Unchanged);
    }

    #[test]
    fn test_flags() {
        assert!(!None.is_in_progress());
        assert!(OriginPending.is_in_progress());
        assert!(DestinationPending.is_in_progress());
        assert!(Success.is_terminal() && !Success.is_error());
        assert!(RelayError.is_terminal() && RelayError.is_error());
    }
}
