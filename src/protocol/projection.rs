//! Three-stage status projection
//!
//! Collapses the unified state and the last relay snapshot into the
//! origin / relay / destination view that a front end renders. Everything here
//! is a pure function of its inputs, so it is safe to call at any time,
//! including while a poll is outstanding.

use std::fmt;

use alloy_primitives::TxHash;
use serde::{Deserialize, Serialize};

use super::{CrossChainState, RelayStatusSnapshot};

/// How much of the delivery pipeline a protocol can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Relay dispatch and destination execution are distinct observable stages.
    Full,
    /// The relay reports delivery, but destination execution is not observed
    /// separately.
    RelayOnly,
    /// Nothing is observable after the origin transaction; delivery is assumed.
    OriginOnly,
}

impl Visibility {
    pub fn observes_destination(self) -> bool {
        self == Self::Full
    }

    pub fn observes_relay(self) -> bool {
        self != Self::OriginOnly
    }
}

/// Human-facing status of one stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Nothing known yet, rendered as `---`.
    #[default]
    Unknown,
    Pending,
    Error,
    Success,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unknown => "---",
            Self::Pending => "PENDING",
            Self::Error => "ERROR",
            Self::Success => "SUCCESS",
        })
    }
}

/// The derived `(origin, relay, destination)` triple. Never stored; recompute
/// it with [`project`] whenever it is needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectedStatus {
    pub origin: Stage,
    pub relay: Stage,
    pub destination: Stage,
}

impl fmt::Display for ProjectedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "origin={} relay={} destination={}",
            self.origin, self.relay, self.destination
        )
    }
}

/// Projects the unified state onto the three presentation stages.
pub fn project(
    state: CrossChainState,
    snapshot: Option<&RelayStatusSnapshot>,
    visibility: Visibility,
) -> ProjectedStatus {
    use CrossChainState as S;

    let origin = match state {
        S::None => Stage::Unknown,
        S::OriginPending => Stage::Pending,
        S::OriginError => Stage::Error,
        _ => Stage::Success,
    };

    let relay = if !visibility.observes_relay() || state < S::RelayPending {
        Stage::Unknown
    } else if state == S::RelayError {
        // Transport failures reach RelayError without ever producing a snapshot.
        Stage::Error
    } else if snapshot.is_none() {
        Stage::Unknown
    } else if state >= S::DestinationPending {
        Stage::Success
    } else {
        Stage::Pending
    };

    // A reported destination failure surfaces even when execution is not observed.
    let destination = if state == S::DestinationError {
        Stage::Error
    } else if !visibility.observes_destination() || state < S::DestinationPending {
        Stage::Unknown
    } else if state == S::Success {
        Stage::Success
    } else {
        Stage::Pending
    };

    ProjectedStatus {
        origin,
        relay,
        destination,
    }
}

/// Presentation summary of a tracker, the shape a status panel consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub stages: ProjectedStatus,
    pub is_error: bool,
    pub is_loading: bool,
    /// True when the protocol distinguishes relay dispatch from destination
    /// execution.
    pub full_visibility: bool,
    pub destination_tx_hash: Option<TxHash>,
}

impl StatusReport {
    pub fn new(
        state: CrossChainState,
        snapshot: Option<&RelayStatusSnapshot>,
        visibility: Visibility,
    ) -> Self {
        Self {
            stages: project(state, snapshot, visibility),
            is_error: state.is_error(),
            is_loading: state.is_in_progress(),
            full_visibility: visibility.observes_destination(),
            destination_tx_hash: snapshot.and_then(|s| s.destination_tx_hash),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use CrossChainState as S;

    fn render(state: CrossChainState, polled: bool, visibility: Visibility) -> String {
        let snapshot = RelayStatusSnapshot::new("any");
        project(state, polled.then_some(&snapshot), visibility).to_string()
    }

    #[test]
    fn test_full_visibility_projection_table() {
        let rows: Vec<String> = [
            (S::None, false),
            (S::OriginPending, false),
            (S::OriginError, false),
            (S::RelayPending, false),
            (S::RelayPending, true),
            (S::RelayError, false),
            (S::DestinationPending, true),
            (S::DestinationError, true),
            (S::Success, true),
        ]
        .into_iter()
        .map(|(state, polled)| {
            format!("{state}: {}", render(state, polled, Visibility::Full))
        })
        .collect();

        insta::assert_snapshot!(rows.join("\n"), @r"
        none: origin=--- relay=--- destination=---
        origin_pending: origin=PENDING relay=--- destination=---
        origin_error: origin=ERROR relay=--- destination=---
        relay_pending: origin=SUCCESS relay=--- destination=---
        relay_pending: origin=SUCCESS relay=PENDING destination=---
        relay_error: origin=SUCCESS relay=ERROR destination=---
        destination_pending: origin=SUCCESS relay=SUCCESS destination=PENDING
        destination_error: origin=SUCCESS relay=SUCCESS destination=ERROR
        success: origin=SUCCESS relay=SUCCESS destination=SUCCESS
        ");
    }

    #[rstest]
    #[case(S::RelayPending)]
    #[case(S::DestinationPending)]
    #[case(S::Success)]
    fn test_reduced_visibility_hides_destination_progress(#[case] state: CrossChainState) {
        let snapshot = RelayStatusSnapshot::new("DELIVERED");
        for visibility in [Visibility::RelayOnly, Visibility::OriginOnly] {
            let projected = project(state, Some(&snapshot), visibility);
            assert_eq!(projected.destination, Stage::Unknown);
        }
    }

    #[rstest]
    #[case(Visibility::Full)]
    #[case(Visibility::RelayOnly)]
    #[case(Visibility::OriginOnly)]
    fn test_destination_error_always_rendered(#[case] visibility: Visibility) {
        let snapshot = RelayStatusSnapshot::new("FAILED").with_destination_success(Some(false));
        let projected = project(S::DestinationError, Some(&snapshot), visibility);
        assert_eq!(projected.destination, Stage::Error);
        assert_ne!(projected.to_string(), "origin=SUCCESS relay=SUCCESS destination=---");
    }

    #[test]
    fn test_origin_only_never_shows_relay() {
        let snapshot = RelayStatusSnapshot::new("assumed_delivered");
        let projected = project(S::Success, Some(&snapshot), Visibility::OriginOnly);
        assert_eq!(
            projected,
            ProjectedStatus {
                origin: Stage::Success,
                relay: Stage::Unknown,
                destination: Stage::Unknown,
            }
        );
    }

    #[test]
    fn test_relay_only_success() {
        let snapshot = RelayStatusSnapshot::new("DELIVERED");
        let projected = project(S::Success, Some(&snapshot), Visibility::RelayOnly);
        assert_eq!(projected.relay, Stage::Success);
    }

    #[test]
    fn test_status_report_flags() {
        let hash = TxHash::from([7u8; 32]);
        let snapshot = RelayStatusSnapshot::new("destination_executed")
            .with_destination_tx_hash(Some(hash));

        let report = StatusReport::new(S::Success, Some(&snapshot), Visibility::Full);
        assert!(!report.is_error);
        assert!(!report.is_loading);
        assert!(report.full_visibility);
        assert_eq!(report.destination_tx_hash, Some(hash));

        let report = StatusReport::new(S::RelayPending, None, Visibility::RelayOnly);
        assert!(report.is_loading);
        assert!(!report.full_visibility);

        let report = StatusReport::new(S::OriginError, None, Visibility::Full);
        assert!(report.is_error);
        assert!(!report.is_loading);
    }
}
