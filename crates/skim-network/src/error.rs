//! Network-subsystem error type.
//!
//! Every variant is a hard engine fault: the skim driver aborts the whole
//! run when one surfaces, since partial matrices are not trustworthy.

use thiserror::Error;

use skim_core::{LinkId, NodeId};

/// Which of the two pluggable link functions produced a bad value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CostKind {
    TravelTime,
    Disutility,
}

impl std::fmt::Display for CostKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CostKind::TravelTime => "travel time",
            CostKind::Disutility => "disutility",
        })
    }
}

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("{0} not found in network")]
    NodeNotFound(NodeId),

    #[error("non-finite {kind} {value} on {link} at t={time}")]
    NonFiniteCost { kind: CostKind, link: LinkId, time: f64, value: f64 },

    #[error("negative {kind} {value} on {link} at t={time}")]
    NegativeCost { kind: CostKind, link: LinkId, time: f64, value: f64 },

    #[error(
        "settled label of {node} would decrease from {settled} to {candidate} via {link} \
         (negative cycle or engine bug)"
    )]
    SettledLabelDecreased { node: NodeId, link: LinkId, settled: f64, candidate: f64 },
}

pub type NetworkResult<T> = Result<T, NetworkError>;
