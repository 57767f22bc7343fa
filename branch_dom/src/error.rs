// Copyright 2025 the Branch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised by the document host.

use crate::node::NodeId;

/// Programmer errors surfaced by the document host.
///
/// "Not found" conditions (detaching a listener that was never attached,
/// querying a node without subscriptions) are never errors; they return
/// `false`, `None` or an empty result instead. The variants below all belong
/// to the invalid-argument class: the caller handed over a value the host
/// cannot resolve to a live element.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The handle does not refer to any slot of this document.
    #[error("invalid argument: {0:?} is not a node of this document")]
    UnknownNode(NodeId),
    /// The handle refers to a node that has since been removed.
    #[error("invalid argument: {0:?} has been removed from the document")]
    RemovedNode(NodeId),
    /// The node exists but cannot take part in the requested operation.
    #[error("invalid argument: {node:?} {reason}")]
    Unsupported {
        /// The offending node.
        node: NodeId,
        /// What the node cannot do.
        reason: &'static str,
    },
}

impl DomError {
    /// The node handle the error is about.
    pub fn node(&self) -> NodeId {
        match self {
            Self::UnknownNode(node) | Self::RemovedNode(node) => *node,
            Self::Unsupported { node, .. } => *node,
        }
    }
}
