//! Per-placeholder state for one include pass.

use super::error::FragmentResult;
use super::path::resolve;

/// Lifecycle of a single placeholder.
///
/// ```text
/// Pending -> Fetching -> Replaced
///                     -> Errored
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    Pending,
    Fetching,
    Replaced,
    Errored,
}

impl TargetState {
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Replaced | Self::Errored)
    }
}

/// One discovered placeholder: its node, what it asked for, where that lives.
#[derive(Debug, Clone)]
pub struct IncludeTarget<N> {
    pub node: N,
    /// Path as declared on the element.
    pub path: String,
    /// Path after site-root resolution; this is what gets fetched.
    pub url: String,
    state: TargetState,
}

impl<N> IncludeTarget<N> {
    pub fn new(node: N, path: String, root: &str) -> Self {
        let url = resolve(&path, root);
        Self {
            node,
            path,
            url,
            state: TargetState::Pending,
        }
    }

    #[inline]
    pub const fn state(&self) -> TargetState {
        self.state
    }

    /// `Pending -> Fetching`.
    pub fn begin_fetch(&mut self) {
        debug_assert_eq!(self.state, TargetState::Pending);
        self.state = TargetState::Fetching;
    }

    /// `Fetching -> Replaced | Errored`.
    pub fn finish(&mut self, result: &FragmentResult) {
        debug_assert_eq!(self.state, TargetState::Fetching);
        self.state = match result {
            Ok(_) => TargetState::Replaced,
            Err(_) => TargetState::Errored,
        };
    }
}
