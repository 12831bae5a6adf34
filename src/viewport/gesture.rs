//! Click / double-click detection on nodes
//!
//! Kept apart from the pan state machine: a press on a node feeds this
//! detector, a press on empty canvas starts a pan. Time is passed in by the
//! caller so the machine can be driven deterministically.

use crate::graph::NodeId;
use std::time::{Duration, Instant};

/// Classification of a press on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    /// Select the node
    Single,
    /// Second press on the same node within the window: expand it
    Double,
}

#[derive(Debug, Clone, PartialEq)]
enum ClickState {
    Idle,
    Armed { node: NodeId, at: Instant },
}

/// `Idle --press(n)--> Armed(n)`; `Armed(n) --press(n) within window--> Idle`
/// reporting a double click; any other press re-arms on the new node.
#[derive(Debug, Clone)]
pub struct ClickDetector {
    window: Duration,
    state: ClickState,
}

impl ClickDetector {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: ClickState::Idle,
        }
    }

    /// Register a press on `node` at time `at`
    pub fn press_node(&mut self, node: &NodeId, at: Instant) -> ClickKind {
        let is_double = matches!(
            &self.state,
            ClickState::Armed { node: armed, at: armed_at }
                if armed == node && at.saturating_duration_since(*armed_at) <= self.window
        );

        if is_double {
            self.state = ClickState::Idle;
            ClickKind::Double
        } else {
            self.state = ClickState::Armed {
                node: node.clone(),
                at,
            };
            ClickKind::Single
        }
    }

    /// A press that hit no node disarms the detector
    pub fn press_background(&mut self) {
        self.state = ClickState::Idle;
    }

    /// Forget any pending first click (e.g. after a reset)
    pub fn reset(&mut self) {
        self.state = ClickState::Idle;
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, ClickState::Armed { .. })
    }
}

impl Default for ClickDetector {
    fn default() -> Self {
        Self::new(Duration::from_millis(400))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_click_within_window() {
        let mut clicks = ClickDetector::default();
        let n = NodeId::new("n1");
        let t0 = Instant::now();

        assert_eq!(clicks.press_node(&n, t0), ClickKind::Single);
        assert!(clicks.is_armed());
        assert_eq!(clicks.press_node(&n, t0 + Duration::from_millis(250)), ClickKind::Double);
        assert!(!clicks.is_armed());

        // A third press starts over
        assert_eq!(clicks.press_node(&n, t0 + Duration::from_millis(300)), ClickKind::Single);
    }

    #[test]
    fn test_slow_second_click_is_single() {
        let mut clicks = ClickDetector::default();
        let n = NodeId::new("n1");
        let t0 = Instant::now();

        clicks.press_node(&n, t0);
        assert_eq!(clicks.press_node(&n, t0 + Duration::from_millis(900)), ClickKind::Single);
        assert_eq!(clicks.press_node(&n, t0 + Duration::from_millis(1000)), ClickKind::Double);
    }

    #[test]
    fn test_click_on_other_node_rearms() {
        let mut clicks = ClickDetector::default();
        let t0 = Instant::now();

        clicks.press_node(&NodeId::new("a"), t0);
        assert_eq!(
            clicks.press_node(&NodeId::new("b"), t0 + Duration::from_millis(50)),
            ClickKind::Single
        );
        assert_eq!(
            clicks.press_node(&NodeId::new("b"), t0 + Duration::from_millis(100)),
            ClickKind::Double
        );
    }

    #[test]
    fn test_background_press_disarms() {
        let mut clicks = ClickDetector::default();
        let n = NodeId::new("n1");
        let t0 = Instant::now();

        clicks.press_node(&n, t0);
        clicks.press_background();
        assert_eq!(clicks.press_node(&n, t0 + Duration::from_millis(100)), ClickKind::Single);
    }
}
