//! Liveness tokens
//!
//! A component owns a [`Liveness`]; every callback it hands to a lower layer
//! captures a [`LivenessToken`] instead of a strong reference to the component.
//! Once the component is dropped the token reports dead and the callback must
//! return without delivering anything.

use std::sync::{Arc, Weak};

/// Owned anchor whose lifetime matches the component that holds it
#[derive(Debug)]
pub struct Liveness {
    anchor: Arc<()>,
}

impl Liveness {
    pub fn new() -> Self {
        Self {
            anchor: Arc::new(()),
        }
    }

    /// Non-owning token to move into a callback
    pub fn token(&self) -> LivenessToken {
        LivenessToken {
            anchor: Arc::downgrade(&self.anchor),
        }
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct LivenessToken {
    anchor: Weak<()>,
}

impl LivenessToken {
    pub fn is_alive(&self) -> bool {
        self.anchor.strong_count() > 0
    }
}
