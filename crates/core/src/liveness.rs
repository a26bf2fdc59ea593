//! Owner tokens for suppressing completions after a loader is dropped.
//!
//! A loader owns a [`Liveness`] token. Work spawned on its behalf holds a
//! [`LivenessProbe`], which only keeps a weak reference. Once the loader is
//! dropped the probe reports dead and the spawned work must not deliver its
//! result.

use std::sync::{Arc, Weak};

/// Strong owner token. Dropping it kills every probe created from it.
#[derive(Debug, Default)]
pub struct Liveness {
    token: Arc<()>,
}

impl Liveness {
    /// Create a new live token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a probe that observes this token without keeping it alive.
    pub fn probe(&self) -> LivenessProbe {
        LivenessProbe {
            token: Arc::downgrade(&self.token),
        }
    }
}

/// Weak observer of a [`Liveness`] token.
#[derive(Debug, Clone)]
pub struct LivenessProbe {
    token: Weak<()>,
}

impl LivenessProbe {
    /// Whether the owning token still exists.
    pub fn is_alive(&self) -> bool {
        self.token.strong_count() > 0
    }

    /// Run `f` only if the owner is still alive.
    ///
    /// Returns `true` if `f` ran.
    pub fn deliver<F: FnOnce()>(&self, f: F) -> bool {
        if self.is_alive() {
            f();
            true
        } else {
            false
        }
    }
}
