use crate::models::HapticIntensity;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

/// Errors a platform haptic capability may report
#[derive(Debug, Error)]
pub enum HapticError {
    #[error("Haptics unavailable: {0}")]
    Unavailable(String),

    #[error("Haptic impact failed: {0}")]
    Failed(String),
}

/// Platform hook that plays a haptic impact.
///
/// Implementations must not block: the decision path calls this inline and
/// never waits on the device.
pub trait HapticCapability: Send + Sync {
    fn impact(&self, style: HapticIntensity) -> Result<(), HapticError>;
}

/// Best-effort adapter over an optional [`HapticCapability`].
///
/// `pulse` never fails. Without a capability it is a no-op, and capability
/// errors are logged and dropped.
#[derive(Clone, Default)]
pub struct HapticFeedback {
    capability: Option<Arc<dyn HapticCapability>>,
}

impl HapticFeedback {
    pub fn new(capability: Arc<dyn HapticCapability>) -> Self {
        Self {
            capability: Some(capability),
        }
    }

    /// Feedback that does nothing, for platforms without haptics
    pub fn disabled() -> Self {
        Self { capability: None }
    }

    pub fn pulse(&self, intensity: HapticIntensity) {
        let Some(capability) = &self.capability else {
            return;
        };

        if let Err(e) = capability.impact(intensity) {
            tracing::debug!("Ignoring haptic failure ({:?}): {}", intensity, e);
        }
    }
}

impl std::fmt::Debug for HapticFeedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HapticFeedback")
            .field("enabled", &self.capability.is_some())
            .finish()
    }
}

/// Collects intents so they can be handed back to the device that owns the motor
#[derive(Debug, Default)]
pub struct HapticIntentLog {
    intents: Mutex<Vec<HapticIntensity>>,
}

impl HapticIntentLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every intent recorded since the last drain
    pub fn drain(&self) -> Vec<HapticIntensity> {
        match self.intents.lock() {
            Ok(mut intents) => std::mem::take(&mut *intents),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl HapticCapability for HapticIntentLog {
    fn impact(&self, style: HapticIntensity) -> Result<(), HapticError> {
        self.intents
            .lock()
            .map_err(|e| HapticError::Failed(e.to_string()))?
            .push(style);
        Ok(())
    }
}

/// Forwards intents to a consumer task over an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelHaptics {
    sender: UnboundedSender<HapticIntensity>,
}

impl ChannelHaptics {
    pub fn new(sender: UnboundedSender<HapticIntensity>) -> Self {
        Self { sender }
    }
}

impl HapticCapability for ChannelHaptics {
    fn impact(&self, style: HapticIntensity) -> Result<(), HapticError> {
        self.sender
            .send(style)
            .map_err(|_| HapticError::Unavailable("haptic consumer has gone away".into()))
    }
}
