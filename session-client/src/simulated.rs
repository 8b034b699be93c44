//! In-process device session backed by a [`DeviceProfile`]

use std::collections::HashMap;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::error::{Result, SessionError};
use crate::profile::{DeviceProfile, PropertySpec};
use crate::{BooleanEncoding, DeviceSession, LifecycleState, RawProperty, RawValue};

struct PendingTransition {
    target: LifecycleState,
    ready_at: Instant,
}

struct SessionState {
    state: LifecycleState,
    pending: Option<PendingTransition>,
    properties: Vec<PropertySpec>,
    trigger_counts: HashMap<String, u64>,
}

impl SessionState {
    /// Apply a pending transition whose deadline has passed
    fn settle(&mut self, now: Instant) {
        if let Some(pending) = &self.pending {
            if pending.ready_at <= now {
                tracing::debug!("Session reached state {}", pending.target);
                self.state = pending.target;
                self.pending = None;
            }
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.state == LifecycleState::Closed {
            return Err(SessionError::Closed);
        }
        Ok(())
    }

    fn is_visible(&self, spec: &PropertySpec) -> bool {
        !spec.software_emulated || self.state == LifecycleState::Active
    }

    fn visible(&self, name: &str) -> Result<&PropertySpec> {
        self.properties
            .iter()
            .find(|p| p.name == name && self.is_visible(p))
            .ok_or_else(|| SessionError::PropertyNotFound(name.to_string()))
    }

    fn visible_mut(&mut self, name: &str) -> Result<&mut PropertySpec> {
        let active = self.state == LifecycleState::Active;
        self.properties
            .iter_mut()
            .find(|p| p.name == name && (!p.software_emulated || active))
            .ok_or_else(|| SessionError::PropertyNotFound(name.to_string()))
    }
}

/// Simulated capture device
///
/// Starts in [`LifecycleState::Configured`]. Properties flagged as software
/// emulated are only enumerated while the session is
/// [`LifecycleState::Active`], mirroring cameras whose auto functions run in
/// the host pipeline rather than on the sensor.
pub struct SimulatedSession {
    serial: String,
    model: String,
    encoding: BooleanEncoding,
    latency: Duration,
    inner: Mutex<SessionState>,
}

impl SimulatedSession {
    /// Create a session from a profile
    pub fn new(profile: DeviceProfile) -> Result<Self> {
        profile.validate()?;

        tracing::debug!(
            "Opening simulated device {} ({}) with {} properties",
            profile.serial,
            profile.model,
            profile.properties.len()
        );

        Ok(Self {
            serial: profile.serial,
            model: profile.model,
            encoding: profile.boolean_encoding,
            latency: Duration::from_millis(profile.transition_latency_ms),
            inner: Mutex::new(SessionState {
                state: LifecycleState::Configured,
                pending: None,
                properties: profile.properties,
                trigger_counts: HashMap::new(),
            }),
        })
    }

    /// Model name of the simulated device
    pub fn model(&self) -> &str {
        &self.model
    }

    /// How many times a button has been fired
    pub fn trigger_count(&self, name: &str) -> u64 {
        self.inner
            .lock()
            .trigger_counts
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    fn check_boolean_wire(&self, name: &str, value: &RawValue) -> Result<()> {
        let accepted = match (self.encoding, value) {
            (BooleanEncoding::Native, RawValue::Bool(_)) => true,
            (BooleanEncoding::OnOff, RawValue::Str(s)) => s == "On" || s == "Off",
            _ => false,
        };
        if accepted {
            Ok(())
        } else {
            Err(SessionError::rejected(
                name,
                format!("value {} is not a {:?} boolean", value, self.encoding),
            ))
        }
    }
}

impl DeviceSession for SimulatedSession {
    fn identifier(&self) -> &str {
        &self.serial
    }

    fn boolean_encoding(&self) -> BooleanEncoding {
        self.encoding
    }

    fn state(&self) -> LifecycleState {
        let mut inner = self.inner.lock();
        inner.settle(Instant::now());
        inner.state
    }

    fn request_state(&self, target: LifecycleState) -> Result<()> {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        inner.settle(now);
        inner.ensure_open()?;

        if let Some(pending) = &inner.pending {
            if pending.target != target {
                return Err(SessionError::InvalidTransition {
                    from: inner.state,
                    to: target,
                });
            }
            return Ok(());
        }

        if inner.state == target {
            return Ok(());
        }

        tracing::debug!(
            "Device {} transitioning {} -> {} ({:?})",
            self.serial,
            inner.state,
            target,
            self.latency
        );

        inner.pending = Some(PendingTransition {
            target,
            ready_at: now + self.latency,
        });
        inner.settle(now);
        Ok(())
    }

    fn wait_state_reached(&self, timeout: Duration) -> Result<LifecycleState> {
        let start = Instant::now();
        let deadline = start + timeout;

        let (target, ready_at) = {
            let mut inner = self.inner.lock();
            inner.settle(start);
            match &inner.pending {
                None => return Ok(inner.state),
                Some(pending) => (pending.target, pending.ready_at),
            }
        };

        if ready_at > deadline {
            thread::sleep(deadline.saturating_duration_since(Instant::now()));
            tracing::warn!(
                "Device {} did not reach {} within {:?}",
                self.serial,
                target,
                timeout
            );
            return Err(SessionError::Timeout {
                target,
                waited: timeout,
            });
        }

        thread::sleep(ready_at.saturating_duration_since(Instant::now()));
        let mut inner = self.inner.lock();
        inner.settle(Instant::now().max(ready_at));
        Ok(inner.state)
    }

    fn raw_enumerate(&self) -> Result<Vec<RawProperty>> {
        let mut inner = self.inner.lock();
        inner.settle(Instant::now());
        inner.ensure_open()?;

        Ok(inner
            .properties
            .iter()
            .filter(|p| inner.is_visible(p))
            .map(PropertySpec::to_raw)
            .collect())
    }

    fn raw_get(&self, name: &str) -> Result<RawValue> {
        let mut inner = self.inner.lock();
        inner.settle(Instant::now());
        inner.ensure_open()?;

        let spec = inner.visible(name)?;
        spec.value
            .clone()
            .ok_or_else(|| SessionError::rejected(name, format!("{} property has no value", spec.kind)))
    }

    fn raw_set(&self, name: &str, value: RawValue) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.settle(Instant::now());
        inner.ensure_open()?;

        let spec = inner.visible_mut(name)?;
        if spec.is_kind("button") {
            return Err(SessionError::rejected(name, "buttons cannot be written"));
        }
        if spec.is_kind("boolean") {
            self.check_boolean_wire(name, &value)?;
        }
        if spec.is_kind("enum") {
            let known = matches!(&value, RawValue::Str(s) if spec.entries.contains(s));
            if !known {
                return Err(SessionError::rejected(name, format!("'{}' is not a menu entry", value)));
            }
        }

        tracing::debug!("Device {} set '{}' = {}", self.serial, name, value);
        spec.value = Some(value);
        Ok(())
    }

    fn raw_trigger(&self, name: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.settle(Instant::now());
        inner.ensure_open()?;

        if !inner.visible(name)?.is_kind("button") {
            return Err(SessionError::rejected(name, "only buttons can be triggered"));
        }

        tracing::debug!("Device {} triggered '{}'", self.serial, name);
        *inner.trigger_counts.entry(name.to_string()).or_insert(0) += 1;
        Ok(())
    }

    fn raw_menu_entries(&self, name: &str) -> Result<Vec<String>> {
        let mut inner = self.inner.lock();
        inner.settle(Instant::now());
        inner.ensure_open()?;

        let spec = inner.visible(name)?;
        if !spec.is_kind("enum") {
            return Err(SessionError::rejected(name, "only enum properties have menu entries"));
        }
        Ok(spec.entries.clone())
    }
}

impl std::fmt::Debug for SimulatedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedSession")
            .field("serial", &self.serial)
            .field("model", &self.model)
            .field("encoding", &self.encoding)
            .finish()
    }
}
