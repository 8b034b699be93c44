//! Device session contract for capture-device property access
//!
//! This crate defines the raw, untyped interface a video-capture device
//! session exposes to property clients: lifecycle transitions, enumeration of
//! property records, and raw reads, writes and triggers. It also ships a
//! simulated backend driven by declarative device profiles, used wherever
//! the native capture library is not available.
//!
//! # Quick Start
//!
//! ```
//! use std::time::Duration;
//! use session_client::{DeviceCatalog, LifecycleState, SessionProvider};
//!
//! let catalog = DeviceCatalog::builtin();
//! let session = catalog.open(None).unwrap();
//!
//! // Software-emulated properties only show up once the pipeline runs
//! session.request_state(LifecycleState::Active).unwrap();
//! session.wait_state_reached(Duration::from_secs(4)).unwrap();
//!
//! for record in session.raw_enumerate().unwrap() {
//!     println!("{} ({})", record.name, record.kind);
//! }
//! ```

mod catalog;
mod error;
mod profile;
mod simulated;

pub use catalog::DeviceCatalog;
pub use error::{Result, SessionError};
pub use profile::{DeviceProfile, PropertySpec};
pub use simulated::SimulatedSession;

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a device session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// Pipeline built but not running
    Configured,
    /// Pipeline running; software-emulated properties are materialized
    Active,
    /// Session torn down
    Closed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Configured => "configured",
            LifecycleState::Active => "active",
            LifecycleState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Wire representation a device family uses for boolean properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanEncoding {
    /// Booleans travel as wire booleans
    #[default]
    Native,
    /// Booleans travel as the strings `"On"` / `"Off"` (GigE family)
    OnOff,
}

/// Untyped value as it crosses the session boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(String),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Bool(v) => write!(f, "{}", v),
            RawValue::Int(v) => write!(f, "{}", v),
            RawValue::Double(v) => write!(f, "{}", v),
            RawValue::Str(v) => f.write_str(v),
        }
    }
}

/// One property record as reported by [`DeviceSession::raw_enumerate`]
///
/// Field presence is not checked here; interpreting the record against its
/// kind string is the property client's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProperty {
    pub name: String,
    pub kind: String,
    pub value: Option<RawValue>,
    pub minimum: Option<RawValue>,
    pub maximum: Option<RawValue>,
    pub default_value: Option<RawValue>,
    pub step: Option<RawValue>,
    pub category: String,
    pub group: String,
}

/// Raw operations offered by an open device session
///
/// All calls block until the device answers. Implementations may be shared
/// across threads, but callers are expected to serialize mutating calls on
/// the same property.
pub trait DeviceSession: Send + Sync {
    /// Identifier (serial) of the device behind this session
    fn identifier(&self) -> &str;

    /// Boolean wire encoding used by this device family
    fn boolean_encoding(&self) -> BooleanEncoding;

    /// Current lifecycle state
    fn state(&self) -> LifecycleState;

    /// Ask the device to move to `target`; completion must be awaited with
    /// [`DeviceSession::wait_state_reached`]
    fn request_state(&self, target: LifecycleState) -> Result<()>;

    /// Block until the last requested state is reached or `timeout` elapses
    fn wait_state_reached(&self, timeout: Duration) -> Result<LifecycleState>;

    /// Property records visible in the current state, in stable order
    fn raw_enumerate(&self) -> Result<Vec<RawProperty>>;

    /// Current raw value of a property
    fn raw_get(&self, name: &str) -> Result<RawValue>;

    /// Write a raw value
    fn raw_set(&self, name: &str, value: RawValue) -> Result<()>;

    /// Fire a button property once
    fn raw_trigger(&self, name: &str) -> Result<()>;

    /// Menu entries of an enum property
    fn raw_menu_entries(&self, name: &str) -> Result<Vec<String>>;
}

/// Opens device sessions
pub trait SessionProvider {
    /// Open the device with the given identifier, or the default device
    /// when `identifier` is `None`
    fn open(&self, identifier: Option<&str>) -> Result<Box<dyn DeviceSession>>;

    /// Identifiers of the devices this provider can open
    fn identifiers(&self) -> Vec<String>;
}
