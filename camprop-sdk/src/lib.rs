//! # camprop SDK - typed property control for capture devices
//!
//! Provides a sync-first API over the property registry of a video-capture
//! device:
//!
//! ```rust
//! use camprop_sdk::{Brightness, Device, DeviceCatalog, ExposureAuto, GainAuto, SdkConfig};
//!
//! fn main() -> Result<(), camprop_sdk::SdkError> {
//!     camprop_sdk::initialize()?;
//!
//!     let catalog = DeviceCatalog::builtin();
//!     let device = Device::open(None, &catalog, SdkConfig::default())?;
//!
//!     // Auto functions on this camera are software-emulated and only
//!     // exist while the pipeline runs
//!     device.start()?;
//!
//!     device.property::<ExposureAuto>().set(false)?;
//!     device.property::<GainAuto>().set(false)?;
//!     if device.property::<Brightness>().is_available()? {
//!         device.property::<Brightness>().set(200)?;
//!     }
//!
//!     for name in device.registry().list_names()? {
//!         let descriptor = device.registry().get_descriptor(&name)?;
//!         println!("{}({})", descriptor.name(), descriptor.kind());
//!     }
//!
//!     device.close()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Key Features
//!
//! - **Typed handles**: `get()`, `set()`, `trigger()` and `is_available()` on
//!   well-known properties, resolved across device naming families
//! - **Raw registry**: every property the device reports, with descriptors
//!   validated against a closed set of kinds
//! - **Explicit lifecycle**: `start()`, `stop()`, `close()` with a bounded
//!   wait, and `survey()` for the union of both states
//! - **Simulated devices**: declarative JSON profiles stand in for hardware
//!
//! ## Architecture
//!
//! ```text
//! camprop-sdk (Device, typed handles, survey)
//!     ↓
//! property-registry (typed descriptors, validated reads/writes)
//!     ↓
//! session-client (raw session contract, simulated backend)
//! ```

// Main exports
pub use config::{default_profile_path, SdkConfig, ENV_PROFILE, ENV_STATE_TIMEOUT_MS};
pub use device::Device;
pub use error::{Result, SdkError};
pub use runtime::{initialize, is_initialized, shutdown};
pub use survey::{Availability, Survey, SurveyEntry};

pub use property::{
    Brightness, ButtonProperty, DeviceProperty, ExposureAuto, ExposureTime, Gain, GainAuto,
    PropertyHandle, SoftwareTrigger, ValueProperty,
};

// Re-export commonly used types from the lower layers
pub use property_registry::{
    parse_boolean_token, PropertyDescriptor, PropertyInfo, PropertyKind, PropertyValue,
    RegistryClient, RegistryError,
};
pub use session_client::{
    BooleanEncoding, DeviceCatalog, DeviceProfile, DeviceSession, LifecycleState,
    SessionProvider,
};

// Internal modules
mod config;
mod device;
mod error;
mod runtime;
mod survey;

pub mod property;
