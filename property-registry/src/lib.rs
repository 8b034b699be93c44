//! Typed dynamic property registry
//!
//! Enumerates, describes, reads and writes the named properties of a
//! capture-device session through a closed set of property kinds, rejecting
//! mismatched types and out-of-range values before they reach the device.
//!
//! # Quick Start
//!
//! ```
//! use std::time::Duration;
//! use property_registry::{open_registry, RegistryError};
//! use session_client::{DeviceCatalog, LifecycleState, SessionProvider};
//!
//! let session = DeviceCatalog::builtin().open(None).unwrap();
//! session.request_state(LifecycleState::Active).unwrap();
//! session.wait_state_reached(Duration::from_secs(4)).unwrap();
//!
//! let registry = open_registry(session.as_ref());
//! for name in registry.list_names().unwrap() {
//!     let descriptor = registry.get_descriptor(&name).unwrap();
//!     println!("{}({})", descriptor.name(), descriptor.kind());
//! }
//!
//! registry.set_value("Exposure Auto", false).unwrap();
//! assert!(!registry.get_value::<bool>("Exposure Auto").unwrap());
//!
//! // Absence is an ordinary outcome, not a panic
//! assert!(matches!(
//!     registry.get_descriptor("DoesNotExist"),
//!     Err(RegistryError::NotFound(_))
//! ));
//! ```
//!
//! # Lifecycle
//!
//! The visible property set depends on the session's lifecycle state, and the
//! registry caches nothing. A caller that needs the complete surface of a
//! device enumerates once per reachable state and merges the results itself.

mod client;
mod descriptor;
mod error;
mod kind;
mod value;

pub use client::{open_registry, RegistryClient};
pub use descriptor::{PropertyDescriptor, PropertyInfo};
pub use error::{RegistryError, Result};
pub use kind::{PropertyKind, UnknownKind};
pub use value::{parse_boolean_token, FromPropertyValue, PropertyValue};
