//! Catalog of simulated devices
//!
//! The catalog plays the part of device discovery: it knows a set of device
//! profiles and opens a [`SimulatedSession`] for one of them on request.

use std::fs;
use std::path::Path;

use crate::error::{Result, SessionError};
use crate::profile::DeviceProfile;
use crate::simulated::SimulatedSession;
use crate::{DeviceSession, SessionProvider};

/// A set of device profiles that sessions can be opened against
#[derive(Debug, Clone)]
pub struct DeviceCatalog {
    profiles: Vec<DeviceProfile>,
}

impl DeviceCatalog {
    /// Catalog with the built-in USB and GigE cameras, USB first
    pub fn builtin() -> Self {
        Self {
            profiles: vec![DeviceProfile::usb_camera(), DeviceProfile::gige_camera()],
        }
    }

    /// Catalog from explicit profiles; the first one is the default device
    pub fn from_profiles(profiles: Vec<DeviceProfile>) -> Result<Self> {
        for profile in &profiles {
            profile.validate()?;
        }
        Ok(Self { profiles })
    }

    /// Parse a JSON array of profiles
    pub fn from_json(json: &str) -> Result<Self> {
        let profiles: Vec<DeviceProfile> = serde_json::from_str(json)
            .map_err(|e| SessionError::Profile(format!("Invalid catalog JSON: {}", e)))?;
        Self::from_profiles(profiles)
    }

    /// Load a JSON array of profiles from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            SessionError::Profile(format!("Cannot read {}: {}", path.display(), e))
        })?;
        tracing::debug!("Loaded device catalog from {}", path.display());
        Self::from_json(&json)
    }

    pub fn profiles(&self) -> &[DeviceProfile] {
        &self.profiles
    }

    /// Profile for `identifier`, or the default profile when `None`
    pub fn find(&self, identifier: Option<&str>) -> Result<&DeviceProfile> {
        match identifier {
            Some(serial) => self
                .profiles
                .iter()
                .find(|p| p.serial == serial)
                .ok_or_else(|| SessionError::DeviceNotFound(serial.to_string())),
            None => self
                .profiles
                .first()
                .ok_or_else(|| SessionError::DeviceNotFound("<default>".to_string())),
        }
    }

    /// Open a concrete simulated session, keeping access to its test hooks
    pub fn open_simulated(&self, identifier: Option<&str>) -> Result<SimulatedSession> {
        let profile = self.find(identifier)?;
        SimulatedSession::new(profile.clone())
    }
}

impl Default for DeviceCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SessionProvider for DeviceCatalog {
    fn open(&self, identifier: Option<&str>) -> Result<Box<dyn DeviceSession>> {
        Ok(Box::new(self.open_simulated(identifier)?))
    }

    fn identifiers(&self) -> Vec<String> {
        self.profiles.iter().map(|p| p.serial.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_default_device() {
        let catalog = DeviceCatalog::builtin();
        let session = catalog.open(None).unwrap();
        assert_eq!(session.identifier(), "27710767");
    }

    #[test]
    fn test_open_by_serial() {
        let catalog = DeviceCatalog::builtin();
        let session = catalog.open(Some("46810320")).unwrap();
        assert_eq!(session.identifier(), "46810320");
    }

    #[test]
    fn test_open_unknown_serial() {
        let catalog = DeviceCatalog::builtin();
        assert!(matches!(
            catalog.open(Some("00000000")),
            Err(SessionError::DeviceNotFound(serial)) if serial == "00000000"
        ));
    }

    #[test]
    fn test_empty_catalog_has_no_default() {
        let catalog = DeviceCatalog::from_profiles(Vec::new()).unwrap();
        assert!(matches!(catalog.open(None), Err(SessionError::DeviceNotFound(_))));
    }

    #[test]
    fn test_identifiers_keep_catalog_order() {
        assert_eq!(
            DeviceCatalog::builtin().identifiers(),
            vec!["27710767".to_string(), "46810320".to_string()]
        );
    }

    #[test]
    fn test_from_json_round_trips_builtin() {
        let json = serde_json::to_string(DeviceCatalog::builtin().profiles()).unwrap();
        let catalog = DeviceCatalog::from_json(&json).unwrap();
        assert_eq!(catalog.profiles(), DeviceCatalog::builtin().profiles());
    }
}
