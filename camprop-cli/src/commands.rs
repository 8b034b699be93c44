//! Subcommand implementations
//!
//! Every command writes its report to `out` so the same code paths serve the
//! terminal and the tests.

use std::io::Write;

use anyhow::{bail, Context, Result};
use camprop_sdk::{
    Brightness, Device, DeviceCatalog, ExposureAuto, GainAuto, PropertyKind, RegistryError,
};
use tracing::{info, warn};

use crate::output::{format_descriptor, format_survey};
use crate::value_arg::parse_value;
use crate::Config;

/// List the devices the catalog knows
pub fn devices(catalog: &DeviceCatalog, out: &mut dyn Write) -> Result<()> {
    if catalog.profiles().is_empty() {
        writeln!(out, "No devices found")?;
        return Ok(());
    }

    for profile in catalog.profiles() {
        writeln!(
            out,
            "{}\t{}\t{} properties ({:?} booleans)",
            profile.serial,
            profile.model,
            profile.properties.len(),
            profile.boolean_encoding
        )?;
    }
    Ok(())
}

/// Print every visible property, optionally after starting the device
pub fn list(config: &Config, catalog: &DeviceCatalog, active: bool, out: &mut dyn Write) -> Result<()> {
    let device = open_device(config, catalog)?;
    if active {
        device.start().context("Failed to start device")?;
    }

    let registry = device.registry();
    let names = registry.list_names().context("Failed to enumerate properties")?;
    info!("Listing {} properties in state {}", names.len(), device.state());

    let mut descriptors = Vec::with_capacity(names.len());
    for name in names {
        match registry.get_descriptor(&name) {
            Ok(descriptor) => {
                if !config.json {
                    writeln!(out, "{}", format_descriptor(&descriptor))?;
                }
                descriptors.push(descriptor);
            }
            Err(e @ RegistryError::Unsupported { .. }) => {
                warn!("{}", e);
                if !config.json {
                    writeln!(out, "{}(unsupported)", name)?;
                }
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to describe '{}'", name)),
        }
    }

    if config.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&descriptors)?)?;
    }

    device.close().context("Failed to close device")?;
    Ok(())
}

/// Print one property
pub fn get(config: &Config, catalog: &DeviceCatalog, name: &str, out: &mut dyn Write) -> Result<()> {
    let device = open_started(config, catalog)?;
    let descriptor = device
        .registry()
        .get_descriptor(name)
        .with_context(|| format!("Failed to read '{}'", name))?;

    if config.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&descriptor)?)?;
    } else {
        writeln!(out, "{}", format_descriptor(&descriptor))?;
    }

    device.close().context("Failed to close device")?;
    Ok(())
}

/// Write one property and print its new state
pub fn set(
    config: &Config,
    catalog: &DeviceCatalog,
    name: &str,
    raw_value: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let device = open_started(config, catalog)?;
    let registry = device.registry();

    let kind = registry
        .get_descriptor(name)
        .with_context(|| format!("Failed to read '{}'", name))?
        .kind();
    let value = parse_value(raw_value, kind);
    registry
        .set_value(name, value)
        .with_context(|| format!("Failed to set '{}' to '{}'", name, raw_value))?;

    let descriptor = registry
        .get_descriptor(name)
        .with_context(|| format!("Failed to read back '{}'", name))?;
    writeln!(out, "{}", format_descriptor(&descriptor))?;

    device.close().context("Failed to close device")?;
    Ok(())
}

/// Fire a button property
pub fn trigger(config: &Config, catalog: &DeviceCatalog, name: &str, out: &mut dyn Write) -> Result<()> {
    let device = open_started(config, catalog)?;
    device
        .registry()
        .trigger(name)
        .with_context(|| format!("Failed to trigger '{}'", name))?;
    writeln!(out, "Triggered {}", name)?;

    device.close().context("Failed to close device")?;
    Ok(())
}

/// Print the union of both lifecycle states
pub fn survey(config: &Config, catalog: &DeviceCatalog, out: &mut dyn Write) -> Result<()> {
    let device = open_device(config, catalog)?;
    let survey = device.survey().context("Failed to survey device")?;

    if config.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&survey)?)?;
    } else {
        writeln!(out, "{}", format_survey(&survey))?;
    }

    device.close().context("Failed to close device")?;
    Ok(())
}

/// Disable the auto functions and set brightness, printing before and after
pub fn demo(config: &Config, catalog: &DeviceCatalog, out: &mut dyn Write) -> Result<()> {
    let device = open_started(config, catalog)?;

    writeln!(out, "Values before we change them:")?;
    print_demo_values(&device, out)?;

    device
        .property::<ExposureAuto>()
        .set(false)
        .context("Failed to disable Exposure Auto")?;
    device
        .property::<GainAuto>()
        .set(false)
        .context("Failed to disable Gain Auto")?;

    let brightness = device.property::<Brightness>();
    if brightness.is_available()? {
        brightness.set(200).context("Failed to set Brightness")?;
    } else {
        warn!("Device {} has no Brightness property", device.identifier());
    }

    writeln!(out, "\nValues after we changed them:")?;
    print_demo_values(&device, out)?;

    device.close().context("Failed to close device")?;
    Ok(())
}

fn print_demo_values(device: &Device, out: &mut dyn Write) -> Result<()> {
    let registry = device.registry();
    for name in ["Exposure Auto", "Gain Auto", "Brightness"] {
        match registry.get_descriptor(name) {
            Ok(descriptor) if descriptor.kind() != PropertyKind::Button => {
                writeln!(out, "{}: {}", name, descriptor.value()?)?;
            }
            Ok(_) => bail!("'{}' unexpectedly is a button", name),
            Err(RegistryError::NotFound(_)) => writeln!(out, "{}: not available", name)?,
            Err(e) => return Err(e).with_context(|| format!("Failed to read '{}'", name)),
        }
    }
    Ok(())
}

fn open_device(config: &Config, catalog: &DeviceCatalog) -> Result<Device> {
    let device = Device::open(config.serial.as_deref(), catalog, config.sdk.clone())
        .context("Failed to open device")?;
    info!("Using device {}", device.identifier());
    Ok(device)
}

/// Open and, unless disabled, start the device
fn open_started(config: &Config, catalog: &DeviceCatalog) -> Result<Device> {
    let device = open_device(config, catalog)?;
    if config.auto_start {
        device.start().context("Failed to start device")?;
    }
    Ok(device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camprop_sdk::SdkConfig;
    use rstest::rstest;

    fn config() -> Config {
        camprop_sdk::initialize().unwrap();
        Config {
            serial: None,
            sdk: SdkConfig::fast(),
            log_level: "info".to_string(),
            auto_start: true,
            json: false,
        }
    }

    fn run(f: impl FnOnce(&mut dyn Write) -> Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_devices_lists_builtin_catalog() {
        let text = run(|out| devices(&DeviceCatalog::builtin(), out));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("27710767\tDFK 72BUC02"));
        assert!(lines[1].contains("OnOff"));
    }

    #[test]
    fn test_list_grows_after_start() {
        let config = config();
        let catalog = DeviceCatalog::builtin();

        let before = run(|out| list(&config, &catalog, false, out));
        let after = run(|out| list(&config, &catalog, true, out));

        assert!(!before.contains("Exposure Auto(boolean)"));
        assert!(after.contains("Exposure Auto(boolean) value: true"));
        assert!(after.contains("\tCenter 50%"));
    }

    #[test]
    fn test_set_prints_new_value() {
        let config = config();
        let catalog = DeviceCatalog::builtin();

        let text = run(|out| set(&config, &catalog, "Brightness", "200", out));
        assert!(text.starts_with("Brightness(integer) value: 200"));
    }

    #[test]
    fn test_set_out_of_range_fails() {
        let config = config();
        let catalog = DeviceCatalog::builtin();
        let mut out = Vec::new();

        let err = set(&config, &catalog, "Brightness", "300", &mut out).unwrap_err();
        assert!(err.to_string().contains("Failed to set 'Brightness'"));
        assert!(out.is_empty());
    }

    #[rstest]
    #[case("Device User ID", "123", "Device User ID(string) value: 123")]
    #[case("Exposure Auto", "1", "Exposure Auto(boolean) value: true")]
    #[case("Exposure Auto", "0", "Exposure Auto(boolean) value: false")]
    #[case("Gain", "12", "Gain(double) value: 12")]
    #[case("Brightness", "200.0", "Brightness(integer) value: 200")]
    fn test_set_parses_value_for_kind(#[case] name: &str, #[case] raw: &str, #[case] expected: &str) {
        let config = config();
        let catalog = DeviceCatalog::builtin();

        let text = run(|out| set(&config, &catalog, name, raw, out));
        assert!(text.starts_with(expected), "unexpected output {:?}", text);
    }

    #[test]
    fn test_set_numeric_enum_entry() {
        let config = config();
        let profile: camprop_sdk::DeviceProfile = serde_json::from_value(serde_json::json!({
            "serial": "1",
            "model": "Test",
            "properties": [{
                "name": "Binning",
                "kind": "enum",
                "value": "1",
                "default": "1",
                "entries": ["1", "2", "4"]
            }]
        }))
        .unwrap();
        let catalog = DeviceCatalog::from_profiles(vec![profile]).unwrap();

        let text = run(|out| set(&config, &catalog, "Binning", "2", out));
        assert!(text.starts_with("Binning(enum) value: 2"), "unexpected output {:?}", text);
    }

    #[test]
    fn test_list_json() {
        let mut config = config();
        config.json = true;
        let catalog = DeviceCatalog::builtin();

        let text = run(|out| list(&config, &catalog, true, out));
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        let entries = json.as_array().unwrap();
        assert!(entries.iter().any(|d| d["name"] == "Exposure Auto"));
        assert!(entries.iter().any(|d| d["name"] == "Brightness" && d["kind"] == "integer"));
    }

    #[test]
    fn test_set_boolean_token_on_gige() {
        let mut config = config();
        config.serial = Some("46810320".to_string());
        let catalog = DeviceCatalog::builtin();

        let text = run(|out| set(&config, &catalog, "Exposure Auto", "Off", out));
        assert!(text.starts_with("Exposure Auto(boolean) value: false"));
    }

    #[test]
    fn test_get_without_start_misses_emulated_property() {
        let mut config = config();
        config.auto_start = false;
        let catalog = DeviceCatalog::builtin();
        let mut out = Vec::new();

        assert!(get(&config, &catalog, "Gain Auto", &mut out).is_err());
    }

    #[test]
    fn test_get_json() {
        let mut config = config();
        config.json = true;
        let catalog = DeviceCatalog::builtin();

        let text = run(|out| get(&config, &catalog, "Gain", out));
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["kind"], "double");
        assert_eq!(json["maximum"], 48.0);
    }

    #[test]
    fn test_trigger() {
        let config = config();
        let catalog = DeviceCatalog::builtin();
        let text = run(|out| trigger(&config, &catalog, "Software Trigger", out));
        assert_eq!(text.trim(), "Triggered Software Trigger");
    }

    #[test]
    fn test_survey_marks_active_only() {
        let config = config();
        let catalog = DeviceCatalog::builtin();
        let text = run(|out| survey(&config, &catalog, out));
        assert!(text.contains("[active only] Gain Auto(boolean)"));
        assert!(text.contains("[always] Brightness(integer)"));
    }

    #[test]
    fn test_demo_on_usb() {
        let config = config();
        let catalog = DeviceCatalog::builtin();
        let text = run(|out| demo(&config, &catalog, out));

        let expected = "Values before we change them:\n\
                        Exposure Auto: true\n\
                        Gain Auto: true\n\
                        Brightness: 0\n\
                        \n\
                        Values after we changed them:\n\
                        Exposure Auto: false\n\
                        Gain Auto: false\n\
                        Brightness: 200\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_demo_on_gige_skips_brightness() {
        let mut config = config();
        config.serial = Some("46810320".to_string());
        let catalog = DeviceCatalog::builtin();
        let text = run(|out| demo(&config, &catalog, out));

        assert!(text.contains("Brightness: not available"));
        assert!(text.ends_with("Gain Auto: false\nBrightness: not available\n"));
    }
}
