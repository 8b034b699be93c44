//! Basic usage example of the typed device SDK
//!
//! This example demonstrates the core methods on each property handle:
//! - is_available() - Probe for a property
//! - get() - Read the current value
//! - set() - Validate and write a new value
//!
//! Run with: cargo run -p camprop-sdk --example basic_usage_sdk

use camprop_sdk::{Brightness, Device, ExposureAuto, GainAuto, SdkConfig, SdkError};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), SdkError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("camprop SDK - Typed Property Example");
    println!("====================================");

    camprop_sdk::initialize()?;

    let config = SdkConfig::from_env()?;
    let device = Device::open_default(None, config)?;
    println!("Using device: {}", device.identifier());

    println!("\nBefore start:");
    report(&device)?;

    // Software-emulated properties only exist while the pipeline runs
    device.start()?;
    println!("\nAfter start:");
    report(&device)?;

    println!("\nDisabling auto functions, setting brightness to 200");
    device.property::<ExposureAuto>().set(false)?;
    device.property::<GainAuto>().set(false)?;

    let brightness = device.property::<Brightness>();
    if brightness.is_available()? {
        brightness.set(200)?;
    } else {
        println!("   No Brightness property on this device");
    }

    println!("\nAfter changes:");
    report(&device)?;

    device.close()?;
    camprop_sdk::shutdown();
    Ok(())
}

fn report(device: &Device) -> Result<(), SdkError> {
    let exposure_auto = device.property::<ExposureAuto>();
    match exposure_auto.get() {
        Ok(value) => println!("   Exposure Auto: {}", value),
        Err(e) if e.is_not_found() => println!("   Exposure Auto: not available"),
        Err(e) => return Err(e),
    }

    let gain_auto = device.property::<GainAuto>();
    match gain_auto.get() {
        Ok(value) => println!("   Gain Auto: {}", value),
        Err(e) if e.is_not_found() => println!("   Gain Auto: not available"),
        Err(e) => return Err(e),
    }

    let brightness = device.property::<Brightness>();
    match brightness.get() {
        Ok(value) => println!("   Brightness: {}", value),
        Err(e) if e.is_not_found() => println!("   Brightness: not available"),
        Err(e) => return Err(e),
    }

    Ok(())
}
