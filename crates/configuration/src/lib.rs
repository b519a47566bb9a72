use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, PriceProcessSettings, SimulationSettings};

/// Loads and validates the simulation configuration from a TOML file.
///
/// `name` is passed to the `config` crate, so both `"config"` and
/// `"config.toml"` resolve the same file.
pub fn load_config(name: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(name))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
