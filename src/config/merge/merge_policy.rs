//! Merge rules: defaults every later source overrides.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("namespace.state_file", ".itemprop/namespace.json")?
        .set_default("namespace.seed_default_drives", true)?
        .set_default("completion.distinguished_provider", "Registry")
}
