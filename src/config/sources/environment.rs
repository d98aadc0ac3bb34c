//! Environment source: ITEMPROP_<SECTION>__<KEY>, e.g.
//! `ITEMPROP_NAMESPACE__STATE_FILE=/tmp/ns.json`.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("ITEMPROP")
            .prefix_separator("_")
            .separator("__"),
    )
}
