//! Config command implementation

use anyhow::Result;
use waypoint_core::config::LayeredConfig;

use crate::output::OutputWriter;
use crate::output_types::ConfigRow;

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let mut rows: Vec<ConfigRow> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigRow { key, value, source: source.to_string() })
        .collect();
    rows.sort_by(|a, b| a.key.cmp(&b.key));

    if output.is_json() {
        return output.result("success", rows);
    }

    output.section("Configuration");
    output.table(rows);
    Ok(())
}
