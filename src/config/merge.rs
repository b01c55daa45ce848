//! Configuration merge logic
//!
//! Layers are merged key by key:
//! - Tables: deep-merge by key
//! - Arrays: REPLACE (last wins)
//! - Scalars: override (last wins)

use toml::{Table, Value};

/// Merge `overlay` into `base` in place.
pub fn merge_tables(base: &mut Table, overlay: Table) {
    for (key, overlay_value) in overlay {
        match (base.get_mut(&key), overlay_value) {
            (Some(Value::Table(base_table)), Value::Table(overlay_table)) => {
                merge_tables(base_table, overlay_table);
            }
            (_, overlay_value) => {
                base.insert(key, overlay_value);
            }
        }
    }
}

/// Merge multiple config layers in order (first is base, last has highest precedence)
pub fn merge_layers(layers: Vec<Table>) -> Table {
    layers.into_iter().fold(Table::new(), |mut merged, layer| {
        merge_tables(&mut merged, layer);
        merged
    })
}
