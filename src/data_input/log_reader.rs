// src/data_input/log_reader.rs

use std::path::Path;

use log::{debug, info, warn};

use crate::beam_names::{channel_name, BEAM_COUNT, BEAM_NAMES};
use crate::constants::LOG_GROUP_NAME;
use crate::data_input::channel_table::ChannelTable;
use crate::data_input::tdms::{PropertyValue, TdmsChannel, TdmsFile, TdmsGroup};
use crate::error::BridgeError;
use crate::types::BridgeResult;

/// A container of named groups holding named numeric channels.
pub trait ChannelSource {
    fn has_group(&self, group: &str) -> bool;

    /// Reads one channel fully into memory.
    fn read_channel(&self, group: &str, channel: &str) -> BridgeResult<Vec<f64>>;
}

impl ChannelSource for TdmsFile {
    fn has_group(&self, group: &str) -> bool {
        self.group(group).is_some()
    }

    fn read_channel(&self, group: &str, channel: &str) -> BridgeResult<Vec<f64>> {
        let found_group = self.group(group).ok_or_else(|| BridgeError::GroupNotFound {
            group: group.to_string(),
        })?;
        let Some(found) = found_group.channel(channel) else {
            debug!(
                "Group '{}' holds channels: {}",
                found_group.name(),
                joined_names(found_group.channels().iter().map(TdmsChannel::name))
            );
            return Err(BridgeError::ChannelNotFound {
                group: group.to_string(),
                channel: channel.to_string(),
            });
        };
        if found.is_empty() {
            warn!("Channel '{}' holds no samples", found.name());
        } else if let Some(PropertyValue::Text(unit)) = found.property("unit_string") {
            debug!("  '{}': {} samples in {}", found.name(), found.len(), unit);
        }
        Ok(found.data().to_vec())
    }
}

fn joined_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

/// The four channel names read for `side`, in beam order.
pub fn channel_names(side: &str) -> [String; BEAM_COUNT] {
    std::array::from_fn(|index| channel_name(side, index))
}

/// Reads the four beam channels of `side` from the `Log` group of `source`.
///
/// All-or-nothing: the first missing group or channel aborts the read.
pub fn read_channels<S: ChannelSource + ?Sized>(source: &S, side: &str) -> BridgeResult<ChannelTable> {
    if !source.has_group(LOG_GROUP_NAME) {
        return Err(BridgeError::GroupNotFound {
            group: LOG_GROUP_NAME.to_string(),
        });
    }

    let mut columns: [Vec<f64>; BEAM_COUNT] = Default::default();
    for (column, name) in columns.iter_mut().zip(channel_names(side)) {
        *column = source.read_channel(LOG_GROUP_NAME, &name)?;
    }
    for (name, column) in BEAM_NAMES.iter().zip(&columns) {
        debug!("  {}: {} samples", name, column.len());
    }
    ChannelTable::new(columns)
}

/// Opens a TDMS log and reads the four beam channels of `side` into a [`ChannelTable`].
pub fn read_log(path: impl AsRef<Path>, side: &str) -> BridgeResult<ChannelTable> {
    let path = path.as_ref();
    info!("Reading side '{}' from '{}'", side, path.display());
    let file = TdmsFile::open(path)?;
    debug!(
        "Groups in file: {}",
        joined_names(file.groups().iter().map(TdmsGroup::name))
    );
    let table = read_channels(&file, side)?;
    info!("Finished reading {} samples per beam.", table.len());
    Ok(table)
}


// src/data_input/log_reader.rs
