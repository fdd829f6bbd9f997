//! Source device extension

use super::{child_url, extension_url, ExtensionBuilder};
use crate::domain::record::{Extension, ExtensionValue, Observation};
use crate::domain::result::ConversionResult;
use crate::domain::sample::{SampleHeader, SourceDevice};

/// Device fields written as sub-extensions, in order
fn device_fields(device: &SourceDevice) -> [(&'static str, Option<&String>); 8] {
    [
        ("name", device.name.as_ref()),
        ("manufacturer", device.manufacturer.as_ref()),
        ("model", device.model.as_ref()),
        ("hardwareVersion", device.hardware_version.as_ref()),
        ("firmwareVersion", device.firmware_version.as_ref()),
        ("softwareVersion", device.software_version.as_ref()),
        ("localIdentifier", device.local_identifier.as_ref()),
        ("udiDeviceIdentifier", device.udi_device_identifier.as_ref()),
    ]
}

/// Writes the producing device under `sourceDevice`
///
/// Samples without a device lose any existing `sourceDevice` extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceDeviceExtension;

impl ExtensionBuilder<SampleHeader> for SourceDeviceExtension {
    fn url(&self) -> String {
        extension_url("sourceDevice")
    }

    fn apply(&self, header: &SampleHeader, observation: &mut Observation) -> ConversionResult<()> {
        let url = self.url();
        let Some(device) = &header.device else {
            observation.remove_extensions(&url);
            return Ok(());
        };

        let mut block = Extension::nested(url.clone(), Vec::new());
        for (name, value) in device_fields(device) {
            if let Some(value) = value {
                block.replace_extension(Extension::with_value(
                    child_url(&url, &[name]),
                    ExtensionValue::ValueString(value.clone()),
                ));
            }
        }
        observation.append_extension(block, true);
        Ok(())
    }
}
