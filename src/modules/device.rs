//! Device identity and kernel facts.

use crate::error::{ResolveError, ResolveResult};
use crate::modules::Module;
use crate::platform::Platform;
use crate::resource::{Card, Identifier, Item, Resource, Screen, Text};

use std::sync::Arc;

pub struct DeviceModule {
    platform: Arc<Platform>,
}

impl DeviceModule {
    pub fn new(platform: Arc<Platform>) -> Self {
        Self { platform }
    }
}

impl Module for DeviceModule {
    fn id(&self) -> &str {
        "device"
    }

    fn name(&self) -> Text {
        Text::key("device")
    }

    fn description(&self) -> Text {
        Text::key("device_description")
    }

    fn resolve(&self, identifier: &Identifier) -> ResolveResult<Resource> {
        if !identifier.path.is_empty() {
            return Err(ResolveError::NotFound);
        }

        // Fails the screen when no property source can be read at all.
        self.platform.properties()?;

        let p = &self.platform;
        let device = Card::new(
            "device",
            Text::key("device_device"),
            vec![
                Item::new("brand", Text::key("device_brand"))
                    .maybe_value(p.prop("ro.product.brand")),
                Item::new("manufacturer", Text::key("device_manufacturer"))
                    .maybe_value(p.prop("ro.product.manufacturer")),
                Item::new("model", Text::key("device_model"))
                    .maybe_value(p.prop("ro.product.model")),
                Item::new("device", Text::key("device_device"))
                    .maybe_value(p.prop("ro.product.device")),
                Item::new("board", Text::key("device_board"))
                    .maybe_value(p.prop("ro.product.board")),
                Item::new("hardware", Text::key("device_hardware"))
                    .maybe_value(p.prop("ro.hardware")),
            ],
        );

        // First field of /proc/uptime, in seconds.
        let uptime = p
            .attr("/proc/uptime")
            .and_then(|s| s.split_whitespace().next().and_then(|v| v.parse::<f64>().ok()));
        let kernel = Card::new(
            "kernel",
            Text::key("device_kernel"),
            vec![
                Item::new("hostname", Text::key("device_hostname"))
                    .maybe_value(p.attr("/proc/sys/kernel/hostname")),
                Item::new("os_type", Text::key("device_os_type"))
                    .maybe_value(p.attr("/proc/sys/kernel/ostype")),
                Item::new("os_release", Text::key("device_os_release"))
                    .maybe_value(p.attr("/proc/sys/kernel/osrelease")),
                Item::new("uptime", Text::key("device_uptime")).maybe_value(uptime),
            ],
        );

        Ok(Screen::card_list(identifier.clone(), self.name(), vec![device, kernel]).into())
    }
}
