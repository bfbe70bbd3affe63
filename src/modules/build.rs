//! Build information, kernel and firmware versions.

use crate::error::{ResolveError, ResolveResult};
use crate::modules::Module;
use crate::platform::{Platform, Properties};
use crate::resource::{Card, Identifier, Item, Resource, Screen, Text};

use chrono::DateTime;
use std::sync::Arc;

pub struct BuildModule {
    platform: Arc<Platform>,
}

impl BuildModule {
    pub fn new(platform: Arc<Platform>) -> Self {
        Self { platform }
    }

    fn information(&self, props: &Properties) -> Card {
        let prop = |name: &str, title: &'static str, key: &str| {
            let value = props.get(key).filter(|v| !v.is_empty()).cloned();
            Item::new(name, Text::key(title)).maybe_value(value)
        };
        let date = props
            .get("ro.build.date.utc")
            .and_then(|v| v.parse::<i64>().ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0));
        let sdk = props.get("ro.build.version.sdk").and_then(|v| v.parse::<i64>().ok());

        Card::new(
            "information",
            Text::key("build_information"),
            vec![
                prop("fingerprint", "build_fingerprint", "ro.build.fingerprint"),
                prop("tags", "build_tags", "ro.build.tags"),
                prop("type", "build_type", "ro.build.type"),
                Item::new("date", Text::key("build_date")).maybe_value(date),
                prop("host", "build_host", "ro.build.host"),
                prop("user", "build_user", "ro.build.user"),
                prop("id", "build_id", "ro.build.id"),
                prop("display", "build_display", "ro.build.display.id"),
                prop("release", "build_release", "ro.build.version.release"),
                prop("codename", "build_codename", "ro.build.version.codename"),
                Item::new("sdk", Text::key("build_sdk")).maybe_value(sdk),
                prop("incremental", "build_incremental", "ro.build.version.incremental"),
                prop(
                    "security_patch",
                    "build_security_patch",
                    "ro.build.version.security_patch",
                ),
            ],
        )
    }

    fn kernel(&self) -> Card {
        Card::new(
            "kernel",
            Text::key("device_kernel"),
            vec![
                Item::new("version", Text::key("kernel_version"))
                    .maybe_value(self.platform.attr("/proc/sys/kernel/osrelease")),
                Item::new("complete_version", Text::key("kernel_complete_version"))
                    .maybe_value(self.platform.attr("/proc/version")),
            ],
        )
    }
}

impl Module for BuildModule {
    fn id(&self) -> &str {
        "build"
    }

    fn name(&self) -> Text {
        Text::key("build")
    }

    fn description(&self) -> Text {
        Text::key("build_description")
    }

    fn resolve(&self, identifier: &Identifier) -> ResolveResult<Resource> {
        if !identifier.path.is_empty() {
            return Err(ResolveError::NotFound);
        }

        let props = self.platform.properties()?;
        let firmware = Card::new(
            "firmware",
            Text::key("build_firmware"),
            vec![
                Item::new("bootloader", Text::key("build_bootloader"))
                    .maybe_value(self.platform.prop("ro.bootloader")),
                Item::new("radio", Text::key("build_radio"))
                    .maybe_value(self.platform.prop("gsm.version.baseband")),
            ],
        );

        Ok(Screen::card_list(
            identifier.clone(),
            self.name(),
            vec![self.information(props), self.kernel(), firmware],
        )
        .into())
    }
}
