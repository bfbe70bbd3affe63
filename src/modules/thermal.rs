//! Thermal zones under /sys/class/thermal.

use crate::error::{ResolveError, ResolveResult};
use crate::modules::{Module, segment};
use crate::platform::{Permission, Platform};
use crate::resource::units::two_decimals;
use crate::resource::{Identifier, Item, Resource, Screen, Text};

use std::sync::Arc;

const THERMAL: &str = "/sys/class/thermal";

pub struct ThermalModule {
    platform: Arc<Platform>,
}

impl ThermalModule {
    pub fn new(platform: Arc<Platform>) -> Self {
        Self { platform }
    }

    fn zones(&self) -> ResolveResult<Vec<String>> {
        match self.platform.list_dir(THERMAL) {
            Ok(names) => Ok(names
                .into_iter()
                .filter(|name| name.starts_with("thermal_zone"))
                .collect()),
            Err(ResolveError::NotFound) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    fn attr(&self, zone: &str, attr: &str) -> Option<String> {
        self.platform.attr(&format!("{}/{}/{}", THERMAL, zone, attr))
    }

    fn temperature(&self, zone: &str) -> Option<String> {
        self.attr(zone, "temp")
            .and_then(|t| t.parse::<i64>().ok())
            .map(celsius)
    }

    fn zone(&self, identifier: &Identifier, zone: &str) -> ResolveResult<Screen> {
        if !self.zones()?.iter().any(|z| z == zone) {
            return Err(ResolveError::NotFound);
        }

        let kind = self.attr(zone, "type");
        Ok(Screen::dialog(
            identifier.clone(),
            Text::literal(kind.clone().unwrap_or_else(|| zone.to_string())),
            vec![
                Item::new("type", Text::key("thermal_type")).maybe_value(kind),
                Item::new("temperature", Text::key("thermal_temperature"))
                    .maybe_value(self.temperature(zone)),
                Item::new("policy", Text::key("thermal_policy"))
                    .maybe_value(self.attr(zone, "policy")),
                Item::new("mode", Text::key("thermal_mode")).maybe_value(self.attr(zone, "mode")),
            ],
        ))
    }
}

/// Millidegrees Celsius => "45.5 °C".
fn celsius(millis: i64) -> String {
    format!("{} °C", two_decimals(millis as f64 / 1000.0))
}

impl Module for ThermalModule {
    fn id(&self) -> &str {
        "thermal"
    }

    fn name(&self) -> Text {
        Text::key("thermal")
    }

    fn description(&self) -> Text {
        Text::key("thermal_description")
    }

    fn required_permissions(&self) -> &[Permission] {
        &[Permission::ReadThermalZones]
    }

    fn resolve(&self, identifier: &Identifier) -> ResolveResult<Resource> {
        let screen = match (segment(identifier, 0), identifier.path.len()) {
            (None, _) => {
                let items = self
                    .zones()?
                    .into_iter()
                    .map(|zone| {
                        let title = self.attr(&zone, "type").unwrap_or_else(|| zone.clone());
                        Item::new(&zone, Text::literal(title))
                            .maybe_value(self.temperature(&zone))
                            .navigate_to(identifier / zone.as_str())
                    })
                    .collect();
                Screen::item_list(identifier.clone(), self.name(), items)
            }
            (Some(zone), 1) => self.zone(identifier, zone)?,
            _ => return Err(ResolveError::NotFound),
        };
        Ok(screen.into())
    }
}
