//! Batteries and chargers under /sys/class/power_supply.

use crate::error::{ResolveError, ResolveResult};
use crate::modules::{Module, segment};
use crate::platform::{Permission, Platform};
use crate::resource::{Card, Identifier, Item, Lookup, Resource, Screen, Text, Value};

use std::sync::Arc;

const POWER_SUPPLY: &str = "/sys/class/power_supply";

const STATUS: Lookup<&'static str> = &[
    ("Unknown", "Unknown"),
    ("Charging", "Charging"),
    ("Discharging", "Discharging"),
    ("Not charging", "Not charging"),
    ("Full", "Full"),
];

const HEALTH: Lookup<&'static str> = &[
    ("Unknown", "Unknown"),
    ("Good", "Good"),
    ("Overheat", "Overheat"),
    ("Dead", "Dead"),
    ("Over voltage", "Over voltage"),
    ("Unspecified failure", "Unspecified failure"),
    ("Cold", "Cold"),
];

pub struct HealthModule {
    platform: Arc<Platform>,
}

impl HealthModule {
    pub fn new(platform: Arc<Platform>) -> Self {
        Self { platform }
    }

    fn supplies(&self) -> ResolveResult<Vec<String>> {
        match self.platform.list_dir(POWER_SUPPLY) {
            Ok(names) => Ok(names),
            Err(ResolveError::NotFound) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    fn attr(&self, supply: &str, attr: &str) -> Option<String> {
        self.platform.attr(&format!("{}/{}/{}", POWER_SUPPLY, supply, attr))
    }

    fn attr_i64(&self, supply: &str, attr: &str) -> Option<i64> {
        self.attr(supply, attr).and_then(|v| v.parse().ok())
    }

    fn supply(&self, identifier: &Identifier, name: &str) -> ResolveResult<Screen> {
        if !self.supplies()?.iter().any(|s| s == name) {
            return Err(ResolveError::NotFound);
        }

        let flag = |attr: &str| self.attr_i64(name, attr).map(|v| v != 0);
        // Reported in tenths of a degree.
        let temperature = self.attr_i64(name, "temp").map(|t| t as f64 / 10.0);

        let items = vec![
            Item::new("type", Text::key("health_type")).maybe_value(self.attr(name, "type")),
            Item::new("status", Text::key("health_status"))
                .maybe_value(self.attr(name, "status").map(|s| lookup_enum(s, STATUS))),
            Item::new("health", Text::key("health_health"))
                .maybe_value(self.attr(name, "health").map(|s| lookup_enum(s, HEALTH))),
            Item::new("present", Text::key("health_present")).maybe_value(flag("present")),
            Item::new("online", Text::key("health_online")).maybe_value(flag("online")),
            Item::new("capacity", Text::key("health_capacity"))
                .maybe_value(self.attr_i64(name, "capacity")),
            Item::new("voltage", Text::key("health_voltage"))
                .maybe_value(self.attr_i64(name, "voltage_now")),
            Item::new("current", Text::key("health_current"))
                .maybe_value(self.attr_i64(name, "current_now")),
            Item::new("temperature", Text::key("health_temperature")).maybe_value(temperature),
            Item::new("technology", Text::key("health_technology"))
                .maybe_value(self.attr(name, "technology")),
            Item::new("charge_counter", Text::key("health_charge_counter"))
                .maybe_value(self.attr_i64(name, "charge_counter")),
            Item::new("charge_full", Text::key("health_charge_full"))
                .maybe_value(self.attr_i64(name, "charge_full")),
        ];

        Ok(Screen::card_list(
            identifier.clone(),
            Text::literal(name),
            vec![Card::new("general", Text::key("health_general"), items)],
        ))
    }
}

/// Kernel strings as enum values; unknown strings keep their text and get the
/// next free ordinal.
fn lookup_enum(name: String, table: Lookup<&'static str>) -> Value {
    let ordinal = table
        .iter()
        .position(|(k, _)| *k == name.as_str())
        .unwrap_or(table.len()) as u32;
    Value::enumeration(name, ordinal, table)
}

impl Module for HealthModule {
    fn id(&self) -> &str {
        "health"
    }

    fn name(&self) -> Text {
        Text::key("health")
    }

    fn description(&self) -> Text {
        Text::key("health_description")
    }

    fn required_permissions(&self) -> &[Permission] {
        &[Permission::ReadPowerSupplies]
    }

    fn resolve(&self, identifier: &Identifier) -> ResolveResult<Resource> {
        let screen = match (segment(identifier, 0), identifier.path.len()) {
            (None, _) => {
                let items = self
                    .supplies()?
                    .into_iter()
                    .map(|name| {
                        Item::new(&name, Text::literal(&name))
                            .maybe_value(self.attr(&name, "type"))
                            .navigate_to(identifier / name.as_str())
                    })
                    .collect();
                Screen::item_list(identifier.clone(), self.name(), items)
            }
            (Some(name), 1) => self.supply(identifier, name)?,
            _ => return Err(ResolveError::NotFound),
        };
        Ok(screen.into())
    }
}
