//! Input devices from /proc/bus/input/devices.

use crate::error::{ResolveError, ResolveResult};
use crate::modules::{Module, segment};
use crate::platform::{Permission, Platform};
use crate::resource::{Identifier, Item, Resource, Screen, Text};

use regex::Regex;
use std::sync::{Arc, LazyLock};

const DEVICES: &str = "/proc/bus/input/devices";

// "N: Name=\"gpio-keys\"" => ("N", "Name=\"gpio-keys\"")
static RECORD_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^([A-Z]):\s*(.*?)\s*$"#).expect("valid record regex"));

// "Bus=0019 Vendor=0001" => [("Bus", "0019"), ("Vendor", "0001")]
static ID_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\w+)=([0-9A-Fa-f]+)"#).expect("valid id regex"));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputDevice {
    pub name: Option<String>,
    pub bus: Option<String>,
    pub vendor: Option<String>,
    pub product: Option<String>,
    pub version: Option<String>,
    pub phys: Option<String>,
    pub sysfs: Option<String>,
    pub handlers: Vec<String>,
}

/// Parse the kernel's device list.
///
/// Expected blocks, separated by blank lines:
/// I: Bus=0019 Vendor=0001 Product=0001 Version=0100
/// N: Name="gpio-keys"
/// P: Phys=gpio-keys/input0
/// S: Sysfs=/devices/platform/gpio-keys/input/input0
/// H: Handlers=kbd event0
/// B: EV=3
pub fn parse_devices(text: &str) -> ResolveResult<Vec<InputDevice>> {
    let mut out = Vec::new();
    let mut current: Option<InputDevice> = None;

    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            out.extend(current.take());
            continue;
        }

        let Some(caps) = RECORD_LINE.captures(line) else {
            return Err(ResolveError::Deserialization(format!(
                "{}:{}: cannot parse line: {:?}",
                DEVICES,
                lineno + 1,
                line
            )));
        };
        let device = current.get_or_insert_with(InputDevice::default);
        let body = &caps[2];
        let field = |prefix: &str| body.strip_prefix(prefix).map(str::to_string);

        match &caps[1] {
            "I" => {
                for id in ID_FIELD.captures_iter(body) {
                    let value = Some(id[2].to_string());
                    match &id[1] {
                        "Bus" => device.bus = value,
                        "Vendor" => device.vendor = value,
                        "Product" => device.product = value,
                        "Version" => device.version = value,
                        _ => {}
                    }
                }
            }
            "N" => device.name = field("Name=").map(|n| n.trim_matches('"').to_string()),
            "P" => device.phys = field("Phys=").filter(|p| !p.is_empty()),
            "S" => device.sysfs = field("Sysfs=").filter(|s| !s.is_empty()),
            "H" => {
                device.handlers = field("Handlers=")
                    .map(|h| h.split_whitespace().map(String::from).collect())
                    .unwrap_or_default();
            }
            // Uniq, capability bitmaps.
            _ => {}
        }
    }
    out.extend(current);
    Ok(out)
}

pub struct InputModule {
    platform: Arc<Platform>,
}

impl InputModule {
    pub fn new(platform: Arc<Platform>) -> Self {
        Self { platform }
    }

    fn devices(&self) -> ResolveResult<Vec<InputDevice>> {
        parse_devices(&self.platform.read(DEVICES)?)
    }
}

impl Module for InputModule {
    fn id(&self) -> &str {
        "input"
    }

    fn name(&self) -> Text {
        Text::key("input")
    }

    fn description(&self) -> Text {
        Text::key("input_description")
    }

    fn required_permissions(&self) -> &[Permission] {
        &[Permission::ReadInputDevices]
    }

    fn resolve(&self, identifier: &Identifier) -> ResolveResult<Resource> {
        let devices = self.devices()?;

        let screen = match (segment(identifier, 0), identifier.path.len()) {
            (None, _) => {
                let items = devices
                    .iter()
                    .enumerate()
                    .map(|(idx, device)| {
                        let title = device.name.clone().unwrap_or_else(|| idx.to_string());
                        Item::new(idx.to_string(), Text::literal(title))
                            .navigate_to(identifier / idx.to_string())
                    })
                    .collect();
                Screen::item_list(identifier.clone(), self.name(), items)
            }
            (Some(idx), 1) => {
                let device = idx
                    .parse::<usize>()
                    .ok()
                    .and_then(|idx| devices.get(idx))
                    .ok_or(ResolveError::NotFound)?
                    .clone();
                let title = device.name.clone().unwrap_or_else(|| idx.to_string());
                Screen::dialog(
                    identifier.clone(),
                    Text::literal(title),
                    vec![
                        Item::new("name", Text::key("input_name")).maybe_value(device.name),
                        Item::new("bus", Text::key("input_bus")).maybe_value(device.bus),
                        Item::new("vendor", Text::key("input_vendor")).maybe_value(device.vendor),
                        Item::new("product", Text::key("input_product"))
                            .maybe_value(device.product),
                        Item::new("version", Text::key("input_version"))
                            .maybe_value(device.version),
                        Item::new("phys", Text::key("input_phys")).maybe_value(device.phys),
                        Item::new("sysfs", Text::key("input_sysfs")).maybe_value(device.sysfs),
                        Item::new("handlers", Text::key("input_handlers")).value(device.handlers),
                    ],
                )
            }
            _ => return Err(ResolveError::NotFound),
        };
        Ok(screen.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::testing::{platform, screen, shown, write};
    use pretty_assertions::assert_eq;

    const DEVICES_TEXT: &str = "I: Bus=0019 Vendor=0001 Product=0001 Version=0100\n\
                                N: Name=\"gpio-keys\"\n\
                                P: Phys=gpio-keys/input0\n\
                                S: Sysfs=/devices/platform/gpio-keys/input/input0\n\
                                U: Uniq=\n\
                                H: Handlers=kbd event0\n\
                                B: EV=3\n\
                                \n\
                                I: Bus=0018 Vendor=0000 Product=0000 Version=0000\n\
                                N: Name=\"touchscreen\"\n\
                                P: Phys=\n\
                                H: Handlers=event1\n";

    #[test]
    fn parses_device_blocks() {
        let devices = parse_devices(DEVICES_TEXT).unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(
            devices[0],
            InputDevice {
                name: Some("gpio-keys".into()),
                bus: Some("0019".into()),
                vendor: Some("0001".into()),
                product: Some("0001".into()),
                version: Some("0100".into()),
                phys: Some("gpio-keys/input0".into()),
                sysfs: Some("/devices/platform/gpio-keys/input/input0".into()),
                handlers: vec!["kbd".into(), "event0".into()],
            }
        );
        assert_eq!(devices[1].phys, None);
    }

    #[test]
    fn reports_malformed_line() {
        let err = parse_devices("I: Bus=0019\nbogus line\n").unwrap_err();
        assert!(err.to_string().contains(":2:"));
    }

    #[test]
    fn resolves_list_and_device() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), DEVICES, DEVICES_TEXT);
        let module = InputModule::new(platform(dir.path()));
        let root = Identifier::module_root("input");

        let list = screen(module.resolve(&root).unwrap());
        assert_eq!(list.links(), vec![&(&root / "0"), &(&root / "1")]);

        let device = screen(module.resolve(&(&root / "1")).unwrap());
        assert_eq!(device.title.render(), "touchscreen");
        assert_eq!(shown(&device, "handlers").as_deref(), Some("event1"));
        assert_eq!(shown(&device, "sysfs"), None);

        assert_eq!(module.resolve(&(&root / "2")).unwrap_err(), ResolveError::NotFound);
    }
}
