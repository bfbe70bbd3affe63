//! DRM connectors under /sys/class/drm.

use crate::error::{ResolveError, ResolveResult};
use crate::modules::{Module, segment};
use crate::platform::{Permission, Platform};
use crate::resource::{Card, Identifier, Item, Resource, Screen, Text, Value};

use std::sync::Arc;

const DRM: &str = "/sys/class/drm";

pub struct DisplayModule {
    platform: Arc<Platform>,
}

impl DisplayModule {
    pub fn new(platform: Arc<Platform>) -> Self {
        Self { platform }
    }

    /// Connector directories look like "card0-HDMI-A-1" and carry a status.
    fn connectors(&self) -> ResolveResult<Vec<String>> {
        let names = match self.platform.list_dir(DRM) {
            Ok(names) => names,
            Err(ResolveError::NotFound) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        Ok(names
            .into_iter()
            .filter(|name| name.starts_with("card") && name.contains('-'))
            .filter(|name| self.platform.path(&format!("{}/{}/status", DRM, name)).is_file())
            .collect())
    }

    fn attr(&self, connector: &str, attr: &str) -> Option<String> {
        self.platform.attr(&format!("{}/{}/{}", DRM, connector, attr))
    }

    fn connector(&self, identifier: &Identifier, name: &str) -> ResolveResult<Screen> {
        if !self.connectors()?.iter().any(|c| c == name) {
            return Err(ResolveError::NotFound);
        }

        let modes: Vec<String> = self
            .attr(name, "modes")
            .map(|m| m.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect())
            .unwrap_or_default();
        let enabled = self.attr(name, "enabled").map(|e| e == "enabled");

        Ok(Screen::card_list(
            identifier.clone(),
            Text::literal(name),
            vec![Card::new(
                "general",
                Text::key("display_general"),
                vec![
                    Item::new("status", Text::key("display_status"))
                        .maybe_value(self.attr(name, "status")),
                    Item::new("enabled", Text::key("display_enabled")).maybe_value(enabled),
                    Item::new("modes", Text::key("display_modes")).value(Value::StringArray(modes)),
                    Item::new("dpms", Text::key("display_dpms"))
                        .maybe_value(self.attr(name, "dpms")),
                ],
            )],
        ))
    }
}

impl Module for DisplayModule {
    fn id(&self) -> &str {
        "display"
    }

    fn name(&self) -> Text {
        Text::key("display")
    }

    fn description(&self) -> Text {
        Text::key("display_description")
    }

    fn required_permissions(&self) -> &[Permission] {
        &[Permission::ReadDisplayConnectors]
    }

    fn resolve(&self, identifier: &Identifier) -> ResolveResult<Resource> {
        let screen = match (segment(identifier, 0), identifier.path.len()) {
            (None, _) => {
                let items = self
                    .connectors()?
                    .into_iter()
                    .map(|name| {
                        Item::new(&name, Text::literal(&name))
                            .maybe_value(self.attr(&name, "status"))
                            .navigate_to(identifier / name.as_str())
                    })
                    .collect();
                Screen::item_list(identifier.clone(), self.name(), items)
            }
            (Some(name), 1) => self.connector(identifier, name)?,
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

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "/sys/class/drm/card0-DSI-1/status", "connected\n");
        write(dir.path(), "/sys/class/drm/card0-DSI-1/enabled", "enabled\n");
        write(dir.path(), "/sys/class/drm/card0-DSI-1/modes", "1080x2400\n1080x2400\n");
        write(dir.path(), "/sys/class/drm/card0/dev", "226:0\n");
        write(dir.path(), "/sys/class/drm/version", "drm 1.1.0\n");
        dir
    }

    #[test]
    fn lists_only_connectors() {
        let dir = fixture();
        let module = DisplayModule::new(platform(dir.path()));
        let root = Identifier::module_root("display");
        let screen = screen(module.resolve(&root).unwrap());

        assert_eq!(screen.links(), vec![&(&root / "card0-DSI-1")]);
        assert_eq!(shown(&screen, "card0-DSI-1").as_deref(), Some("connected"));
    }

    #[test]
    fn connector_details() {
        let dir = fixture();
        let module = DisplayModule::new(platform(dir.path()));
        let id = &Identifier::module_root("display") / "card0-DSI-1";
        let screen = screen(module.resolve(&id).unwrap());

        assert_eq!(shown(&screen, "enabled").as_deref(), Some("Yes"));
        assert_eq!(shown(&screen, "modes").as_deref(), Some("1080x2400, 1080x2400"));
        assert_eq!(shown(&screen, "dpms"), None);

        let missing = &Identifier::module_root("display") / "card0";
        assert_eq!(module.resolve(&missing).unwrap_err(), ResolveError::NotFound);
    }

    #[test]
    fn no_drm_is_an_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let module = DisplayModule::new(platform(dir.path()));
        let screen = screen(module.resolve(&Identifier::module_root("display")).unwrap());
        assert!(screen.elements().is_empty());
    }
}
