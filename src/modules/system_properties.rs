use crate::error::{ResolveError, ResolveResult};
use crate::modules::Module;
use crate::platform::Platform;
use crate::resource::{Identifier, Item, Resource, Screen, Text};

use std::sync::Arc;

/// Every readable system property, sorted by key.
pub struct SystemPropertiesModule {
    platform: Arc<Platform>,
}

impl SystemPropertiesModule {
    pub fn new(platform: Arc<Platform>) -> Self {
        Self { platform }
    }
}

impl Module for SystemPropertiesModule {
    fn id(&self) -> &str {
        "system_properties"
    }

    fn name(&self) -> Text {
        Text::key("system_properties")
    }

    fn description(&self) -> Text {
        Text::key("system_properties_description")
    }

    fn resolve(&self, identifier: &Identifier) -> ResolveResult<Resource> {
        if !identifier.path.is_empty() {
            return Err(ResolveError::NotFound);
        }

        let items = self
            .platform
            .properties()?
            .iter()
            .map(|(key, value)| Item::new(key, Text::literal(key)).value(value.as_str()))
            .collect();
        Ok(Screen::item_list(identifier.clone(), self.name(), items).into())
    }
}
