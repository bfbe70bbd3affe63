//! Diagnostics modules and the registry dispatching identifiers to them.

pub mod build;
pub mod cpu;
pub mod device;
pub mod display;
pub mod health;
pub mod input;
pub mod storage;
pub mod system_properties;
pub mod thermal;

use crate::Result;
use crate::error::{ResolveError, ResolveResult};
use crate::platform::{Permission, PermissionGate, PermissionState, Platform};
use crate::resource::{Identifier, Item, Resource, Screen, Text, Value};

use anyhow::bail;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

pub use build::BuildModule;
pub use cpu::CpuModule;
pub use device::DeviceModule;
pub use display::DisplayModule;
pub use health::HealthModule;
pub use input::InputModule;
pub use storage::StorageModule;
pub use system_properties::SystemPropertiesModule;
pub use thermal::ThermalModule;

/// A provider of one top-level diagnostics category.
pub trait Module: Send + Sync {
    fn id(&self) -> &str;

    fn name(&self) -> Text;

    fn description(&self) -> Text;

    fn required_permissions(&self) -> &[Permission] {
        &[]
    }

    /// Resolve an identifier whose module is this one.
    fn resolve(&self, identifier: &Identifier) -> ResolveResult<Resource>;
}

/// The built-in modules.
pub enum ModuleKind {
    Build(BuildModule),
    Cpu(CpuModule),
    Device(DeviceModule),
    Display(DisplayModule),
    Health(HealthModule),
    Input(InputModule),
    Storage(StorageModule),
    SystemProperties(SystemPropertiesModule),
    Thermal(ThermalModule),
}

impl ModuleKind {
    /// Every built-in module, reading from `platform`.
    pub fn catalog(platform: Arc<Platform>) -> Vec<ModuleKind> {
        vec![
            ModuleKind::Build(BuildModule::new(platform.clone())),
            ModuleKind::Cpu(CpuModule::new(platform.clone())),
            ModuleKind::Device(DeviceModule::new(platform.clone())),
            ModuleKind::Display(DisplayModule::new(platform.clone())),
            ModuleKind::Health(HealthModule::new(platform.clone())),
            ModuleKind::Input(InputModule::new(platform.clone())),
            ModuleKind::Storage(StorageModule::new(platform.clone())),
            ModuleKind::SystemProperties(SystemPropertiesModule::new(platform.clone())),
            ModuleKind::Thermal(ThermalModule::new(platform)),
        ]
    }

    fn inner(&self) -> &dyn Module {
        match self {
            ModuleKind::Build(m) => m,
            ModuleKind::Cpu(m) => m,
            ModuleKind::Device(m) => m,
            ModuleKind::Display(m) => m,
            ModuleKind::Health(m) => m,
            ModuleKind::Input(m) => m,
            ModuleKind::Storage(m) => m,
            ModuleKind::SystemProperties(m) => m,
            ModuleKind::Thermal(m) => m,
        }
    }
}

impl Module for ModuleKind {
    fn id(&self) -> &str {
        self.inner().id()
    }

    fn name(&self) -> Text {
        self.inner().name()
    }

    fn description(&self) -> Text {
        self.inner().description()
    }

    fn required_permissions(&self) -> &[Permission] {
        self.inner().required_permissions()
    }

    fn resolve(&self, identifier: &Identifier) -> ResolveResult<Resource> {
        self.inner().resolve(identifier)
    }
}

/// Dispatches identifiers to modules and serves the root screen.
pub struct Registry<M: Module = ModuleKind> {
    modules: Vec<M>,
    by_id: HashMap<String, usize>,
    gate: Box<dyn PermissionGate>,
    root_screen: Screen,
}

impl<M: Module> Registry<M> {
    /// Fails when two modules share an id.
    pub fn new(modules: Vec<M>, gate: Box<dyn PermissionGate>) -> Result<Self> {
        let mut by_id = HashMap::new();
        for (idx, module) in modules.iter().enumerate() {
            if by_id.insert(module.id().to_string(), idx).is_some() {
                bail!("duplicate module id: {}", module.id());
            }
        }

        let root_screen = Screen::item_list(
            Identifier::ROOT,
            Text::key("app_name"),
            modules
                .iter()
                .map(|module| {
                    Item::new(module.id(), module.name())
                        .value(Value::text(module.description()))
                        .navigate_to(Identifier::module_root(module.id()))
                })
                .collect(),
        );

        Ok(Self {
            modules,
            by_id,
            gate,
            root_screen,
        })
    }

    pub fn modules(&self) -> &[M] {
        &self.modules
    }

    pub fn module(&self, id: &str) -> Option<&M> {
        self.by_id.get(id).map(|&idx| &self.modules[idx])
    }

    /// Permissions needed to resolve the given identifier.
    pub fn required_permissions(&self, identifier: &Identifier) -> ResolveResult<&[Permission]> {
        match &identifier.module {
            None => Ok(&[]),
            Some(id) => self
                .module(id)
                .map(|m| m.required_permissions())
                .ok_or(ResolveError::NotFound),
        }
    }

    pub fn all_required_permissions(&self) -> BTreeSet<Permission> {
        self.modules
            .iter()
            .flat_map(|m| m.required_permissions().iter().copied())
            .collect()
    }

    pub fn denied_permissions(&self) -> Vec<Permission> {
        self.all_required_permissions()
            .into_iter()
            .filter(|p| self.gate.state(*p) == PermissionState::Denied)
            .collect()
    }

    pub fn resolve(&self, identifier: &Identifier) -> ResolveResult<Resource> {
        let Some(id) = &identifier.module else {
            return Ok(self.root_screen.clone().into());
        };
        let module = self.module(id).ok_or(ResolveError::NotFound)?;

        for permission in module.required_permissions() {
            if self.gate.state(*permission) == PermissionState::Denied {
                return Err(ResolveError::PermissionDenied(*permission));
            }
        }

        module.resolve(identifier)
    }
}

/// Path segment at `idx`, `None` past the end.
pub(crate) fn segment(identifier: &Identifier, idx: usize) -> Option<&str> {
    identifier.path.get(idx).map(String::as_str)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fixture platform roots for module tests.

    use super::*;
    use crate::platform::PropertySource;
    use std::path::Path;

    pub fn write(root: &Path, device_path: &str, content: &str) {
        let path = root.join(device_path.trim_start_matches('/'));
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    pub fn platform(root: &Path) -> Arc<Platform> {
        Arc::new(Platform::new(
            root,
            PropertySource {
                getprop: None,
                files: vec!["/system/build.prop".into()],
            },
        ))
    }

    pub fn screen(resource: Resource) -> Screen {
        match resource {
            Resource::Screen(screen) => screen,
        }
    }

    /// Rendered value of the first item named `name`, cards included.
    pub fn shown(screen: &Screen, name: &str) -> Option<String> {
        use crate::resource::ScreenKind;
        let items: Vec<&Item> = match &screen.kind {
            ScreenKind::ItemList(items) | ScreenKind::Dialog(items) => items.iter().collect(),
            ScreenKind::CardList(cards) => cards.iter().flat_map(|c| c.items.iter()).collect(),
        };
        items
            .into_iter()
            .find(|i| i.name == name)
            .and_then(|i| i.value.as_ref())
            .map(Value::display)
    }
}
