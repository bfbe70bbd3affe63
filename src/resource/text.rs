//! Display strings: literals or keys into the English string catalog.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Text {
    Literal(String),
    Key {
        key: &'static str,
        args: Vec<String>,
    },
}

impl Text {
    pub fn literal(value: impl Into<String>) -> Self {
        Text::Literal(value.into())
    }

    pub fn key(key: &'static str) -> Self {
        Text::Key {
            key,
            args: Vec::new(),
        }
    }

    pub fn key_with(key: &'static str, args: impl IntoIterator<Item = impl ToString>) -> Self {
        Text::Key {
            key,
            args: args.into_iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Render against the catalog. Unknown keys render as the key itself.
    pub fn render(&self) -> String {
        match self {
            Text::Literal(s) => s.clone(),
            Text::Key { key, args } => match lookup(key) {
                Some(template) => fill(template, args),
                None => key.to_string(),
            },
        }
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Replace each `{}` in order; surplus placeholders stay as they are.
fn fill(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut rest = template;
    while let Some(pos) = rest.find("{}") {
        out.push_str(&rest[..pos]);
        match args.next() {
            Some(arg) => out.push_str(arg),
            None => out.push_str("{}"),
        }
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}

fn lookup(key: &str) -> Option<&'static str> {
    CATALOG
        .binary_search_by(|(k, _)| (*k).cmp(key))
        .ok()
        .map(|idx| CATALOG[idx].1)
}

// Sorted by key.
const CATALOG: &[(&str, &str)] = &[
    ("app_name", "Athena"),
    ("build", "Build"),
    ("build_bootloader", "Bootloader version"),
    ("build_codename", "Version codename"),
    ("build_date", "Build date"),
    ("build_description", "Build information and firmware versions"),
    ("build_display", "Display ID"),
    ("build_fingerprint", "Fingerprint"),
    ("build_firmware", "Firmware"),
    ("build_host", "Build host"),
    ("build_id", "Build ID"),
    ("build_incremental", "Incremental version"),
    ("build_information", "Information"),
    ("build_radio", "Radio version"),
    ("build_release", "Android version"),
    ("build_sdk", "SDK version"),
    ("build_security_patch", "Security patch"),
    ("build_tags", "Tags"),
    ("build_type", "Build type"),
    ("build_user", "Build user"),
    ("cpu", "CPU"),
    ("cpu_abi", "ABI"),
    ("cpu_cpufreq", "Frequency scaling"),
    ("cpu_description", "Processors, cores and frequencies"),
    ("cpu_freq_current", "Current frequency"),
    ("cpu_freq_max", "Maximum frequency"),
    ("cpu_freq_min", "Minimum frequency"),
    ("cpu_general", "General"),
    ("cpu_governor", "Governor"),
    ("cpu_hardware", "Hardware"),
    ("cpu_processor_title", "CPU {}"),
    ("cpu_processors", "Processors"),
    ("cpu_supported_abis", "Supported ABIs"),
    ("device", "Device"),
    ("device_board", "Board"),
    ("device_brand", "Brand"),
    ("device_description", "Device identity and kernel"),
    ("device_device", "Device"),
    ("device_hardware", "Hardware"),
    ("device_hostname", "Hostname"),
    ("device_kernel", "Kernel"),
    ("device_manufacturer", "Manufacturer"),
    ("device_model", "Model"),
    ("device_os_release", "OS release"),
    ("device_os_type", "OS type"),
    ("device_uptime", "Uptime"),
    ("display", "Display"),
    ("display_description", "Connected displays and modes"),
    ("display_dpms", "DPMS"),
    ("display_enabled", "Enabled"),
    ("display_general", "General"),
    ("display_modes", "Modes"),
    ("display_status", "Status"),
    ("health", "Health"),
    ("health_capacity", "Capacity"),
    ("health_charge_counter", "Charge counter"),
    ("health_charge_full", "Full charge"),
    ("health_current", "Current"),
    ("health_description", "Batteries and power supplies"),
    ("health_general", "General"),
    ("health_health", "Health"),
    ("health_online", "Online"),
    ("health_present", "Present"),
    ("health_status", "Status"),
    ("health_technology", "Technology"),
    ("health_temperature", "Temperature"),
    ("health_type", "Type"),
    ("health_voltage", "Voltage"),
    ("input", "Input"),
    ("input_bus", "Bus"),
    ("input_description", "Input devices"),
    ("input_handlers", "Handlers"),
    ("input_name", "Name"),
    ("input_phys", "Physical path"),
    ("input_product", "Product ID"),
    ("input_sysfs", "Sysfs path"),
    ("input_vendor", "Vendor ID"),
    ("input_version", "Version"),
    ("kernel_complete_version", "Complete version"),
    ("kernel_version", "Version"),
    ("list_no_elements", "No elements"),
    ("no", "No"),
    ("storage", "Storage"),
    ("storage_available", "Available"),
    ("storage_cached", "Cached"),
    ("storage_description", "Memory, partitions and mounts"),
    ("storage_free", "Free"),
    ("storage_memory", "Memory"),
    ("storage_mounts", "Mounts"),
    ("storage_partitions", "Partitions"),
    ("storage_swap_free", "Swap free"),
    ("storage_swap_total", "Swap total"),
    ("storage_total", "Total"),
    ("system_properties", "System properties"),
    ("system_properties_description", "All readable system properties"),
    ("thermal", "Thermal"),
    ("thermal_description", "Thermal zones and temperatures"),
    ("thermal_mode", "Mode"),
    ("thermal_policy", "Policy"),
    ("thermal_temperature", "Temperature"),
    ("thermal_type", "Type"),
    ("unknown_value_enum", "Unknown ({}, {})"),
    ("unknown_value_number", "Unknown ({})"),
    ("yes", "Yes"),
];
