//! Processors: ABIs, /proc/cpuinfo and cpufreq.

use crate::error::{ResolveError, ResolveResult};
use crate::modules::{Module, segment};
use crate::platform::Platform;
use crate::resource::{Card, Identifier, Item, Resource, Screen, Text, Value};

use std::collections::BTreeSet;
use std::sync::Arc;

pub struct CpuModule {
    platform: Arc<Platform>,
}

/// One `/proc/cpuinfo` block, fields in file order.
type CpuinfoBlock = Vec<(String, String)>;

impl CpuModule {
    pub fn new(platform: Arc<Platform>) -> Self {
        Self { platform }
    }

    fn root(&self, identifier: &Identifier) -> ResolveResult<Screen> {
        let abis: Vec<String> = match self.platform.prop("ro.product.cpu.abilist") {
            Some(list) => list.split(',').map(|s| s.trim().to_string()).collect(),
            None => self.platform.prop("ro.product.cpu.abi").into_iter().collect(),
        };
        let hardware = self
            .cpuinfo()?
            .iter()
            .flatten()
            .find(|(k, _)| k == "Hardware")
            .map(|(_, v)| v.clone());
        let processors = self.online()?;

        Ok(Screen::card_list(
            identifier.clone(),
            self.name(),
            vec![
                Card::new(
                    "abi",
                    Text::key("cpu_abi"),
                    vec![Item::new("supported_abis", Text::key("cpu_supported_abis")).value(abis)],
                ),
                Card::new(
                    "general",
                    Text::key("cpu_general"),
                    vec![
                        Item::new("hardware", Text::key("cpu_hardware")).maybe_value(hardware),
                        Item::new("processors", Text::key("cpu_processors"))
                            .value(processors.len() as u64)
                            .navigate_to(identifier / "processors"),
                    ],
                ),
            ],
        ))
    }

    fn processors(&self, identifier: &Identifier) -> ResolveResult<Screen> {
        let items = self
            .online()?
            .into_iter()
            .map(|n| {
                let freq = self.khz(n, "scaling_cur_freq");
                Item::new(n.to_string(), Text::key_with("cpu_processor_title", [n]))
                    .maybe_value(freq.map(Value::frequency))
                    .navigate_to(identifier / n.to_string())
            })
            .collect();
        Ok(Screen::item_list(identifier.clone(), Text::key("cpu_processors"), items))
    }

    fn processor(&self, identifier: &Identifier, n: u32) -> ResolveResult<Screen> {
        if !self.online()?.contains(&n) {
            return Err(ResolveError::NotFound);
        }

        let wanted = n.to_string();
        let fields = self
            .cpuinfo()?
            .into_iter()
            .find(|block| block.iter().any(|(k, v)| k == "processor" && *v == wanted))
            .unwrap_or_default();
        let cpuinfo = fields
            .into_iter()
            .filter(|(k, _)| k != "processor")
            .map(|(k, v)| Item::new(field_name(&k), Text::literal(k)).value(v))
            .collect();

        let cpufreq = vec![
            Item::new("current", Text::key("cpu_freq_current"))
                .maybe_value(self.khz(n, "scaling_cur_freq").map(Value::frequency)),
            Item::new("min", Text::key("cpu_freq_min"))
                .maybe_value(self.khz(n, "cpuinfo_min_freq").map(Value::frequency)),
            Item::new("max", Text::key("cpu_freq_max"))
                .maybe_value(self.khz(n, "cpuinfo_max_freq").map(Value::frequency)),
            Item::new("governor", Text::key("cpu_governor")).maybe_value(
                self.platform
                    .attr(&format!("/sys/devices/system/cpu/cpu{}/cpufreq/scaling_governor", n)),
            ),
        ];

        Ok(Screen::card_list(
            identifier.clone(),
            Text::key_with("cpu_processor_title", [n]),
            vec![
                Card::new("cpuinfo", Text::literal("cpuinfo"), cpuinfo),
                Card::new("cpufreq", Text::key("cpu_cpufreq"), cpufreq),
            ],
        ))
    }

    /// cpufreq attributes are in kHz.
    fn khz(&self, n: u32, attr: &str) -> Option<u64> {
        self.platform
            .attr_parse::<u64>(&format!("/sys/devices/system/cpu/cpu{}/cpufreq/{}", n, attr))
            .map(|khz| khz.saturating_mul(1000))
    }

    fn cpuinfo(&self) -> ResolveResult<Vec<CpuinfoBlock>> {
        match self.platform.read("/proc/cpuinfo") {
            Ok(text) => Ok(parse_cpuinfo(&text)),
            Err(ResolveError::NotFound) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Online processors, from the kernel's range list or the cpuN directories.
    fn online(&self) -> ResolveResult<BTreeSet<u32>> {
        if let Some(list) = self.platform.attr("/sys/devices/system/cpu/online") {
            return parse_cpu_list(&list);
        }
        match self.platform.list_dir("/sys/devices/system/cpu") {
            Ok(names) => Ok(names
                .iter()
                .filter_map(|name| name.strip_prefix("cpu")?.parse().ok())
                .collect()),
            Err(ResolveError::NotFound) => Ok(BTreeSet::new()),
            Err(e) => Err(e),
        }
    }
}

impl Module for CpuModule {
    fn id(&self) -> &str {
        "cpu"
    }

    fn name(&self) -> Text {
        Text::key("cpu")
    }

    fn description(&self) -> Text {
        Text::key("cpu_description")
    }

    fn resolve(&self, identifier: &Identifier) -> ResolveResult<Resource> {
        let screen = match (segment(identifier, 0), segment(identifier, 1), identifier.path.len()) {
            (None, _, _) => self.root(identifier)?,
            (Some("processors"), None, _) => self.processors(identifier)?,
            (Some("processors"), Some(n), 2) => {
                let n = n.parse().map_err(|_| ResolveError::NotFound)?;
                self.processor(identifier, n)?
            }
            _ => return Err(ResolveError::NotFound),
        };
        Ok(screen.into())
    }
}

/// Split `/proc/cpuinfo` into blank-line separated blocks of `key : value`.
fn parse_cpuinfo(text: &str) -> Vec<CpuinfoBlock> {
    let mut blocks = Vec::new();
    let mut current = CpuinfoBlock::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            current.push((key.trim().to_string(), value.trim().to_string()));
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// Parse a kernel cpu list such as "0-3,6".
fn parse_cpu_list(list: &str) -> ResolveResult<BTreeSet<u32>> {
    let malformed = || ResolveError::Deserialization(format!("invalid cpu list: {:?}", list));
    let mut out = BTreeSet::new();
    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((lo, hi)) => {
                let lo: u32 = lo.parse().map_err(|_| malformed())?;
                let hi: u32 = hi.parse().map_err(|_| malformed())?;
                if lo > hi {
                    return Err(malformed());
                }
                out.extend(lo..=hi);
            }
            None => {
                out.insert(part.parse().map_err(|_| malformed())?);
            }
        }
    }
    Ok(out)
}

/// "cpu MHz" => "cpu_mhz".
fn field_name(key: &str) -> String {
    key.trim().to_lowercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::testing::{platform, screen, shown, write};
    use pretty_assertions::assert_eq;

    const CPUINFO: &str = "processor\t: 0\nBogoMIPS\t: 38.40\nCPU part\t: 0xd05\n\n\
                           processor\t: 1\nBogoMIPS\t: 38.40\nCPU part\t: 0xd0d\n\n\
                           Hardware\t: Qualcomm Technologies, Inc SM8250\n";

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "/proc/cpuinfo", CPUINFO);
        write(dir.path(), "/sys/devices/system/cpu/online", "0-1\n");
        write(dir.path(), "/sys/devices/system/cpu/cpu1/cpufreq/scaling_cur_freq", "1804800\n");
        write(dir.path(), "/sys/devices/system/cpu/cpu1/cpufreq/scaling_governor", "schedutil\n");
        write(dir.path(), "/system/build.prop", "ro.product.cpu.abilist=arm64-v8a,armeabi-v7a\n");
        dir
    }

    #[test]
    fn parses_cpu_lists() {
        assert_eq!(
            parse_cpu_list("0-3,6").unwrap().into_iter().collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 6]
        );
        assert_eq!(parse_cpu_list("0").unwrap().len(), 1);
        assert_eq!(parse_cpu_list("3-1").unwrap_err().code(), "DESERIALIZATION");
    }

    #[test]
    fn root_links_processors() {
        let dir = fixture();
        let module = CpuModule::new(platform(dir.path()));
        let root = Identifier::module_root("cpu");
        let screen = screen(module.resolve(&root).unwrap());

        assert_eq!(shown(&screen, "supported_abis").as_deref(), Some("arm64-v8a, armeabi-v7a"));
        assert_eq!(
            shown(&screen, "hardware").as_deref(),
            Some("Qualcomm Technologies, Inc SM8250")
        );
        assert_eq!(screen.links(), vec![&(&root / "processors")]);
    }

    #[test]
    fn processor_reads_cpuinfo_block_and_cpufreq() {
        let dir = fixture();
        let module = CpuModule::new(platform(dir.path()));
        let id = &(&Identifier::module_root("cpu") / "processors") / "1";
        let screen = screen(module.resolve(&id).unwrap());

        assert_eq!(screen.title.render(), "CPU 1");
        assert_eq!(shown(&screen, "cpu_part").as_deref(), Some("0xd0d"));
        assert_eq!(shown(&screen, "current").as_deref(), Some("1.8 GHz"));
        assert_eq!(shown(&screen, "governor").as_deref(), Some("schedutil"));
        assert_eq!(shown(&screen, "max"), None);
    }

    #[test]
    fn offline_or_malformed_processor_is_not_found() {
        let dir = fixture();
        let module = CpuModule::new(platform(dir.path()));
        let processors = &Identifier::module_root("cpu") / "processors";
        for n in ["7", "x"] {
            assert_eq!(module.resolve(&(&processors / n)).unwrap_err(), ResolveError::NotFound);
        }
    }
}
