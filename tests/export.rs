use athena_probe::error::{ResolveError, ResolveResult};
use athena_probe::export::json::to_json;
use athena_probe::export::{ExportOptions, TreeResolver, export_json};
use athena_probe::modules::{Module, Registry};
use athena_probe::platform::AllowAll;
use athena_probe::resource::{Card, Identifier, Item, Resource, Screen, Text, Value};

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// A module serving fixed screens keyed by path ("" is the module root).
struct Graph {
    id: &'static str,
    screens: HashMap<String, Vec<Item>>,
    cards: HashMap<String, Vec<Card>>,
    failing: HashSet<String>,
    visits: Mutex<HashMap<String, usize>>,
}

impl Graph {
    fn new(id: &'static str) -> Self {
        Self {
            id,
            screens: HashMap::new(),
            cards: HashMap::new(),
            failing: HashSet::new(),
            visits: Mutex::new(HashMap::new()),
        }
    }

    fn screen(mut self, path: &str, items: Vec<Item>) -> Self {
        self.screens.insert(path.to_string(), items);
        self
    }

    fn cards(mut self, path: &str, cards: Vec<Card>) -> Self {
        self.cards.insert(path.to_string(), cards);
        self
    }

    fn failing(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    fn visits(&self, path: &str) -> usize {
        self.visits.lock().unwrap().get(path).copied().unwrap_or(0)
    }
}

impl Module for Graph {
    fn id(&self) -> &str {
        self.id
    }

    fn name(&self) -> Text {
        Text::literal(self.id)
    }

    fn description(&self) -> Text {
        Text::literal(format!("{} fixture", self.id))
    }

    fn resolve(&self, identifier: &Identifier) -> ResolveResult<Resource> {
        let path = identifier.path.join("/");
        *self.visits.lock().unwrap().entry(path.clone()).or_default() += 1;

        if self.failing.contains(&path) {
            return Err(ResolveError::Io(format!("cannot read {}", path)));
        }
        if let Some(items) = self.screens.get(&path) {
            return Ok(Screen::item_list(identifier.clone(), self.name(), items.clone()).into());
        }
        if let Some(cards) = self.cards.get(&path) {
            return Ok(Screen::card_list(identifier.clone(), self.name(), cards.clone()).into());
        }
        Err(ResolveError::NotFound)
    }
}

fn id(module: &str, path: &str) -> Identifier {
    Identifier::new(
        module,
        path.split('/').filter(|s| !s.is_empty()).map(String::from).collect(),
    )
}

fn leaf(name: &str, value: impl Into<Value>) -> Item {
    Item::new(name, Text::literal(name)).value(value)
}

fn link(name: &str, target: Identifier) -> Item {
    Item::new(name, Text::literal(name)).navigate_to(target)
}

fn compact() -> ExportOptions {
    ExportOptions {
        workers: 4,
        pretty: false,
        require_permissions: false,
    }
}

fn export_value(registry: &Registry<Graph>) -> serde_json::Value {
    let export = export_json(registry, &compact()).unwrap();
    serde_json::from_str(&export.json).unwrap()
}

#[test]
fn leaf_module_and_nested_subtree() {
    let registry = Registry::new(
        vec![
            Graph::new("deviceInfo").screen("", vec![leaf("model", "Pixel 7")]),
            Graph::new("display")
                .screen("", vec![link("0", id("display", "0"))])
                .screen("0", vec![leaf("width", 1080i64), leaf("hdr", false)]),
        ],
        Box::new(AllowAll),
    )
    .unwrap();

    assert_eq!(
        export_value(&registry),
        json!({
            "deviceInfo": {"model": "Pixel 7"},
            "display": {"0": {"width": 1080, "hdr": false}}
        })
    );
}

#[test]
fn keys_follow_discovery_order() {
    let registry = Registry::new(
        vec![
            Graph::new("zeta").screen("", vec![leaf("b", 1i64), leaf("a", 2i64)]),
            Graph::new("alpha").screen("", vec![]),
        ],
        Box::new(AllowAll),
    )
    .unwrap();

    let export = export_json(&registry, &compact()).unwrap();
    assert_eq!(export.json, r#"{"zeta":{"b":1,"a":2},"alpha":{}}"#);
}

#[test]
fn cycles_terminate() {
    let registry = Registry::new(
        vec![
            Graph::new("a")
                .screen("", vec![link("x", id("a", "x"))])
                .screen(
                    "x",
                    vec![
                        link("back", id("a", "")),
                        link("root", Identifier::ROOT),
                        leaf("v", 1i64),
                    ],
                ),
        ],
        Box::new(AllowAll),
    )
    .unwrap();

    let resolution = TreeResolver::new(&registry, 2).resolve_tree().unwrap();
    assert_eq!(resolution.resolved, vec![Identifier::ROOT, id("a", ""), id("a", "x")]);
    assert!(resolution.errors.is_empty());
    assert_eq!(to_json(&resolution.tree).unwrap(), json!({"a": {"x": {"v": 1}}}));

    let module = registry.module("a").unwrap();
    assert_eq!(module.visits(""), 1);
    assert_eq!(module.visits("x"), 1);
}

#[test]
fn shared_children_resolve_once() {
    let registry = Registry::new(
        vec![
            Graph::new("a")
                .screen(
                    "",
                    vec![
                        link("x", id("a", "x")),
                        link("y", id("a", "y")),
                        link("late", id("a", "late")),
                    ],
                )
                .screen("x", vec![link("s", id("a", "shared"))])
                .screen("y", vec![link("s", id("a", "shared"))])
                .screen("late", vec![])
                .screen("shared", vec![leaf("n", 7i64), link("late", id("a", "late"))]),
        ],
        Box::new(AllowAll),
    )
    .unwrap();

    assert_eq!(
        export_value(&registry),
        json!({"a": {"x": {}, "y": {}, "late": {}, "shared": {"n": 7}}})
    );

    let module = registry.module("a").unwrap();
    for path in ["", "x", "y", "late", "shared"] {
        assert_eq!(module.visits(path), 1, "{}", path);
    }
}

#[test]
fn failures_are_logged_and_omitted() {
    let registry = Registry::new(
        vec![
            Graph::new("ok").screen("", vec![leaf("v", true), link("gone", id("ok", "gone"))]),
            Graph::new("broken").failing(""),
        ],
        Box::new(AllowAll),
    )
    .unwrap();

    let export = export_json(&registry, &compact()).unwrap();
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&export.json).unwrap(),
        json!({"ok": {"v": true}})
    );
    assert_eq!(export.resolved, 4);
    assert_eq!(
        export.error_log_json(),
        json!({
            "athena://broken": {"code": "IO", "message": "I/O error: cannot read "},
            "athena://ok/gone": {"code": "NOT_FOUND", "message": "not found"}
        })
    );
}

#[test]
fn inline_data_at_a_linked_path_is_fatal() {
    let registry = Registry::new(
        vec![
            Graph::new("a")
                .screen("", vec![leaf("x", 1i64), link("more", id("a", "x"))])
                .screen("x", vec![]),
        ],
        Box::new(AllowAll),
    )
    .unwrap();

    let err = export_json(&registry, &compact()).unwrap_err();
    assert!(err.to_string().contains("data for athena://a/x already exists"), "{}", err);
}

#[test]
fn writing_below_a_leaf_is_fatal() {
    let registry = Registry::new(
        vec![
            Graph::new("a")
                .screen("", vec![leaf("x", 1i64), link("deep", id("a", "x/y"))])
                .screen("x/y", vec![]),
        ],
        Box::new(AllowAll),
    )
    .unwrap();

    let err = export_json(&registry, &compact()).unwrap_err();
    assert!(err.to_string().contains("a/x is not a mapping"), "{}", err);
}

#[test]
fn value_types_survive_json() {
    let date = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
    let registry = Registry::new(
        vec![Graph::new("types").cards(
            "",
            vec![Card::new(
                "all",
                Text::literal("All"),
                vec![
                    leaf("string", "text"),
                    leaf("bool", true),
                    leaf("int", -3i64),
                    leaf("uint", u64::MAX),
                    leaf("float", 2.5f64),
                    leaf("date", date),
                    Item::new("bytes", Text::literal("bytes")).value(Value::bytes(4096)),
                    Item::new("freq", Text::literal("freq")).value(Value::frequency(1_800_000_000)),
                    Item::new("enum", Text::literal("enum"))
                        .value(Value::enumeration("Charging", 1, &[("Charging", "Charging")])),
                    leaf("ints", vec![1i64, 2]),
                    leaf("floats", vec![0.5f64]),
                    leaf("strings", Vec::<String>::new()),
                    Item::new("none", Text::literal("none")),
                ],
            )],
        )],
        Box::new(AllowAll),
    )
    .unwrap();

    assert_eq!(
        export_value(&registry),
        json!({"types": {"all": {
            "string": "text",
            "bool": true,
            "int": -3,
            "uint": u64::MAX,
            "float": 2.5,
            "date": 1709647629000i64,
            "bytes": 4096,
            "freq": 1800000000u64,
            "enum": "Charging",
            "ints": [1, 2],
            "floats": [0.5],
            "strings": [],
            "none": null
        }}})
    );
}

#[test]
fn output_does_not_depend_on_worker_count() {
    let mut fan = Graph::new("fan");
    let children: Vec<Item> = (0..40)
        .map(|i| link(&i.to_string(), id("fan", &i.to_string())))
        .collect();
    fan = fan.screen("", children);
    for i in 0..40 {
        let shared = format!("shared{}", i % 5);
        fan = fan.screen(
            &i.to_string(),
            vec![leaf("i", i as i64), link("s", id("fan", &shared))],
        );
    }
    for s in 0..5 {
        fan = fan.screen(&format!("shared{}", s), vec![leaf("s", s as i64)]);
    }
    let registry = Registry::new(vec![fan], Box::new(AllowAll)).unwrap();

    let outputs: Vec<String> = [0, 1, 3, 64]
        .into_iter()
        .map(|workers| {
            let options = ExportOptions {
                workers,
                ..compact()
            };
            export_json(&registry, &options).unwrap().json
        })
        .collect();
    for out in &outputs[1..] {
        assert_eq!(out, &outputs[0]);
    }

    // Four passes, each resolving every node once.
    let module = registry.module("fan").unwrap();
    assert_eq!(module.visits("7"), 4);
    assert_eq!(module.visits("shared3"), 4);
}
