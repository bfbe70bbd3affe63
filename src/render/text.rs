use crate::resource::{Card, Item, Screen, ScreenKind};

use std::fmt::Write;

/// Render a screen for the terminal.
///
/// Example:
/// CPU
/// athena://cpu
///
/// [General]
///   Hardware: SM8250
///   Processors: 8 → athena://cpu/processors
pub fn render_screen(screen: &Screen) -> String {
    let mut out = String::new();
    out.push_str(&screen.title.render());
    out.push('\n');
    out.push_str(&screen.identifier.to_uri());
    out.push('\n');

    match &screen.kind {
        ScreenKind::ItemList(items) | ScreenKind::Dialog(items) => {
            if !items.is_empty() {
                out.push('\n');
            }
            for item in items {
                item_line(&mut out, item, "");
            }
        }
        ScreenKind::CardList(cards) => {
            for card in cards {
                card_block(&mut out, card);
            }
        }
    }
    out
}

fn card_block(out: &mut String, card: &Card) {
    let _ = write!(out, "\n[{}]", card.title);
    if let Some(target) = &card.navigate_to {
        let _ = write!(out, " → {}", target);
    }
    out.push('\n');
    for item in &card.items {
        item_line(out, item, "  ");
    }
}

fn item_line(out: &mut String, item: &Item, indent: &str) {
    out.push_str(indent);
    out.push_str(&item.title.render());
    if let Some(value) = &item.value {
        let _ = write!(out, ": {}", value.display());
    }
    if let Some(target) = &item.navigate_to {
        let _ = write!(out, " → {}", target);
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Identifier, Text};
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_cards_with_links() {
        let id = Identifier::module_root("cpu");
        let screen = Screen::card_list(
            id.clone(),
            Text::key("cpu"),
            vec![
                Card::new(
                    "general",
                    Text::key("cpu_general"),
                    vec![
                        Item::new("hardware", Text::key("cpu_hardware")).value("SM8250"),
                        Item::new("processors", Text::key("cpu_processors"))
                            .value(8u64)
                            .navigate_to(&id / "processors"),
                    ],
                ),
                Card::new("mounts", Text::key("storage_mounts"), vec![])
                    .navigate_to(&id / "mounts"),
            ],
        );

        assert_eq!(
            render_screen(&screen),
            "CPU\nathena://cpu\n\n[General]\n  Hardware: SM8250\n  Processors: 8 → athena://cpu/processors\n\n[Mounts] → athena://cpu/mounts\n"
        );
    }

    #[test]
    fn renders_dialog_items() {
        let screen = Screen::dialog(
            Identifier::module_root("thermal"),
            Text::literal("cpu-0-0"),
            vec![
                Item::new("present", Text::literal("Present")).value(true),
                Item::new("mode", Text::key("thermal_mode")),
            ],
        );
        assert_eq!(
            render_screen(&screen),
            "cpu-0-0\nathena://thermal\n\nPresent: Yes\nMode\n"
        );
    }
}
