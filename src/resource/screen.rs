use crate::resource::{Card, Element, Identifier, Item, Text};

/// The resolved data for an identifier. Screens are the only kind of resource.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Screen(Screen),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub identifier: Identifier,
    pub title: Text,
    pub kind: ScreenKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenKind {
    ItemList(Vec<Item>),
    CardList(Vec<Card>),
    Dialog(Vec<Item>),
}

impl Screen {
    pub fn item_list(identifier: Identifier, title: Text, items: Vec<Item>) -> Self {
        Self {
            identifier,
            title,
            kind: ScreenKind::ItemList(items),
        }
    }

    pub fn card_list(identifier: Identifier, title: Text, cards: Vec<Card>) -> Self {
        Self {
            identifier,
            title,
            kind: ScreenKind::CardList(cards),
        }
    }

    pub fn dialog(identifier: Identifier, title: Text, items: Vec<Item>) -> Self {
        Self {
            identifier,
            title,
            kind: ScreenKind::Dialog(items),
        }
    }

    /// Top-level elements in display order.
    pub fn elements(&self) -> Vec<Element> {
        match &self.kind {
            ScreenKind::ItemList(items) | ScreenKind::Dialog(items) => {
                items.iter().cloned().map(Element::Item).collect()
            }
            ScreenKind::CardList(cards) => cards.iter().cloned().map(Element::Card).collect(),
        }
    }

    /// Every identifier this screen links to, cards' items included.
    pub fn links(&self) -> Vec<&Identifier> {
        let mut out = Vec::new();
        match &self.kind {
            ScreenKind::ItemList(items) | ScreenKind::Dialog(items) => {
                out.extend(items.iter().filter_map(|i| i.navigate_to.as_ref()));
            }
            ScreenKind::CardList(cards) => {
                for card in cards {
                    match &card.navigate_to {
                        Some(target) => out.push(target),
                        None => out.extend(
                            card.items.iter().filter_map(|i| i.navigate_to.as_ref()),
                        ),
                    }
                }
            }
        }
        out
    }
}

impl Resource {
    pub fn identifier(&self) -> &Identifier {
        match self {
            Resource::Screen(screen) => &screen.identifier,
        }
    }
}

impl From<Screen> for Resource {
    fn from(screen: Screen) -> Self {
        Resource::Screen(screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_skip_items_of_navigating_cards() {
        let root = Identifier::module_root("cpu");
        let screen = Screen::card_list(
            root.clone(),
            Text::key("cpu"),
            vec![
                Card::new(
                    "general",
                    Text::key("cpu_general"),
                    vec![
                        Item::new("processors", Text::key("cpu_processors"))
                            .navigate_to(&root / "processors"),
                    ],
                ),
                Card::new(
                    "linked",
                    Text::literal("linked"),
                    vec![
                        Item::new("hidden", Text::literal("hidden"))
                            .navigate_to(&root / "hidden"),
                    ],
                )
                .navigate_to(&root / "linked"),
            ],
        );

        let links: Vec<String> = screen.links().iter().map(|i| i.to_uri()).collect();
        assert_eq!(links, vec!["athena://cpu/processors", "athena://cpu/linked"]);
    }
}
