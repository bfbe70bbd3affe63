use crate::resource::{Identifier, Text, Value};

/// A display unit within a screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Item(Item),
    Card(Card),
}

/// An item in a list.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub name: String,
    pub title: Text,
    /// Selecting this item opens the given resource.
    pub navigate_to: Option<Identifier>,
    pub value: Option<Value>,
}

/// A card holding multiple items.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub name: String,
    pub title: Text,
    pub navigate_to: Option<Identifier>,
    pub items: Vec<Item>,
}

impl Item {
    pub fn new(name: impl Into<String>, title: Text) -> Self {
        Self {
            name: name.into(),
            title,
            navigate_to: None,
            value: None,
        }
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the value only when one is available.
    pub fn maybe_value(mut self, value: Option<impl Into<Value>>) -> Self {
        self.value = value.map(Into::into);
        self
    }

    pub fn navigate_to(mut self, identifier: Identifier) -> Self {
        self.navigate_to = Some(identifier);
        self
    }
}

impl Card {
    pub fn new(name: impl Into<String>, title: Text, items: Vec<Item>) -> Self {
        Self {
            name: name.into(),
            title,
            navigate_to: None,
            items,
        }
    }

    pub fn navigate_to(mut self, identifier: Identifier) -> Self {
        self.navigate_to = Some(identifier);
        self
    }
}

impl Element {
    pub fn name(&self) -> &str {
        match self {
            Element::Item(item) => &item.name,
            Element::Card(card) => &card.name,
        }
    }
}

impl From<Item> for Element {
    fn from(item: Item) -> Self {
        Element::Item(item)
    }
}

impl From<Card> for Element {
    fn from(card: Card) -> Self {
        Element::Card(card)
    }
}
