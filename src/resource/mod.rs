//! Resource layer: identifiers, screens, elements and typed values.
//!
//! This module is separate from the modules producing resources and from the
//! export pipeline consuming them.

pub mod element;
pub mod identifier;
pub mod screen;
pub mod text;
pub mod units;
pub mod value;

pub use element::{Card, Element, Item};
pub use identifier::Identifier;
pub use screen::{Resource, Screen, ScreenKind};
pub use text::Text;
pub use value::{Lookup, Value};
