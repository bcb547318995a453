use std::fmt;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// A property key that can never collide with a string key or with another symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolData {
    id: Uuid,
    description: String,
}

impl SymbolData {
    pub fn new(description: impl Into<String>) -> Self {
        SymbolData {
            id: Uuid::new_v4(),
            description: description.into(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl Display for SymbolData {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description)
    }
}

/* Well known symbols */
lazy_static! {
    pub static ref SYMBOL_PRIVATE_METHODS: SymbolData = SymbolData::new("Proto.privateMethods");
    pub static ref SYMBOL_STATICS: SymbolData = SymbolData::new("Proto.statics");
    pub static ref SYMBOL_ALLOW_MIXINS: SymbolData = SymbolData::new("Proto.allowMixins");
    pub static ref SYMBOL_PRIVATE_CONTEXT: SymbolData = SymbolData::new("Proto.privateContext");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_with_same_description_differ() {
        let a = SymbolData::new("tag");
        let b = SymbolData::new("tag");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(a.to_string(), "Symbol(tag)");
    }

    #[test]
    fn test_well_known_symbols_are_stable() {
        assert_eq!(*SYMBOL_ALLOW_MIXINS, SYMBOL_ALLOW_MIXINS.clone());
        assert_ne!(*SYMBOL_ALLOW_MIXINS, *SYMBOL_PRIVATE_METHODS);
    }
}
