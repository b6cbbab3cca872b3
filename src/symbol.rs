use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

/// An interned symbol.
///
/// Two symbols are equal only if they came out of the same [`SymbolTable`]
/// entry. The text is never compared.
#[derive(Clone)]
pub struct Symbol(Rc<str>);

impl Symbol {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maps symbol text to its one canonical [`Symbol`]
#[derive(Default)]
pub struct SymbolTable {
    symbols: RefCell<HashMap<Rc<str>, Symbol>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }
    pub fn intern(&self, name: &str) -> Symbol {
        if let Some(sym) = self.symbols.borrow().get(name) {
            return sym.clone();
        }
        let text: Rc<str> = name.into();
        let sym = Symbol(text.clone());
        self.symbols.borrow_mut().insert(text, sym.clone());
        sym
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_identity() {
        let table = SymbolTable::new();
        let a = table.intern("foo");
        let b = table.intern("foo");
        assert_eq!(a, b);
        assert_ne!(a, table.intern("bar"));
        assert_eq!(a.name(), "foo");
    }

    #[test]
    fn tables_are_isolated() {
        let first = SymbolTable::new();
        let second = SymbolTable::new();
        assert_ne!(first.intern("x"), second.intern("x"));
    }
}
