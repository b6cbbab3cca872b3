use std::{cell::RefCell, fmt, rc::Rc};

use rpds::List;

use crate::{symbol::Symbol, value::Value};

/// One association of a symbol to a mutable value cell
#[derive(Debug)]
pub struct Binding {
    pub symbol: Symbol,
    value: RefCell<Value>,
}

impl Binding {
    pub fn new(symbol: Symbol, value: Value) -> Self {
        Binding {
            symbol,
            value: RefCell::new(value),
        }
    }
    pub fn get(&self) -> Value {
        self.value.borrow().clone()
    }
    pub fn set(&self, value: Value) {
        *self.value.borrow_mut() = value;
    }
}

struct Frame {
    bindings: RefCell<List<Rc<Binding>>>,
    parent: Option<Env>,
}

/// A chain of frames, searched innermost first.
///
/// Cloning an `Env` shares it. A binding added to a frame is visible to every
/// environment that has that frame in its chain.
#[derive(Clone)]
pub struct Env(Rc<Frame>);

impl Env {
    /// A root environment with no parent
    pub fn global() -> Self {
        Env(Rc::new(Frame {
            bindings: RefCell::new(List::new()),
            parent: None,
        }))
    }
    /// Pushes a new frame holding the given bindings on top of this environment.
    /// Earlier pairs shadow later pairs with the same symbol.
    pub fn extend<I>(&self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (Symbol, Value)>,
        I::IntoIter: DoubleEndedIterator,
    {
        let bindings = pairs
            .into_iter()
            .rev()
            .fold(List::new(), |list, (symbol, value)| {
                list.push_front(Rc::new(Binding::new(symbol, value)))
            });
        Env(Rc::new(Frame {
            bindings: RefCell::new(bindings),
            parent: Some(self.clone()),
        }))
    }
    /// Finds the innermost binding of a symbol
    pub fn lookup(&self, symbol: &Symbol) -> Option<Rc<Binding>> {
        let mut env = Some(self);
        while let Some(Env(frame)) = env {
            let found = frame
                .bindings
                .borrow()
                .iter()
                .find(|binding| &binding.symbol == symbol)
                .cloned();
            if found.is_some() {
                return found;
            }
            env = frame.parent.as_ref();
        }
        None
    }
    /// Adds a binding to this environment's own frame, shadowing any older one
    pub fn bind(&self, symbol: Symbol, value: Value) {
        let bindings = self
            .0
            .bindings
            .borrow()
            .push_front(Rc::new(Binding::new(symbol, value)));
        *self.0.bindings.borrow_mut() = bindings;
    }
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut env = self;
        while let Some(parent) = &env.0.parent {
            depth += 1;
            env = parent;
        }
        depth
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "<env depth {}, {} bindings>",
            self.depth(),
            self.0.bindings.borrow().len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolTable;

    fn num(binding: Option<Rc<Binding>>) -> Option<f64> {
        binding.and_then(|binding| binding.get().as_num())
    }

    #[test]
    fn shadowing() {
        let table = SymbolTable::new();
        let x = table.intern("x");
        let global = Env::global();
        global.bind(x.clone(), Value::Num(1.0));
        global.bind(x.clone(), Value::Num(2.0));
        assert_eq!(num(global.lookup(&x)), Some(2.0));

        let local = global.extend(vec![(x.clone(), Value::Num(3.0))]);
        assert_eq!(num(local.lookup(&x)), Some(3.0));
        assert_eq!(num(global.lookup(&x)), Some(2.0));
        assert!(global.lookup(&table.intern("y")).is_none());
    }

    #[test]
    fn earlier_parameters_win() {
        let table = SymbolTable::new();
        let x = table.intern("x");
        let local = Env::global().extend(vec![
            (x.clone(), Value::Num(1.0)),
            (x.clone(), Value::Num(2.0)),
        ]);
        assert_eq!(num(local.lookup(&x)), Some(1.0));
    }

    #[test]
    fn mutation_is_shared() {
        let table = SymbolTable::new();
        let x = table.intern("x");
        let global = Env::global();
        let local = global.extend(Vec::new());
        global.bind(x.clone(), Value::Num(1.0));
        if let Some(binding) = local.lookup(&x) {
            binding.set(Value::Num(5.0));
        }
        assert_eq!(num(global.lookup(&x)), Some(5.0));
    }

    #[test]
    fn chain_structure() {
        let global = Env::global();
        let inner = global.extend(Vec::new()).extend(Vec::new());
        assert_eq!(global.depth(), 0);
        assert_eq!(inner.depth(), 2);
        assert_eq!(format!("{:?}", inner), "<env depth 2, 0 bindings>");
    }
}
