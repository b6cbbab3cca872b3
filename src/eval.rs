use std::{cell::Cell, rc::Rc};

use log::{debug, trace, warn};

use crate::{
    builtins,
    env::Env,
    error::LispError,
    parse,
    symbol::{Symbol, SymbolTable},
    value::*,
};

pub const DEFAULT_MAX_DEPTH: usize = 2000;

#[derive(Debug, Clone)]
pub struct Config {
    /// How deeply `eval` and the reader may nest before giving up with an error
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Symbols the evaluator compares against by identity
struct Keywords {
    quote: Symbol,
    if_: Symbol,
    lambda: Symbol,
    defun: Symbol,
    setq: Symbol,
    t: Symbol,
}

impl Keywords {
    fn new(symbols: &SymbolTable) -> Self {
        Keywords {
            quote: symbols.intern("quote"),
            if_: symbols.intern("if"),
            lambda: symbols.intern("lambda"),
            defun: symbols.intern("defun"),
            setq: symbols.intern("setq"),
            t: symbols.intern("t"),
        }
    }
}

/// An interpreter session.
///
/// Each session owns its own symbol table and global environment, so
/// sessions never see each other's definitions.
pub struct Interpreter {
    symbols: SymbolTable,
    global: Env,
    keywords: Keywords,
    config: Config,
    depth: Cell<usize>,
}

struct DepthGuard<'a>(&'a Cell<usize>);

impl<'a> Drop for DepthGuard<'a> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter::with_config(Config::default())
    }
    pub fn with_config(config: Config) -> Self {
        let symbols = SymbolTable::new();
        let keywords = Keywords::new(&symbols);
        let interp = Interpreter {
            global: Env::global(),
            keywords,
            symbols,
            config,
            depth: Cell::new(0),
        };
        interp
            .global
            .bind(interp.keywords.t.clone(), interp.keywords.t.clone().into());
        for &(name, func) in builtins::BUILTINS {
            interp.global.bind(
                interp.symbols.intern(name),
                Value::Builtin(Rc::new(Builtin { name, func })),
            );
        }
        interp
    }
    /// The canonical true value
    pub fn t(&self) -> Value {
        self.keywords.t.clone().into()
    }
    pub fn truth(&self, b: bool) -> Value {
        if b {
            self.t()
        } else {
            Value::Nil
        }
    }
    fn reader(&self) -> parse::Reader<'_> {
        parse::Reader::new(&self.symbols, self.config.max_depth)
    }
    pub fn read<'a>(&self, input: &'a str) -> parse::ReadResult<'a> {
        self.reader().read(input)
    }
    pub fn read_all(&self, input: &str) -> Vec<Value> {
        self.reader().read_all(input)
    }
    /// Reads one form from the line, evaluates it globally, and prints the result
    pub fn rep(&self, line: &str) -> String {
        let (form, _) = self.read(line);
        #[cfg(feature = "debug")]
        println!("{:#?}", form);
        self.eval_global(&form).to_string()
    }
    /// Evaluates a top-level form in the global environment
    pub fn eval_global(&self, form: &Value) -> Value {
        let result = self.eval(form, &self.global);
        if let Value::Error(error) = &result {
            if error.is_syntax() {
                debug!("syntax error: {}", error);
            } else {
                debug!("evaluation error: {}", error);
            }
        }
        result
    }
    pub fn eval(&self, form: &Value, env: &Env) -> Value {
        let depth = self.depth.get() + 1;
        if depth > self.config.max_depth {
            warn!("recursion limit of {} reached", self.config.max_depth);
            return LispError::DepthExceeded(self.config.max_depth).into();
        }
        self.depth.set(depth);
        let _guard = DepthGuard(&self.depth);
        trace!("eval at depth {}: {}", depth, form);
        match form {
            Value::Nil
            | Value::Num(_)
            | Value::Error(_)
            | Value::Builtin(_)
            | Value::Closure(_) => form.clone(),
            Value::Sym(sym) => match env.lookup(sym) {
                Some(binding) => binding.get(),
                None => LispError::Unbound(sym.name().into()).into(),
            },
            Value::Cons(cell) => self.eval_compound(&cell.car, &cell.cdr, env),
        }
    }
    fn eval_compound(&self, op: &Value, args: &Value, env: &Env) -> Value {
        let kw = &self.keywords;
        if let Some(sym) = op.as_symbol() {
            if sym == &kw.quote {
                return args.car();
            } else if sym == &kw.if_ {
                let cond = self.eval(&args.car(), env);
                return if cond.is_error() {
                    cond
                } else if cond.is_nil() {
                    self.eval(&args.nth(2), env)
                } else {
                    self.eval(&args.nth(1), env)
                };
            } else if sym == &kw.lambda {
                return self.make_closure(args, env);
            } else if sym == &kw.defun {
                let name = match args.car() {
                    Value::Sym(name) => name,
                    _ => return LispError::WrongType.into(),
                };
                let closure = self.make_closure(&args.cdr(), env);
                debug!("defun {}", name);
                self.global.bind(name.clone(), closure);
                return name.into();
            } else if sym == &kw.setq {
                let value = self.eval(&args.nth(1), env);
                if value.is_error() {
                    return value;
                }
                let name = match args.car() {
                    Value::Sym(name) => name,
                    _ => return LispError::WrongType.into(),
                };
                match env.lookup(&name) {
                    Some(binding) => {
                        debug!("setq {} = {}", name, value);
                        binding.set(value.clone());
                    }
                    None => {
                        debug!("setq {} = {} (new global)", name, value);
                        self.global.bind(name, value.clone());
                    }
                }
                return value;
            }
        }
        let func = self.eval(op, env);
        let args = self.evlis(args, env);
        self.apply(&func, &args)
    }
    fn make_closure(&self, args: &Value, env: &Env) -> Value {
        Value::Closure(Rc::new(Closure {
            params: args.car(),
            body: args.cdr(),
            env: env.clone(),
        }))
    }
    /// Evaluates each element of a list in order, stopping at the first error
    pub fn evlis(&self, forms: &Value, env: &Env) -> Value {
        let mut values = Vec::new();
        for form in forms.iter() {
            let value = self.eval(&form, env);
            if value.is_error() {
                return value;
            }
            values.push(value);
        }
        Value::list(values)
    }
    /// Evaluates body forms in order and returns the last result
    pub fn progn(&self, body: &Value, env: &Env) -> Value {
        let mut result = Value::Nil;
        for form in body.iter() {
            result = self.eval(&form, env);
            if result.is_error() {
                break;
            }
        }
        result
    }
    pub fn apply(&self, func: &Value, args: &Value) -> Value {
        if func.is_error() {
            return func.clone();
        }
        if args.is_error() {
            return args.clone();
        }
        match func {
            Value::Builtin(builtin) => {
                trace!("apply builtin {}", builtin.name);
                (builtin.func)(self, args)
            }
            Value::Closure(closure) => {
                let pairs: Vec<(Symbol, Value)> = closure
                    .params
                    .iter()
                    .zip(args.iter())
                    .filter_map(|(param, arg)| param.as_symbol().map(|sym| (sym.clone(), arg)))
                    .collect();
                debug!("apply closure with {} bindings", pairs.len());
                let env = closure.env.extend(pairs);
                self.progn(&closure.body, &env)
            }
            Value::Nil | Value::Num(_) | Value::Sym(_) | Value::Cons(_) | Value::Error(_) => {
                debug!("cannot apply a {}", func.tag());
                LispError::NoImpl.into()
            }
        }
    }
}
