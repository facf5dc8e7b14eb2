use lazy_static::lazy_static;
use std::collections::HashMap;
use std::f64::consts;

pub type Func = fn(f64) -> f64;

#[derive(Clone, Copy)]
pub enum Entry {
    Constant(f64),
    Function(Func),
}

/// Named constants and functions, looked up case-insensitively.
pub struct Builtins {
    scope: HashMap<&'static str, Entry>,
}

lazy_static! {
    pub static ref BUILTINS: Builtins = create();
}

impl Builtins {
    fn new() -> Self {
        Builtins {
            scope: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Entry> {
        self.scope.get(key.to_ascii_lowercase().as_str()).cloned()
    }

    pub fn constant(&self, key: &str) -> Option<f64> {
        match self.get(key) {
            Some(Entry::Constant(x)) => Some(x),
            _ => None,
        }
    }

    pub fn function(&self, key: &str) -> Option<Func> {
        match self.get(key) {
            Some(Entry::Function(f)) => Some(f),
            _ => None,
        }
    }

    fn set(&mut self, key: &'static str, entry: Entry) {
        self.scope.insert(key, entry);
    }
}

fn set_const(ctx: &mut Builtins, key: &'static str, val: f64) {
    ctx.set(key, Entry::Constant(val))
}

fn set_unary(ctx: &mut Builtins, key: &'static str, fun: Func) {
    ctx.set(key, Entry::Function(fun))
}

pub fn create() -> Builtins {
    let mut ctx = Builtins::new();

    {
        let c = &mut ctx;
        set_const(c, "e", consts::E);
        set_const(c, "pi", consts::PI);
        set_const(c, "tau", 2.0 * consts::PI);

        set_unary(c, "abs", |x| x.abs());
        set_unary(c, "sqrt", |x| x.sqrt());
        set_unary(c, "ln", |x| x.ln());
        set_unary(c, "lb", |x| x.log2());
        set_unary(c, "lg", |x| x.log10());
        set_unary(c, "log", |x| x.log10());
        set_unary(c, "cos", |x| x.cos());
        set_unary(c, "sin", |x| x.sin());
        set_unary(c, "tan", |x| x.tan());
    }

    ctx
}

#[cfg(test)]
mod test {
    use super::{Entry, BUILTINS};
    use std::f64::consts;

    #[test]
    fn test_constants() {
        assert_eq!(BUILTINS.constant("pi"), Some(consts::PI));
        assert_eq!(BUILTINS.constant("PI"), Some(consts::PI));
        assert_eq!(BUILTINS.constant("Tau"), Some(2.0 * consts::PI));
        assert_eq!(BUILTINS.constant("E"), Some(consts::E));
        assert_eq!(BUILTINS.constant("foo"), None);
        assert_eq!(BUILTINS.constant("sqrt"), None);
    }

    #[test]
    fn test_functions() {
        let call = |name: &str, x: f64| BUILTINS.function(name).map(|f| f(x));

        assert_eq!(call("abs", -32.0), Some(32.0));
        assert_eq!(call("SqRt", 100.0), Some(10.0));
        assert_eq!(call("lb", 8.0), Some(3.0));
        assert!((call("lg", 1000.0).unwrap() - 3.0).abs() < 1e-12);
        assert!((call("LOG", 100.0).unwrap() - 2.0).abs() < 1e-12);
        assert_eq!(call("ln", 1.0), Some(0.0));
        assert_eq!(call("cos", 0.0), Some(1.0));
        assert_eq!(call("sin", 0.0), Some(0.0));
        assert_eq!(call("tan", 0.0), Some(0.0));
        assert_eq!(call("pi", 1.0), None);
        assert_eq!(call("foo", 1.0), None);
    }

    #[test]
    fn test_entries() {
        match BUILTINS.get("Cos") {
            Some(Entry::Function(_)) => (),
            _ => panic!("cos should be a function"),
        }

        match BUILTINS.get("e") {
            Some(Entry::Constant(_)) => (),
            _ => panic!("e should be a constant"),
        }
    }
}
