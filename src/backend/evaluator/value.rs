use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::ast::Class;
use crate::backend::codegen::helpers::{float_literal, string_literal};

type ListCell = RefCell<Vec<Value>>;

/// Runtime values. Lists and instances are shared references, so aliasing
/// behaves the way it does in Python.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    List(Rc<ListCell>),
    Instance(Rc<RefCell<Instance>>),
    Class(Rc<Class>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub class: Rc<Class>,
    pub fields: Vec<(String, Value)>,
}

impl Instance {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(field, _)| field == name).map(|(_, value)| value)
    }

    pub fn set(&mut self, name: &str, value: Value) {
        match self.fields.iter_mut().find(|(field, _)| field == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }
}

/// A number after bool promotion.
#[derive(Debug, Clone, Copy)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    pub fn as_f64(self) -> f64 {
        match self {
            Numeric::Int(value) => value as f64,
            Numeric::Float(value) => value,
        }
    }
}

impl Value {
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bool(_) => "bool",
            Value::List(_) => "list",
            Value::Instance(_) => "object",
            Value::Class(_) => "type",
        }
    }

    /// Python numeric view: `True`/`False` count as 1/0.
    pub fn as_numeric(&self) -> Option<Numeric> {
        match self {
            Value::Int(value) => Some(Numeric::Int(*value)),
            Value::Bool(value) => Some(Numeric::Int(i64::from(*value))),
            Value::Float(value) => Some(Numeric::Float(*value)),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Int(value) => *value != 0,
            Value::Float(value) => *value != 0.0,
            Value::Str(value) => !value.is_empty(),
            Value::Bool(value) => *value,
            Value::List(items) => !items.borrow().is_empty(),
            Value::Instance(_) | Value::Class(_) => true,
        }
    }

    /// Python `==`: numbers compare across int/float/bool, instances by
    /// identity.
    pub fn equals(&self, other: &Value) -> bool {
        self.equals_within(other, &mut Vec::new())
    }

    /// `seen` holds the list pairs already being compared further up, so a
    /// list that contains itself terminates.
    fn equals_within(&self, other: &Value, seen: &mut Vec<(*const ListCell, *const ListCell)>) -> bool {
        if let (Some(left), Some(right)) = (self.as_numeric(), other.as_numeric()) {
            return match (left, right) {
                (Numeric::Int(a), Numeric::Int(b)) => a == b,
                (a, b) => a.as_f64() == b.as_f64(),
            };
        }
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                let pair = (Rc::as_ptr(a), Rc::as_ptr(b));
                if Rc::ptr_eq(a, b) || seen.contains(&pair) {
                    return true;
                }
                seen.push(pair);
                let (a, b) = (a.borrow(), b.borrow());
                let equal =
                    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equals_within(y, seen));
                seen.pop();
                equal
            }
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Python `repr`, used for list elements.
    pub fn repr(&self) -> String {
        self.render(true, &mut Vec::new())
    }

    /// A list already on `open` is printed as `[...]`.
    fn render(&self, quoted: bool, open: &mut Vec<*const ListCell>) -> String {
        match self {
            Value::None => "None".to_string(),
            Value::Int(value) => value.to_string(),
            Value::Float(value) => float_literal(*value),
            Value::Str(value) if quoted => string_literal(value),
            Value::Str(value) => value.clone(),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            Value::List(items) => {
                let ptr = Rc::as_ptr(items);
                if open.contains(&ptr) {
                    return "[...]".to_string();
                }
                open.push(ptr);
                let parts: Vec<String> =
                    items.borrow().iter().map(|item| item.render(true, open)).collect();
                open.pop();
                format!("[{}]", parts.join(", "))
            }
            Value::Instance(instance) => format!("<{} object>", instance.borrow().class.name),
            Value::Class(class) => format!("<class '{}'>", class.name),
        }
    }
}

/// Python `str`, which is what `print` writes.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false, &mut Vec::new()))
    }
}
