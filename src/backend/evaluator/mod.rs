mod ops;
mod value;

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use crate::ast::{Block, CastType, Class, Node, Number, Program};
use crate::error::EvalError;

use value::Numeric;
pub use value::{Instance, Value};

enum InputSource {
    Stdin,
    Scripted(VecDeque<String>),
}

/// Outcome of one statement inside a loop body.
enum Flow {
    Normal,
    Break,
    Continue,
}

/// Tree-walking evaluator for the straight-line and loop subset of the
/// language. Functions, imports and generators are not executed.
pub struct Evaluator {
    variables: HashMap<String, Value>,
    output: Vec<String>,
    input: InputSource,
    echo: bool,
}

impl Evaluator {
    /// Reads `input()` from stdin and writes printed lines to stdout as they
    /// happen, in addition to capturing them.
    pub fn new() -> Self {
        Evaluator {
            variables: HashMap::new(),
            output: Vec::new(),
            input: InputSource::Stdin,
            echo: true,
        }
    }

    /// Feeds `input()` from the given lines and only captures output.
    pub fn with_inputs<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Evaluator {
            variables: HashMap::new(),
            output: Vec::new(),
            input: InputSource::Scripted(lines.into_iter().map(Into::into).collect()),
            echo: false,
        }
    }

    /// Executes the program and returns every printed line.
    pub fn run(&mut self, program: &Program) -> Result<Vec<String>, EvalError> {
        for statement in &program.statements {
            match self.execute(statement)? {
                Flow::Normal => {}
                Flow::Break => return Err(outside_loop("break")),
                Flow::Continue => return Err(outside_loop("continue")),
            }
        }
        Ok(std::mem::take(&mut self.output))
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    fn execute_block(&mut self, block: &Block) -> Result<Flow, EvalError> {
        for statement in &block.statements {
            match self.execute(statement)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn execute(&mut self, node: &Node) -> Result<Flow, EvalError> {
        match node {
            Node::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.variables.insert(name.clone(), value);
            }
            Node::CompoundAssign { name, op, value } => {
                let current = self.lookup(name)?;
                let operand = self.evaluate(value)?;
                let op = op.strip_suffix('=').unwrap_or(op.as_str());
                let updated = match (&current, &operand, op) {
                    // `+=` extends a list in place, so aliases see it.
                    (Value::List(items), Value::List(extra), "+") => {
                        let extra = extra.borrow().clone();
                        items.borrow_mut().extend(extra);
                        current.clone()
                    }
                    _ => ops::binary(op, &current, &operand)?,
                };
                self.variables.insert(name.clone(), updated);
            }
            Node::IndexAssign { collection, index, value } => {
                let value = self.evaluate(value)?;
                let target = self.evaluate(collection)?;
                let index = self.evaluate(index)?;
                self.assign_index(&target, &index, value)?;
            }
            Node::AttrAssign { object, name, value } => {
                let value = self.evaluate(value)?;
                match self.evaluate(object)? {
                    Value::Instance(instance) => instance.borrow_mut().set(name, value),
                    other => {
                        return Err(EvalError::UnknownAttribute {
                            type_name: other.type_name().to_string(),
                            attribute: name.clone(),
                        })
                    }
                }
            }
            Node::Print(value) => {
                let line = self.evaluate(value)?.to_string();
                if self.echo {
                    println!("{line}");
                }
                self.output.push(line);
            }
            Node::If { condition, then_body, elif_nodes, else_body } => {
                if self.evaluate(condition)?.is_truthy() {
                    return self.execute_block(then_body);
                }
                for elif in elif_nodes {
                    if self.evaluate(&elif.condition)?.is_truthy() {
                        return self.execute_block(&elif.then_body);
                    }
                    if let Some(body) = &elif.else_body {
                        return self.execute_block(body);
                    }
                }
                if let Some(body) = else_body {
                    return self.execute_block(body);
                }
            }
            Node::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let Flow::Break = self.execute_block(body)? {
                        break;
                    }
                }
            }
            Node::For { var_name, iterable, body } => {
                for item in self.iterate(iterable)? {
                    self.variables.insert(var_name.clone(), item);
                    if let Flow::Break = self.execute_block(body)? {
                        break;
                    }
                }
            }
            Node::Class(class) => {
                let value = Value::Class(Rc::new(class.clone()));
                self.variables.insert(class.name.clone(), value);
            }
            Node::Break => return Ok(Flow::Break),
            Node::Continue => return Ok(Flow::Continue),
            Node::Func(_) | Node::Import(_) | Node::Return(_) | Node::Yield(_) => {
                return Err(EvalError::Unsupported {
                    node: node.kind_name().to_string(),
                })
            }
            Node::Number(_)
            | Node::Str(_)
            | Node::Bool(_)
            | Node::Var(_)
            | Node::List(_)
            | Node::Index { .. }
            | Node::Attr { .. }
            | Node::BinOp { .. }
            | Node::LogicOp { .. }
            | Node::SpecialOp { .. }
            | Node::UnaryOp { .. }
            | Node::Not(_)
            | Node::Input(_)
            | Node::Range { .. }
            | Node::Call { .. }
            | Node::Len(_)
            | Node::Cast { .. } => {
                self.evaluate(node)?;
            }
        }
        Ok(Flow::Normal)
    }

    pub fn evaluate(&mut self, node: &Node) -> Result<Value, EvalError> {
        match node {
            Node::Number(Number::Int(value)) => Ok(Value::Int(*value)),
            Node::Number(Number::Float(value)) => Ok(Value::Float(*value)),
            Node::Str(value) => Ok(Value::Str(value.clone())),
            Node::Bool(value) => Ok(Value::Bool(*value)),
            Node::Var(name) => self.lookup(name),
            Node::List(items) => {
                let items = items
                    .iter()
                    .map(|item| self.evaluate(item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::list(items))
            }
            Node::Index { collection, index } => {
                let collection = self.evaluate(collection)?;
                let index = self.evaluate(index)?;
                ops::index(&collection, &index)
            }
            Node::Attr { object, name } => self.attribute(object, name),
            Node::BinOp { left, op, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                ops::binary(op, &left, &right)
            }
            Node::LogicOp { left, op, right } => {
                let left = self.evaluate(left)?;
                let short_circuits = match op.as_str() {
                    "and" | "&&" => !left.is_truthy(),
                    _ => left.is_truthy(),
                };
                if short_circuits {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }
            Node::SpecialOp { left, op, right } => self.special(left, op, right),
            Node::UnaryOp { op, operand } => {
                let operand = self.evaluate(operand)?;
                unary(op, operand)
            }
            Node::Not(operand) => Ok(Value::Bool(!self.evaluate(operand)?.is_truthy())),
            Node::Input(prompt) => {
                let prompt = match prompt {
                    Some(prompt) => Some(self.evaluate(prompt)?.to_string()),
                    None => None,
                };
                self.read_input(prompt.as_deref()).map(Value::Str)
            }
            Node::Range { start, end } => {
                let (start, end) = self.range_bounds(start, end)?;
                let len = usize::try_from(end.saturating_sub(start)).unwrap_or(0);
                if len > ops::MAX_SEQUENCE_LEN {
                    return Err(ops::overflow("range"));
                }
                Ok(Value::list((start..end).map(Value::Int).collect()))
            }
            Node::Call { callee, args } => match self.evaluate(callee)? {
                Value::Class(class) => self.instantiate(class, args),
                other => Err(EvalError::Unsupported {
                    node: format!("calling a {} value", other.type_name()),
                }),
            },
            Node::Len(value) => match self.evaluate(value)? {
                Value::Str(text) => Ok(Value::Int(text.chars().count() as i64)),
                Value::List(items) => Ok(Value::Int(items.borrow().len() as i64)),
                other => Err(EvalError::BadOperand {
                    op: "len".to_string(),
                    operand: other.type_name(),
                }),
            },
            Node::Cast { cast_type, value } => {
                let value = self.evaluate(value)?;
                cast(*cast_type, value)
            }
            Node::Assign { .. }
            | Node::CompoundAssign { .. }
            | Node::IndexAssign { .. }
            | Node::AttrAssign { .. }
            | Node::Print(_)
            | Node::If { .. }
            | Node::While { .. }
            | Node::For { .. }
            | Node::Func(_)
            | Node::Class(_)
            | Node::Import(_)
            | Node::Break
            | Node::Continue
            | Node::Return(_)
            | Node::Yield(_) => Err(EvalError::Unsupported {
                node: node.kind_name().to_string(),
            }),
        }
    }

    fn lookup(&self, name: &str) -> Result<Value, EvalError> {
        self.variables
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedVariable { name: name.to_string() })
    }

    fn integer(&mut self, node: &Node, op: &str) -> Result<i64, EvalError> {
        let value = self.evaluate(node)?;
        match value.as_numeric() {
            Some(Numeric::Int(number)) => Ok(number),
            _ => Err(EvalError::BadOperand {
                op: op.to_string(),
                operand: value.type_name(),
            }),
        }
    }

    fn range_bounds(&mut self, start: &Node, end: &Node) -> Result<(i64, i64), EvalError> {
        Ok((self.integer(start, "range")?, self.integer(end, "range")?))
    }

    /// Items a `for` loop walks over. Lists are snapshotted; a literal
    /// `range(...)` is counted lazily.
    fn iterate(&mut self, iterable: &Node) -> Result<Box<dyn Iterator<Item = Value>>, EvalError> {
        if let Node::Range { start, end } = iterable {
            let (start, end) = self.range_bounds(start, end)?;
            return Ok(Box::new((start..end).map(Value::Int)));
        }
        match self.evaluate(iterable)? {
            Value::List(items) => Ok(Box::new(items.borrow().clone().into_iter())),
            Value::Str(text) => {
                let chars: Vec<Value> = text.chars().map(|ch| Value::Str(ch.to_string())).collect();
                Ok(Box::new(chars.into_iter()))
            }
            other => Err(EvalError::BadOperand {
                op: "for".to_string(),
                operand: other.type_name(),
            }),
        }
    }

    fn assign_index(&mut self, target: &Value, index: &Value, value: Value) -> Result<(), EvalError> {
        let Value::List(items) = target else {
            return Err(EvalError::BadOperand {
                op: "[]=".to_string(),
                operand: target.type_name(),
            });
        };
        let Some(Numeric::Int(position)) = index.as_numeric() else {
            return Err(EvalError::TypeMismatch {
                op: "[]=".to_string(),
                left: target.type_name(),
                right: index.type_name(),
            });
        };
        let mut items = items.borrow_mut();
        let slot = ops::resolve_index(position, items.len())?;
        items[slot] = value;
        Ok(())
    }

    fn attribute(&mut self, object: &Node, name: &str) -> Result<Value, EvalError> {
        match self.evaluate(object)? {
            Value::Instance(instance) => {
                let instance = instance.borrow();
                instance.get(name).cloned().ok_or_else(|| EvalError::UnknownAttribute {
                    type_name: instance.class.name.clone(),
                    attribute: name.to_string(),
                })
            }
            other => Err(EvalError::UnknownAttribute {
                type_name: other.type_name().to_string(),
                attribute: name.to_string(),
            }),
        }
    }

    fn special(&mut self, left: &Node, op: &str, right: &Node) -> Result<Value, EvalError> {
        match op {
            "??" => match self.evaluate(left)? {
                Value::None => self.evaluate(right),
                value => Ok(value),
            },
            "<=>" => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                let greater = ops::compare(">", &left, &right)?;
                let less = ops::compare("<", &left, &right)?;
                Ok(Value::Int(i64::from(greater) - i64::from(less)))
            }
            _ => Err(EvalError::Unsupported {
                node: format!("operator '{op}'"),
            }),
        }
    }

    /// Binds constructor arguments to the declared fields in order.
    fn instantiate(&mut self, class: Rc<Class>, args: &[Node]) -> Result<Value, EvalError> {
        if class.constructor().is_some() {
            return Err(EvalError::Unsupported {
                node: format!("constructor of class {}", class.name),
            });
        }
        if args.len() != class.fields.len() {
            return Err(EvalError::ArityMismatch {
                name: class.name.clone(),
                expected: class.fields.len(),
                found: args.len(),
            });
        }
        let values = args
            .iter()
            .map(|arg| self.evaluate(arg))
            .collect::<Result<Vec<_>, _>>()?;
        let fields = class.fields.iter().cloned().zip(values).collect();
        Ok(Value::Instance(Rc::new(RefCell::new(Instance { class, fields }))))
    }

    fn read_input(&mut self, prompt: Option<&str>) -> Result<String, EvalError> {
        match &mut self.input {
            InputSource::Scripted(lines) => lines.pop_front().ok_or_else(|| EvalError::Input {
                message: "no more input".to_string(),
            }),
            InputSource::Stdin => {
                if let Some(prompt) = prompt {
                    let mut stdout = io::stdout();
                    write!(stdout, "{prompt}")
                        .and_then(|()| stdout.flush())
                        .map_err(|err| EvalError::Input { message: err.to_string() })?;
                }
                let mut line = String::new();
                let read = io::stdin()
                    .lock()
                    .read_line(&mut line)
                    .map_err(|err| EvalError::Input { message: err.to_string() })?;
                if read == 0 {
                    return Err(EvalError::Input {
                        message: "end of file".to_string(),
                    });
                }
                let trimmed = line.trim_end_matches(['\n', '\r']).len();
                line.truncate(trimmed);
                Ok(line)
            }
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn outside_loop(keyword: &str) -> EvalError {
    EvalError::Unsupported {
        node: format!("'{keyword}' outside a loop"),
    }
}

fn unary(op: &str, operand: Value) -> Result<Value, EvalError> {
    let bad_operand = || EvalError::BadOperand {
        op: op.to_string(),
        operand: operand.type_name(),
    };
    let number = operand.as_numeric().ok_or_else(bad_operand)?;
    match op {
        // `++x` and `--x` are two prefix signs, as in Python.
        "+" | "++" => Ok(match number {
            Numeric::Int(value) => Value::Int(value),
            Numeric::Float(value) => Value::Float(value),
        }),
        "-" => match number {
            Numeric::Int(value) => value
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| EvalError::Overflow { op: op.to_string() }),
            Numeric::Float(value) => Ok(Value::Float(-value)),
        },
        "--" => unary("-", unary("-", operand.clone())?),
        _ => Err(bad_operand()),
    }
}

fn cast(cast_type: CastType, value: Value) -> Result<Value, EvalError> {
    let invalid = |value: &Value| EvalError::InvalidCast {
        value: value.repr(),
        target: cast_type.name(),
    };
    match cast_type {
        CastType::Str => Ok(Value::Str(value.to_string())),
        CastType::Int => match &value {
            Value::Int(number) => Ok(Value::Int(*number)),
            Value::Bool(flag) => Ok(Value::Int(i64::from(*flag))),
            Value::Float(number) if number.is_finite() && number.abs() < 9.2e18 => {
                Ok(Value::Int(number.trunc() as i64))
            }
            Value::Str(text) => text.trim().parse::<i64>().map(Value::Int).map_err(|_| invalid(&value)),
            _ => Err(invalid(&value)),
        },
        CastType::Float => match &value {
            Value::Str(text) => text.trim().parse::<f64>().map(Value::Float).map_err(|_| invalid(&value)),
            other => other
                .as_numeric()
                .map(|number| Value::Float(number.as_f64()))
                .ok_or_else(|| invalid(&value)),
        },
    }
}
