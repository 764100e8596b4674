//! Syntax tree produced by the parser and read by every backend.
//!
//! Nodes own their children by value. The tree is acyclic and nothing mutates
//! it after parsing, so backends only ever borrow it.

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastType {
    Int,
    Str,
    Float,
}

impl CastType {
    pub fn name(&self) -> &'static str {
        match self {
            CastType::Int => "int",
            CastType::Str => "str",
            CastType::Float => "float",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Number(Number),
    Str(String),
    Bool(bool),
    Var(String),
    List(Vec<Node>),
    Index {
        collection: Box<Node>,
        index: Box<Node>,
    },
    IndexAssign {
        collection: Box<Node>,
        index: Box<Node>,
        value: Box<Node>,
    },
    Attr {
        object: Box<Node>,
        name: String,
    },
    AttrAssign {
        object: Box<Node>,
        name: String,
        value: Box<Node>,
    },
    BinOp {
        left: Box<Node>,
        op: String,
        right: Box<Node>,
    },
    LogicOp {
        left: Box<Node>,
        op: String,
        right: Box<Node>,
    },
    SpecialOp {
        left: Box<Node>,
        op: String,
        right: Box<Node>,
    },
    UnaryOp {
        op: String,
        operand: Box<Node>,
    },
    Not(Box<Node>),
    Assign {
        name: String,
        value: Box<Node>,
    },
    CompoundAssign {
        name: String,
        op: String,
        value: Box<Node>,
    },
    Print(Box<Node>),
    Input(Option<Box<Node>>),
    If {
        condition: Box<Node>,
        then_body: Block,
        elif_nodes: Vec<Elif>,
        else_body: Option<Block>,
    },
    While {
        condition: Box<Node>,
        body: Block,
    },
    For {
        var_name: String,
        iterable: Box<Node>,
        body: Block,
    },
    Range {
        start: Box<Node>,
        end: Box<Node>,
    },
    Func(Func),
    Call {
        callee: Box<Node>,
        args: Vec<Node>,
    },
    Class(Class),
    Len(Box<Node>),
    Cast {
        cast_type: CastType,
        value: Box<Node>,
    },
    Import(String),
    Break,
    Continue,
    Return(Option<Box<Node>>),
    Yield(Option<Box<Node>>),
}

impl Node {
    /// Variant name, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Number(_) => "Number",
            Node::Str(_) => "String",
            Node::Bool(_) => "Bool",
            Node::Var(_) => "Var",
            Node::List(_) => "List",
            Node::Index { .. } => "Index",
            Node::IndexAssign { .. } => "IndexAssign",
            Node::Attr { .. } => "Attr",
            Node::AttrAssign { .. } => "AttrAssign",
            Node::BinOp { .. } => "BinOp",
            Node::LogicOp { .. } => "LogicOp",
            Node::SpecialOp { .. } => "SpecialOp",
            Node::UnaryOp { .. } => "UnaryOp",
            Node::Not(_) => "Not",
            Node::Assign { .. } => "Assign",
            Node::CompoundAssign { .. } => "CompoundAssign",
            Node::Print(_) => "Print",
            Node::Input(_) => "Input",
            Node::If { .. } => "If",
            Node::While { .. } => "While",
            Node::For { .. } => "For",
            Node::Range { .. } => "Range",
            Node::Func(_) => "Func",
            Node::Call { .. } => "Call",
            Node::Class(_) => "Class",
            Node::Len(_) => "Len",
            Node::Cast { .. } => "Cast",
            Node::Import(_) => "Import",
            Node::Break => "Break",
            Node::Continue => "Continue",
            Node::Return(_) => "Return",
            Node::Yield(_) => "Yield",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Elif {
    pub condition: Box<Node>,
    pub then_body: Block,
    pub else_body: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Func {
    pub name: String,
    pub params: Vec<String>,
    pub body: Block,
}

/// A class definition. `methods` keeps declaration order and holds at most one
/// function per name.
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: String,
    pub fields: Vec<String>,
    pub methods: Vec<Func>,
}

pub const CONSTRUCTOR_METHOD: &str = "init";

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        Class {
            name: name.into(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn method(&self, name: &str) -> Option<&Func> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn constructor(&self) -> Option<&Func> {
        self.method(CONSTRUCTOR_METHOD)
    }

    /// Adds a method, replacing the body of an earlier one with the same name
    /// while keeping its original position.
    pub fn define_method(&mut self, func: Func) {
        match self.methods.iter_mut().find(|m| m.name == func.name) {
            Some(existing) => *existing = func,
            None => self.methods.push(func),
        }
    }

    pub fn declare_field(&mut self, name: String) {
        if !self.fields.contains(&name) {
            self.fields.push(name);
        }
    }

    pub fn needs_synthesized_constructor(&self) -> bool {
        self.constructor().is_none() && !self.fields.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Node>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn func(name: &str, params: &[&str]) -> Func {
        Func {
            name: name.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
            body: Block::default(),
        }
    }

    #[test]
    fn redefined_method_keeps_first_position() {
        let mut class = Class::new("Point");
        class.define_method(func("show", &[]));
        class.define_method(func("move", &["dx"]));
        class.define_method(func("show", &["prefix"]));

        let names: Vec<_> = class.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["show", "move"]);
        assert_eq!(class.methods[0].params, vec!["prefix".to_string()]);
    }

    #[test]
    fn synthesized_constructor_needs_fields_and_no_init() {
        let mut class = Class::new("Empty");
        assert!(!class.needs_synthesized_constructor());

        class.declare_field("a".to_string());
        assert!(class.needs_synthesized_constructor());

        class.define_method(func("init", &["a"]));
        assert!(!class.needs_synthesized_constructor());
        assert_eq!(class.constructor().map(|f| f.params.len()), Some(1));
    }
}
