use crate::ast::{Block, Class, Elif, Func, Node, CONSTRUCTOR_METHOD};
use crate::error::CodegenError;

use super::constants::{EMPTY_BODY, PYTHON_CONSTRUCTOR, RECEIVER};
use super::helpers::indent_block;
use super::Codegen;

impl Codegen {
    pub(super) fn generate_stmt(&mut self, node: &Node) -> Result<String, CodegenError> {
        match node {
            Node::Assign { name, value } => Ok(format!("{name} = {}", self.generate_expr(value)?)),
            Node::CompoundAssign { name, op, value } => {
                Ok(format!("{name} {op} {}", self.generate_expr(value)?))
            }
            Node::IndexAssign { collection, index, value } => Ok(format!(
                "{}[{}] = {}",
                self.generate_expr(collection)?,
                self.generate_expr(index)?,
                self.generate_expr(value)?
            )),
            Node::AttrAssign { object, name, value } => Ok(format!(
                "{}.{name} = {}",
                self.generate_expr(object)?,
                self.generate_expr(value)?
            )),
            Node::Print(value) => Ok(format!("print({})", self.generate_expr(value)?)),
            Node::If { condition, then_body, elif_nodes, else_body } => {
                self.generate_if(condition, then_body, elif_nodes, else_body.as_ref())
            }
            Node::While { condition, body } => Ok(format!(
                "while {}:\n{}",
                self.generate_expr(condition)?,
                self.generate_block(body)?
            )),
            Node::For { var_name, iterable, body } => Ok(format!(
                "for {var_name} in {}:\n{}",
                self.generate_expr(iterable)?,
                self.generate_block(body)?
            )),
            Node::Func(func) => self.generate_function(&func.name, &func.params, &func.body),
            Node::Class(class) => self.generate_class(class),
            Node::Import(path) => Ok(format!("import {path}")),
            Node::Break => Ok("break".to_string()),
            Node::Continue => Ok("continue".to_string()),
            Node::Return(value) => self.generate_keyword("return", value.as_deref()),
            Node::Yield(value) => self.generate_keyword("yield", value.as_deref()),
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
            | Node::Cast { .. } => self.generate_expr(node),
        }
    }

    fn generate_keyword(&mut self, keyword: &str, value: Option<&Node>) -> Result<String, CodegenError> {
        match value {
            Some(value) => Ok(format!("{keyword} {}", self.generate_expr(value)?)),
            None => Ok(keyword.to_string()),
        }
    }

    fn generate_if<'a>(
        &mut self,
        condition: &Node,
        then_body: &Block,
        elif_nodes: &'a [Elif],
        else_body: Option<&'a Block>,
    ) -> Result<String, CodegenError> {
        let mut code = format!(
            "if {}:\n{}",
            self.generate_expr(condition)?,
            self.generate_block(then_body)?
        );

        // An else attached to an elif can only close the chain.
        let mut trailing_else = else_body;
        for (position, elif) in elif_nodes.iter().enumerate() {
            code.push_str(&format!(
                "\nelif {}:\n{}",
                self.generate_expr(&elif.condition)?,
                self.generate_block(&elif.then_body)?
            ));
            if let Some(body) = &elif.else_body {
                let is_last = position + 1 == elif_nodes.len();
                if !is_last || trailing_else.is_some() {
                    return Err(CodegenError::UnknownNode {
                        node: "Elif with a nested else".to_string(),
                    });
                }
                trailing_else = Some(body);
            }
        }

        if let Some(body) = trailing_else {
            code.push_str(&format!("\nelse:\n{}", self.generate_block(body)?));
        }
        Ok(code)
    }

    fn generate_function(
        &mut self,
        name: &str,
        params: &[String],
        body: &Block,
    ) -> Result<String, CodegenError> {
        Ok(format!(
            "def {name}({}):\n{}",
            params.join(", "),
            self.generate_block(body)?
        ))
    }

    /// Methods take the receiver first and `init` becomes `__init__`.
    fn generate_method(&mut self, method: &Func) -> Result<String, CodegenError> {
        let name = if method.name == CONSTRUCTOR_METHOD {
            PYTHON_CONSTRUCTOR
        } else {
            method.name.as_str()
        };

        let mut params = Vec::with_capacity(method.params.len() + 1);
        if method.params.first().map(String::as_str) != Some(RECEIVER) {
            params.push(RECEIVER.to_string());
        }
        params.extend(method.params.iter().cloned());

        self.generate_function(name, &params, &method.body)
    }

    /// `__init__(self, f1, f2, ...)` assigning each declared field.
    fn synthesize_constructor(&self, class: &Class) -> String {
        let mut params = vec![RECEIVER.to_string()];
        params.extend(class.fields.iter().cloned());

        let body = class
            .fields
            .iter()
            .map(|field| format!("{RECEIVER}.{field} = {field}"))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "def {PYTHON_CONSTRUCTOR}({}):\n{}",
            params.join(", "),
            indent_block(&body)
        )
    }

    fn generate_class(&mut self, class: &Class) -> Result<String, CodegenError> {
        // Registered first so methods can construct their own class.
        self.known_classes.insert(class.name.clone());

        let mut members = Vec::new();
        if class.needs_synthesized_constructor() {
            members.push(self.synthesize_constructor(class));
        }
        for method in &class.methods {
            members.push(self.generate_method(method)?);
        }

        let body = if members.is_empty() {
            EMPTY_BODY.to_string()
        } else {
            members.join("\n")
        };
        Ok(format!("class {}:\n{}", class.name, indent_block(&body)))
    }
}
