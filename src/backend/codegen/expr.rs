use crate::ast::Node;
use crate::error::CodegenError;

use super::constants::{COMPARISON_ALIASES, LOGIC_ALIASES};
use super::helpers::{alias, number_literal, string_literal};
use super::Codegen;

impl Codegen {
    /// Operator nodes are always parenthesized, so source precedence survives
    /// regardless of how Python would group the bare text.
    pub(super) fn generate_expr(&mut self, node: &Node) -> Result<String, CodegenError> {
        match node {
            Node::Number(number) => Ok(number_literal(number)),
            Node::Str(value) => Ok(string_literal(value)),
            Node::Bool(true) => Ok("True".to_string()),
            Node::Bool(false) => Ok("False".to_string()),
            Node::Var(name) => Ok(name.clone()),
            Node::List(items) => Ok(format!("[{}]", self.generate_args(items)?)),
            Node::Index { collection, index } => Ok(format!(
                "{}[{}]",
                self.generate_expr(collection)?,
                self.generate_expr(index)?
            )),
            Node::Attr { object, name } => Ok(format!("{}.{name}", self.generate_expr(object)?)),
            Node::BinOp { left, op, right } => Ok(format!(
                "({} {} {})",
                self.generate_expr(left)?,
                alias(COMPARISON_ALIASES, op),
                self.generate_expr(right)?
            )),
            Node::LogicOp { left, op, right } => Ok(format!(
                "({} {} {})",
                self.generate_expr(left)?,
                alias(LOGIC_ALIASES, op),
                self.generate_expr(right)?
            )),
            Node::SpecialOp { left, op, right } => self.generate_special(left, op, right),
            Node::UnaryOp { op, operand } => Ok(format!("({op}{})", self.generate_expr(operand)?)),
            Node::Not(operand) => Ok(format!("(not {})", self.generate_expr(operand)?)),
            Node::Input(None) => Ok("input()".to_string()),
            Node::Input(Some(prompt)) => Ok(format!("input({})", self.generate_expr(prompt)?)),
            Node::Range { start, end } => Ok(format!(
                "range({}, {})",
                self.generate_expr(start)?,
                self.generate_expr(end)?
            )),
            Node::Call { callee, args } => self.generate_call(callee, args),
            Node::Len(value) => Ok(format!("len({})", self.generate_expr(value)?)),
            Node::Cast { cast_type, value } => {
                Ok(format!("{}({})", cast_type.name(), self.generate_expr(value)?))
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
            | Node::Yield(_) => Err(CodegenError::UnknownNode {
                node: node.kind_name().to_string(),
            }),
        }
    }

    fn generate_args(&mut self, args: &[Node]) -> Result<String, CodegenError> {
        let args = args
            .iter()
            .map(|arg| self.generate_expr(arg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(args.join(", "))
    }

    fn generate_call(&mut self, callee: &Node, args: &[Node]) -> Result<String, CodegenError> {
        let args = self.generate_args(args)?;
        match callee {
            // Constructor call: Python instantiates by calling the class.
            Node::Var(name) if self.known_classes.contains(name) => Ok(format!("{name}({args})")),
            _ => Ok(format!("{}({args})", self.generate_expr(callee)?)),
        }
    }

    fn generate_special(&mut self, left: &Node, op: &str, right: &Node) -> Result<String, CodegenError> {
        let left = self.generate_expr(left)?;
        let right = self.generate_expr(right)?;
        match op {
            "??" => Ok(format!("({left} if {left} is not None else {right})")),
            "<=>" => Ok(format!("(({left} > {right}) - ({left} < {right}))")),
            _ => Err(CodegenError::UnsupportedOperator { op: op.to_string() }),
        }
    }
}
