mod constants;
mod expr;
pub(crate) mod helpers;
mod stmt;

use std::collections::HashSet;

use crate::ast::{Block, Program};
use crate::error::CodegenError;

use constants::EMPTY_BODY;
use helpers::indent_block;

/// Lowers a syntax tree to Python source text.
///
/// The generator remembers which class names it has emitted so that calls to
/// them are spelled as constructor calls. That registry is cleared at the
/// start of every [`Codegen::generate`] pass.
pub struct Codegen {
    known_classes: HashSet<String>,
}

impl Codegen {
    pub fn new() -> Self {
        Codegen {
            known_classes: HashSet::new(),
        }
    }

    pub fn known_classes(&self) -> &HashSet<String> {
        &self.known_classes
    }

    /// Top-level statements joined by newlines, with no trailing newline.
    pub fn generate(&mut self, program: &Program) -> Result<String, CodegenError> {
        self.known_classes.clear();
        let lines = program
            .statements
            .iter()
            .map(|statement| self.generate_stmt(statement))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lines.join("\n"))
    }

    /// An indented body. Empty blocks become `pass` so the output stays valid
    /// Python.
    fn generate_block(&mut self, block: &Block) -> Result<String, CodegenError> {
        if block.statements.is_empty() {
            return Ok(indent_block(EMPTY_BODY));
        }
        let lines = block
            .statements
            .iter()
            .map(|statement| self.generate_stmt(statement))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(indent_block(&lines.join("\n")))
    }
}

impl Default for Codegen {
    fn default() -> Self {
        Self::new()
    }
}

pub fn transpile(program: &Program) -> Result<String, CodegenError> {
    Codegen::new().generate(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Class, Elif, Func, Node, Number};
    use indoc::indoc;

    fn parse(source: &str) -> Program {
        let tokens = crate::frontend::lexer::tokenize(source).expect("lex failed");
        crate::frontend::parser::parse_tokens(tokens).expect("parse failed")
    }

    fn python(source: &str) -> String {
        transpile(&parse(source)).expect("codegen failed")
    }

    fn int(value: i64) -> Box<Node> {
        Box::new(Node::Number(Number::Int(value)))
    }

    #[test]
    fn assignments_and_print() {
        let source = indoc! {"
            let x = 1 + 2 * 3
            x += 4
            print(x)
        "};
        assert_eq!(python(source), "x = (1 + (2 * 3))\nx += 4\nprint(x)");
    }

    #[test]
    fn nested_blocks_indent_four_spaces_per_level() {
        let source = indoc! {"
            while true {
                for i in range(3) {
                    if i == 1 {
                        break
                    }
                }
            }
        "};
        let expected = indoc! {"
            while True:
                for i in range(0, 3):
                    if (i == 1):
                        break"};
        assert_eq!(python(source), expected);
    }

    #[test]
    fn if_chain_keeps_every_clause() {
        let source = indoc! {"
            if x < 0 {
                print(\"neg\")
            } elif x == 0 {
                print(\"zero\")
            } else if x < 10 {
                print(\"small\")
            } else {
                print(\"big\")
            }
        "};
        let output = python(source);
        assert_eq!(output.matches("elif ").count(), 2);
        assert_eq!(output.matches("else:").count(), 1);
        assert!(output.starts_with("if (x < 0):\n    print('neg')\nelif (x == 0):"));
        assert!(output.ends_with("else:\n    print('big')"));
    }

    #[test]
    fn empty_blocks_become_pass() {
        assert_eq!(python("while false {}"), "while False:\n    pass");
        assert_eq!(python("def noop() {}"), "def noop():\n    pass");
    }

    #[test]
    fn functions_and_returns() {
        let source = indoc! {"
            def add(a, b) {
                return a + b
            }
            def stop() {
                return
            }
        "};
        let expected = indoc! {"
            def add(a, b):
                return (a + b)
            def stop():
                return"};
        assert_eq!(python(source), expected);
    }

    #[test]
    fn class_with_fields_gets_a_constructor() {
        let source = indoc! {"
            class Point {
                let x
                let y
                def norm() {
                    return self.x * self.x + self.y * self.y
                }
            }
            let p = Point(3, 4)
        "};
        let expected = indoc! {"
            class Point:
                def __init__(self, x, y):
                    self.x = x
                    self.y = y
                def norm(self):
                    return ((self.x * self.x) + (self.y * self.y))
            p = Point(3, 4)"};
        assert_eq!(python(source), expected);
    }

    #[test]
    fn explicit_init_is_renamed_and_not_duplicated() {
        let source = indoc! {"
            class Counter {
                let count
                def init(start) {
                    self.count = start
                }
                def bump(self) {
                    self.count = self.count + 1
                }
            }
        "};
        let output = python(source);
        assert_eq!(output.matches("def __init__").count(), 1);
        assert!(output.contains("    def __init__(self, start):\n        self.count = start"));
        assert!(output.contains("    def bump(self):"));
    }

    #[test]
    fn empty_class_body_is_pass() {
        assert_eq!(python("class Marker {}"), "class Marker:\n    pass");
    }

    #[test]
    fn known_classes_reset_between_passes() {
        let mut codegen = Codegen::new();
        codegen.generate(&parse("class A {}")).expect("codegen failed");
        assert!(codegen.known_classes().contains("A"));

        codegen.generate(&parse("let b = 1")).expect("codegen failed");
        assert!(codegen.known_classes().is_empty());
    }

    #[test]
    fn strings_are_python_literals() {
        assert_eq!(python("print('it\"s')"), "print('it\"s')");
        assert_eq!(python("print(\"don't\")"), "print(\"don't\")");
    }

    #[test]
    fn operators_are_respelled() {
        assert_eq!(python("print(a === b)"), "print((a == b))");
        assert_eq!(python("print(a <> b)"), "print((a != b))");
        assert_eq!(python("print(a && !b || c)"), "print(((a and (not b)) or c))");
        assert_eq!(python("print(a ?? b)"), "print((a if a is not None else b))");
        assert_eq!(python("print(a <=> b)"), "print(((a > b) - (a < b)))");
        assert_eq!(python("print(-x ** 2)"), "print((-(x ** 2)))");
    }

    #[test]
    fn builtins_lower_to_python_calls() {
        let source = "let n = int(input(\"n? \"))\nprint(len(str(n)))\nprint(float(n) / 2)";
        assert_eq!(
            python(source),
            "n = int(input('n? '))\nprint(len(str(n)))\nprint((float(n) / 2))"
        );
    }

    #[test]
    fn postfix_chains_and_imports() {
        let source = "import os.path\nitems[0] = obj.items[1](2)\nobj.size = [1, 2.5, true]";
        assert_eq!(
            python(source),
            "import os.path\nitems[0] = obj.items[1](2)\nobj.size = [1, 2.5, True]"
        );
    }

    #[test]
    fn arrow_operators_are_rejected() {
        let err = transpile(&parse("let f = a -> b")).unwrap_err();
        assert_eq!(err, CodegenError::UnsupportedOperator { op: "->".to_string() });
    }

    #[test]
    fn statement_in_expression_position_is_rejected() {
        let program = Program {
            statements: vec![Node::Print(Box::new(Node::Break))],
        };
        assert_eq!(
            transpile(&program).unwrap_err(),
            CodegenError::UnknownNode { node: "Break".to_string() }
        );
    }

    #[test]
    fn elif_else_body_closes_the_chain() {
        let program = Program {
            statements: vec![Node::If {
                condition: Box::new(Node::Bool(false)),
                then_body: Block::default(),
                elif_nodes: vec![Elif {
                    condition: Box::new(Node::Bool(true)),
                    then_body: Block { statements: vec![Node::Print(int(1))] },
                    else_body: Some(Block { statements: vec![Node::Print(int(2))] }),
                }],
                else_body: None,
            }],
        };
        let expected = indoc! {"
            if False:
                pass
            elif True:
                print(1)
            else:
                print(2)"};
        assert_eq!(transpile(&program).expect("codegen failed"), expected);
    }

    #[test]
    fn method_already_taking_self_is_unchanged() {
        let mut class = Class::new("Box");
        class.define_method(Func {
            name: "get".to_string(),
            params: vec!["self".to_string(), "key".to_string()],
            body: Block::default(),
        });
        let program = Program { statements: vec![Node::Class(class)] };
        assert_eq!(
            transpile(&program).expect("codegen failed"),
            "class Box:\n    def get(self, key):\n        pass"
        );
    }
}
