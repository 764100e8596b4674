use logos::Logos;

use crate::error::LexError;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip(r"#[^\n]*", allow_greedy = true))]
pub enum TokenKind {
    #[token("let")]
    Let,

    #[token("const")]
    Const,

    #[token("print")]
    Print,

    #[token("input")]
    Input,

    #[token("if")]
    If,

    #[token("elif")]
    Elif,

    #[token("else")]
    Else,

    #[token("while")]
    While,

    #[token("for")]
    For,

    #[token("in")]
    In,

    #[token("def")]
    Def,

    #[token("class")]
    Class,

    #[token("import")]
    Import,

    #[token("break")]
    Break,

    #[token("continue")]
    Continue,

    #[token("return")]
    Return,

    #[token("yield")]
    Yield,

    #[token("len")]
    Len,

    #[token("range")]
    Range,

    #[token("int")]
    IntCast,

    #[token("str")]
    StrCast,

    #[token("float")]
    FloatCast,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("fn")]
    #[token("from")]
    #[token("try")]
    #[token("except")]
    #[token("raise")]
    #[token("pass")]
    #[token("lambda")]
    #[token("with")]
    #[token("as")]
    #[token("del")]
    #[token("assert")]
    #[token("global")]
    #[token("nonlocal")]
    #[token("async")]
    #[token("await")]
    #[token("match")]
    #[token("case")]
    #[token("macro")]
    #[token("inline")]
    #[token("parallel")]
    #[token("when")]
    #[token("unless")]
    #[token("loop")]
    #[token("until")]
    #[token("do")]
    #[token("struct")]
    #[token("enum")]
    #[token("type")]
    #[token("interface")]
    #[token("pub")]
    #[token("priv")]
    Reserved,

    #[regex(r"===|!==|==|!=|<=|>=|<>|<|>")]
    Comparison,

    #[token("&&")]
    #[token("||")]
    #[token("and")]
    #[token("or")]
    Logic,

    #[token("not")]
    #[token("!")]
    Not,

    #[regex(r"\+\+|--")]
    Step,

    #[regex(r"\+=|-=|\*=|/=|%=|\*\*=|//=|&=|\|=")]
    CompoundAssign,

    #[regex(r"\?\?|->|=>|<=>|::")]
    Special,

    #[token("=")]
    Assign,

    #[regex(r"\+|-|\*\*|\*|//|/|%|&|\||\^|<<|>>")]
    Arith,

    #[token("(")]
    LParenthesis,

    #[token(")")]
    RParenthesis,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(":")]
    Colon,

    #[token(",")]
    Separator,

    #[token(".")]
    Access,

    #[token(";")]
    Semicolon,

    #[token("?")]
    Question,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,

    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r"[0-9]+\.[0-9]+")]
    Float,

    #[regex(r#""[^"\n]*"|'[^'\n]*'"#)]
    String,

    #[token("\n")]
    Newline,

    Eof,
}

/// A scanned token with its source text and 1-based position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }

    pub fn is(&self, kind: TokenKind, lexeme: &str) -> bool {
        self.kind == kind && self.lexeme == lexeme
    }
}

/// Tokenizes a sequence of source lines.
///
/// Every line contributes its tokens followed by a synthetic `Newline`, and the
/// stream always ends with a single `Eof` token positioned after the last line.
pub fn tokenize_lines<I, S>(lines: I) -> Result<Vec<Token>, LexError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tokens = Vec::new();
    let mut line_number = 0;

    for line in lines {
        line_number += 1;
        let line = line.as_ref();
        let mut lexer = TokenKind::lexer(line);

        while let Some(result) = lexer.next() {
            let span = lexer.span();
            let column = line[..span.start].chars().count() + 1;
            match result {
                Ok(kind) => tokens.push(Token::new(kind, lexer.slice(), line_number, column)),
                Err(()) => {
                    let character = line[span.start..].chars().next().unwrap_or('\0');
                    return Err(LexError::IllegalCharacter {
                        character,
                        line: line_number,
                        column,
                    });
                }
            }
        }

        let end = line.chars().count() + 1;
        tokens.push(Token::new(TokenKind::Newline, "\\n", line_number, end));
    }

    tokens.push(Token::new(TokenKind::Eof, "", line_number + 1, 1));
    Ok(tokens)
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    tokenize_lines(source.lines())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .expect("tokenize should succeed")
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn tokenizes_assignment_and_print() {
        let source = indoc! {"
            let x = 4 + 2.5
            print(x)
        "};
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Let,
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::Integer,
                TokenKind::Arith,
                TokenKind::Float,
                TokenKind::Newline,
                TokenKind::Print,
                TokenKind::LParenthesis,
                TokenKind::Identifier,
                TokenKind::RParenthesis,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn positions_are_one_based() {
        let tokens = tokenize("x  = 'hi'\n  y").expect("tokenize should succeed");
        let positions: Vec<_> = tokens.iter().map(|t| (t.line, t.column)).collect();
        assert_eq!(positions, vec![(1, 1), (1, 4), (1, 6), (1, 10), (2, 3), (2, 4), (3, 1)]);
        assert_eq!(tokens[2].lexeme, "'hi'");
    }

    #[test]
    fn prefers_longest_operator() {
        let tokens = tokenize("a <=> b ** c //= d -- e").expect("tokenize should succeed");
        let lexemes: Vec<_> = tokens
            .iter()
            .filter(|t| !matches!(t.kind, TokenKind::Identifier | TokenKind::Newline | TokenKind::Eof))
            .map(|t| (t.kind, t.lexeme.as_str()))
            .collect();
        assert_eq!(
            lexemes,
            vec![
                (TokenKind::Special, "<=>"),
                (TokenKind::Arith, "**"),
                (TokenKind::CompoundAssign, "//="),
                (TokenKind::Step, "--"),
            ]
        );
    }

    #[test]
    fn keywords_do_not_split_identifiers() {
        assert_eq!(
            kinds("android or notable"),
            vec![
                TokenKind::Identifier,
                TokenKind::Logic,
                TokenKind::Identifier,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
        assert_eq!(kinds("type")[0], TokenKind::Reserved);
    }

    #[test]
    fn negation_words_beat_identifiers() {
        let tokens = tokenize("not nothing and ! x != y").expect("tokenize should succeed");
        let pairs: Vec<(TokenKind, &str)> =
            tokens.iter().map(|t| (t.kind, t.lexeme.as_str())).collect();
        assert_eq!(
            pairs[..7],
            [
                (TokenKind::Not, "not"),
                (TokenKind::Identifier, "nothing"),
                (TokenKind::Logic, "and"),
                (TokenKind::Not, "!"),
                (TokenKind::Identifier, "x"),
                (TokenKind::Comparison, "!="),
                (TokenKind::Identifier, "y"),
            ]
        );
    }

    #[test]
    fn skips_comments() {
        assert_eq!(
            kinds("x # trailing words\n# whole line"),
            vec![TokenKind::Identifier, TokenKind::Newline, TokenKind::Newline, TokenKind::Eof]
        );
    }

    #[test]
    fn errors_on_illegal_character() {
        let err = tokenize("let a = 1\nlet b = $").expect_err("expected lexing failure");
        assert_eq!(
            err,
            LexError::IllegalCharacter {
                character: '$',
                line: 2,
                column: 9
            }
        );
    }

    #[test]
    fn errors_on_unterminated_string() {
        let err = tokenize("print \"open").expect_err("expected lexing failure");
        assert!(err.to_string().contains("'\"'"));
    }

    #[test]
    fn empty_source_is_only_eof() {
        let tokens = tokenize("").expect("tokenize should succeed");
        assert_eq!(tokens, vec![Token::new(TokenKind::Eof, "", 1, 1)]);
    }
}
