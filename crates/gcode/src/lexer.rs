//! Token definitions for the G-code lexer.
//!
//! G-code is a sequence of words (a letter immediately followed by a
//! number), `#n=value` parameter assignments, and inline comments in
//! `(...)` or `[...]` delimiters. Whitespace is insignificant except
//! that newlines terminate a block.

use logos::{Lexer, Logos};

/// A single lexical token.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
pub enum Token {
    /// A word: letter plus number, e.g. `G1`, `X-12.5`.
    #[regex(r"[A-Za-z][+-]?([0-9]+\.?[0-9]*|\.[0-9]+)", lex_word)]
    Word((char, f64)),

    /// A parameter assignment, e.g. `#5=12.5`.
    #[regex(r"#[0-9]+[ \t]*=[ \t]*[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)", lex_assign)]
    Assign((i64, f64)),

    /// A `(...)` comment.
    #[regex(r"\([^)\r\n]*\)", lex_comment)]
    ParenComment(String),

    /// A `[...]` comment.
    #[regex(r"\[[^\]\r\n]*\]", lex_comment)]
    BracketComment(String),

    /// Block terminator.
    #[token("\n")]
    Newline,
}

fn lex_word(lex: &mut Lexer<Token>) -> Option<(char, f64)> {
    let slice = lex.slice();
    let letter = slice.chars().next()?.to_ascii_uppercase();
    let number: f64 = slice[1..].parse().ok()?;
    Some((letter, number))
}

fn lex_assign(lex: &mut Lexer<Token>) -> Option<(i64, f64)> {
    let slice = lex.slice();
    let eq = slice.find('=')?;
    let var: i64 = slice[1..eq].trim().parse().ok()?;
    let value: f64 = slice[eq + 1..].trim().parse().ok()?;
    Some((var, value))
}

fn lex_comment(lex: &mut Lexer<Token>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        Token::lexer(input).map(|t| t.expect("lex error")).collect()
    }

    #[test]
    fn test_words() {
        assert_eq!(
            lex("G1 X-12.5 y2"),
            vec![
                Token::Word(('G', 1.0)),
                Token::Word(('X', -12.5)),
                Token::Word(('Y', 2.0)),
            ]
        );
    }

    #[test]
    fn test_word_without_spaces() {
        assert_eq!(
            lex("G0X1Y2"),
            vec![
                Token::Word(('G', 0.0)),
                Token::Word(('X', 1.0)),
                Token::Word(('Y', 2.0)),
            ]
        );
    }

    #[test]
    fn test_assign() {
        assert_eq!(lex("#5=12.5"), vec![Token::Assign((5, 12.5))]);
        assert_eq!(lex("#10 = -3"), vec![Token::Assign((10, -3.0))]);
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            lex("(tool change) [note]"),
            vec![
                Token::ParenComment("tool change".to_string()),
                Token::BracketComment("note".to_string()),
            ]
        );
    }

    #[test]
    fn test_newline_is_a_token() {
        assert_eq!(
            lex("G0\nG1"),
            vec![
                Token::Word(('G', 0.0)),
                Token::Newline,
                Token::Word(('G', 1.0)),
            ]
        );
    }

    #[test]
    fn test_bad_input_is_an_error() {
        let mut lexer = Token::lexer("G0 !");
        assert!(lexer.next().unwrap().is_ok());
        assert!(lexer.next().unwrap().is_err());
    }
}
