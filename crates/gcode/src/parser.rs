//! Parser from G-code text to the instruction IR.
//!
//! Blocks are newline-terminated; within a block, a motion word (G0,
//! G1, G2/G3, G53) claims the axis words that follow it, so a block
//! like `T6 G1 X1 Y2 Z1` yields a tool select and a move. Parsing is
//! whitespace-insensitive and case-insensitive in word letters.
//!
//! The printer on [`Instruction`] emits the canonical form of each
//! instruction, and `parse(&program.to_string())` reproduces any
//! program built from literal-valued instructions.

use logos::Logos;
use thiserror::Error;

use camber_core::instr::{ArcKind, Instruction, MoveKind, Plane};
use camber_core::program::Program;
use camber_core::value::Value;

use crate::lexer::Token;

/// Errors raised while turning text into a [`Program`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input that does not lex as a word, assignment, or comment.
    #[error("unrecognized text {text:?} on line {line}")]
    UnrecognizedText { text: String, line: usize },

    /// A G or M code outside the supported instruction set.
    #[error("unsupported code {word} on line {line}")]
    UnsupportedCode { word: String, line: usize },

    /// An axis-style word with no preceding command to attach to.
    #[error("stray word {letter}{value} on line {line}")]
    StrayWord { letter: char, value: f64, line: usize },
}

/// One lexed element of a block.
#[derive(Debug, Clone)]
enum Item {
    Word(char, f64),
    Assign(i64, f64),
    Comment(char, char, String),
}

/// Axis words collected after a motion code.
#[derive(Debug, Default)]
struct Words {
    x: Value,
    y: Value,
    z: Value,
    i: Value,
    j: Value,
    k: Value,
    feed: Value,
}

/// Parses G-code text into a program.
pub fn parse(input: &str) -> Result<Program, ParseError> {
    let mut program = Program::new();
    let mut plane = Plane::Xy;

    let mut line = 1usize;
    let mut items: Vec<Item> = Vec::new();
    let mut lexer = Token::lexer(input);

    while let Some(result) = lexer.next() {
        let token = result.map_err(|_| ParseError::UnrecognizedText {
            text: lexer.slice().to_string(),
            line,
        })?;
        match token {
            Token::Word((letter, value)) => items.push(Item::Word(letter, value)),
            Token::Assign((var, value)) => items.push(Item::Assign(var, value)),
            Token::ParenComment(text) => items.push(Item::Comment('(', ')', text)),
            Token::BracketComment(text) => items.push(Item::Comment('[', ']', text)),
            Token::Newline => {
                parse_block(&items, line, &mut plane, &mut program)?;
                items.clear();
                line += 1;
            }
        }
    }
    parse_block(&items, line, &mut plane, &mut program)?;

    Ok(program)
}

/// Parses one block (line) worth of items.
fn parse_block(
    items: &[Item],
    line: usize,
    plane: &mut Plane,
    program: &mut Program,
) -> Result<(), ParseError> {
    let mut idx = 0;

    while idx < items.len() {
        match &items[idx] {
            Item::Comment(left, right, text) => {
                program.push(Instruction::Comment {
                    left: *left,
                    right: *right,
                    text: text.clone(),
                });
                idx += 1;
            }
            Item::Assign(var, value) => {
                program.push(Instruction::Assign {
                    var: *var,
                    expr: Value::Literal(*value),
                });
                idx += 1;
            }
            Item::Word(letter, value) => {
                idx += 1;
                match letter {
                    'G' => parse_g(*value, items, &mut idx, line, plane, program)?,
                    'M' => program.push(parse_m(*value, line)?),
                    'T' => program.push(Instruction::ToolSelect(int_code(*value, 'T', line)?)),
                    'S' => program.push(Instruction::SpindleSpeed(int_code(*value, 'S', line)?)),
                    'F' => program.push(Instruction::FeedMode {
                        rate: int_code(*value, 'F', line)?,
                        axes: "XYZ".to_string(),
                    }),
                    other => {
                        return Err(ParseError::StrayWord {
                            letter: *other,
                            value: *value,
                            line,
                        })
                    }
                }
            }
        }
    }

    Ok(())
}

fn parse_g(
    value: f64,
    items: &[Item],
    idx: &mut usize,
    line: usize,
    plane: &mut Plane,
    program: &mut Program,
) -> Result<(), ParseError> {
    let code = int_code(value, 'G', line)?;
    match code {
        0 | 1 | 53 => {
            let kind = match code {
                0 => MoveKind::Rapid,
                1 => MoveKind::Linear,
                _ => MoveKind::MachineCoord,
            };
            let words = collect_words(items, idx, false);
            program.push(Instruction::Move {
                kind,
                x: words.x,
                y: words.y,
                z: words.z,
                feed: words.feed,
            });
        }
        2 | 3 => {
            let kind = if code == 2 { ArcKind::Cw } else { ArcKind::Ccw };
            let words = collect_words(items, idx, true);
            program.push(Instruction::Arc {
                kind,
                x: words.x,
                y: words.y,
                z: words.z,
                i: words.i,
                j: words.j,
                k: words.k,
                feed: words.feed,
                plane: *plane,
            });
        }
        // Plane selection is modal state for subsequent arcs, not an
        // instruction of its own.
        17 => *plane = Plane::Xy,
        18 => *plane = Plane::Zx,
        19 => *plane = Plane::Yz,
        20 => program.push(Instruction::UnitsInch),
        21 => program.push(Instruction::UnitsMm),
        43 => {
            skip_words(items, idx, &['H']);
            program.push(Instruction::ToolLengthComp);
        }
        64 => {
            skip_words(items, idx, &['P', 'Q']);
            program.push(Instruction::PathBlendMode);
        }
        90 => program.push(Instruction::SetAbsolute),
        91 => program.push(Instruction::SetRelative),
        other => {
            return Err(ParseError::UnsupportedCode {
                word: format!("G{other}"),
                line,
            })
        }
    }
    Ok(())
}

fn parse_m(value: f64, line: usize) -> Result<Instruction, ParseError> {
    match int_code(value, 'M', line)? {
        2 | 30 => Ok(Instruction::EndProgram),
        3 => Ok(Instruction::SpindleOn),
        4 => Ok(Instruction::SpindleOnCcw),
        5 => Ok(Instruction::SpindleOff),
        7 => Ok(Instruction::MistOn),
        8 => Ok(Instruction::FloodOn),
        9 => Ok(Instruction::CoolantOff),
        other => Err(ParseError::UnsupportedCode {
            word: format!("M{other}"),
            line,
        }),
    }
}

/// Collects the axis words following a motion code.
///
/// Stops at the first word that does not belong to the motion block.
/// R, Q, and H words are accepted and consumed but have no slot in the
/// IR's motion instructions.
fn collect_words(items: &[Item], idx: &mut usize, allow_ijk: bool) -> Words {
    let mut words = Words::default();
    while let Some(Item::Word(letter, value)) = items.get(*idx) {
        let value = Value::Literal(*value);
        match letter {
            'X' => words.x = value,
            'Y' => words.y = value,
            'Z' => words.z = value,
            'F' => words.feed = value,
            'I' if allow_ijk => words.i = value,
            'J' if allow_ijk => words.j = value,
            'K' if allow_ijk => words.k = value,
            'R' | 'Q' | 'H' => {}
            _ => break,
        }
        *idx += 1;
    }
    words
}

/// Consumes optional trailing words of the given letters.
fn skip_words(items: &[Item], idx: &mut usize, letters: &[char]) {
    while let Some(Item::Word(letter, _)) = items.get(*idx) {
        if letters.contains(letter) {
            *idx += 1;
        } else {
            break;
        }
    }
}

/// Interprets a word number as an integer code.
fn int_code(value: f64, letter: char, line: usize) -> Result<i32, ParseError> {
    if (value - value.round()).abs() > 1e-9 {
        return Err(ParseError::UnsupportedCode {
            word: format!("{letter}{value}"),
            line,
        });
    }
    Ok(value.round() as i32)
}
