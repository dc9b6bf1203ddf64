use std::collections::VecDeque;

use regex::Regex;

use crate::error::{Error, Result};
use crate::grammar::Symbol;
use crate::token::Token;

/// What the lexer does when no pattern matches at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoMatchPolicy {
    /// Record the character in [`Lexer::skipped`] and continue after it.
    #[default]
    Skip,
    /// Stop lexing with [`Error::NoMatch`].
    Abort,
}

/// A character no pattern could start a token at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unmatched {
    pub offset: usize,
    pub character: char,
}

/// Splits text into tokens using regex patterns tried in registration order;
/// the first pattern matching at the current position wins.
pub struct Lexer {
    ignore_characters: String,
    token_patterns: Vec<(Regex, Symbol)>,
    policy: NoMatchPolicy,
    tokens: VecDeque<Token>,
    skipped: Vec<Unmatched>,
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer {
    pub fn new() -> Self {
        Self {
            ignore_characters: " \t\r\n".to_string(),
            token_patterns: Vec::new(),
            policy: NoMatchPolicy::default(),
            tokens: VecDeque::new(),
            skipped: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: NoMatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn set_ignore_characters(&mut self, characters: &str) {
        self.ignore_characters = characters.to_string();
    }

    pub fn register_pattern(&mut self, pattern: &str, symbol_name: &str) -> Result<()> {
        // anchored so a match can only start at the current position
        let regex = Regex::new(&format!("^(?:{})", pattern)).map_err(|source| {
            Error::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;
        self.token_patterns.push((regex, Symbol::new(symbol_name)));
        Ok(())
    }

    /// A whole-word pattern producing a symbol named after the word.
    pub fn register_keyword(&mut self, keyword: &str) -> Result<()> {
        self.register_pattern(&format!(r"\b{}\b", regex::escape(keyword)), keyword)
    }

    fn is_ignored(&self, ch: char) -> bool {
        self.ignore_characters.contains(ch)
    }

    pub fn lex(&mut self, input: &str) -> Result<()> {
        let mut current = 0;
        while current < input.len() {
            let rest = &input[current..];
            let Some(ch) = rest.chars().next() else {
                break;
            };
            if self.is_ignored(ch) {
                current += ch.len_utf8();
                continue;
            }

            let found = self.token_patterns.iter().find_map(|(regex, symbol)| {
                regex
                    .find(rest)
                    .filter(|m| !m.as_str().is_empty())
                    .map(|m| (symbol, m.as_str()))
            });

            match found {
                Some((symbol, lexeme)) => {
                    current += lexeme.len();
                    self.tokens.push_back(Token::new(symbol.clone(), lexeme));
                }
                None => {
                    let unmatched = Unmatched {
                        offset: current,
                        character: ch,
                    };
                    match self.policy {
                        NoMatchPolicy::Skip => {
                            self.skipped.push(unmatched);
                            current += ch.len_utf8();
                        }
                        NoMatchPolicy::Abort => {
                            return Err(Error::NoMatch {
                                offset: unmatched.offset,
                                character: unmatched.character,
                            })
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub fn has_next_token(&self) -> bool {
        !self.tokens.is_empty()
    }

    pub fn next_token(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }

    /// Characters passed over under [`NoMatchPolicy::Skip`].
    pub fn skipped(&self) -> &[Unmatched] {
        &self.skipped
    }

    /// Drains the pending tokens, terminated by the end-of-input token.
    pub fn into_tokens_with_end(self) -> Vec<Token> {
        self.tokens
            .into_iter()
            .chain(std::iter::once(Token::end_of_input()))
            .collect()
    }
}
