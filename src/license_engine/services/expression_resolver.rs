use crate::license_engine::domain::{
    ExpressionError, LicenseAtom, LicenseExpression, UnknownReason, NOASSERTION,
    UNVERIFIED_PREFIX,
};
use crate::license_engine::policies::LicenseCatalog;
use std::collections::HashMap;

const LICENSE_REF_PREFIX: &str = "LicenseRef-";
const PLACEHOLDERS: &[&str] = &[NOASSERTION, "UNKNOWN", "NONE"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    And,
    Or,
    With,
    /// One or more consecutive non-operator words
    Phrase(String),
}

/// Turns raw license strings into canonical [`LicenseExpression`] trees.
///
/// Atoms are resolved in this order: placeholders, explicit `LicenseRef-*`,
/// known identifiers (the SPDX catalog plus ids registered from the policy),
/// the alias table. Anything else is kept as an unverified unknown atom.
#[derive(Debug, Clone, Default)]
pub struct ExpressionResolver {
    /// lowercase id → canonical spelling
    known_ids: HashMap<String, String>,
}

impl ExpressionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers extra identifiers (e.g. every license named in the policy)
    /// so they resolve to themselves. The first of several case variants wins.
    /// Entries containing whitespace, such as
    /// `X WITH Y` policy keys, are not single atoms and are skipped.
    pub fn with_known_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut known_ids = HashMap::new();
        for id in ids {
            let id = id.as_ref().trim();
            if id.is_empty() || id.contains(char::is_whitespace) {
                continue;
            }
            // Case variants resolve to the first spelling registered
            known_ids
                .entry(id.to_lowercase())
                .or_insert_with(|| id.to_string());
        }
        Self { known_ids }
    }

    /// Resolves a raw license string.
    ///
    /// # Errors
    /// * [`ExpressionError::Ambiguous`] for mixed `AND`/`OR` at one nesting level
    /// * [`ExpressionError::Malformed`] for unbalanced parentheses or dangling operators
    pub fn resolve(&self, raw: &str) -> Result<LicenseExpression, ExpressionError> {
        let trimmed = raw.trim();
        if is_placeholder(trimmed) {
            return Ok(LicenseExpression::unknown());
        }

        // Whole-string aliases may contain commas ("Apache License, Version 2.0")
        if let Some(atom) = self.lookup_phrase(trimmed) {
            return Ok(LicenseExpression::Atom(atom));
        }

        if trimmed.contains(',') && !trimmed.contains('(') {
            return self.resolve_list(trimmed);
        }

        self.parse(trimmed)
    }

    /// Like [`resolve`](Self::resolve) but collapses parse failures to Unknown.
    pub fn resolve_lenient(&self, raw: &str) -> LicenseExpression {
        self.resolve(raw).unwrap_or_else(|_| LicenseExpression::unknown())
    }

    /// A declared license list such as `MIT, MIT License` combines with AND.
    fn resolve_list(&self, raw: &str) -> Result<LicenseExpression, ExpressionError> {
        let mut items: Vec<LicenseExpression> = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let expression = self.parse(part)?;
            let flattened = match expression {
                LicenseExpression::And(children) => children,
                other => vec![other],
            };
            for item in flattened {
                if !items.contains(&item) {
                    items.push(item);
                }
            }
        }

        Ok(match items.len() {
            0 => LicenseExpression::unknown(),
            1 => items.remove(0),
            _ => LicenseExpression::And(items),
        })
    }

    fn parse(&self, raw: &str) -> Result<LicenseExpression, ExpressionError> {
        let tokens = tokenize(raw);
        if tokens.is_empty() {
            return Ok(LicenseExpression::unknown());
        }

        let mut parser = Parser {
            resolver: self,
            raw,
            tokens: &tokens,
            pos: 0,
        };
        let expression = parser.parse_compound()?;
        if parser.pos < tokens.len() {
            return Err(parser.malformed("unbalanced parentheses"));
        }
        Ok(expression)
    }

    /// Resolves one phrase to an atom if it is a placeholder, a
    /// `LicenseRef`, a known id or an alias.
    fn lookup_phrase(&self, phrase: &str) -> Option<LicenseAtom> {
        if is_placeholder(phrase) {
            return Some(LicenseAtom::no_assertion());
        }
        let single_token = !phrase.contains(char::is_whitespace);
        if let Some(slug) =
            strip_prefix_ignore_case(phrase, UNVERIFIED_PREFIX).filter(|_| single_token)
        {
            return Some(if slug.is_empty() {
                LicenseAtom::no_assertion()
            } else {
                LicenseAtom::Unknown(UnknownReason::Unverified(slug.to_string()))
            });
        }
        if single_token && strip_prefix_ignore_case(phrase, LICENSE_REF_PREFIX).is_some() {
            return Some(LicenseAtom::LicenseRef(phrase.to_string()));
        }
        if let Some(id) = self.known_ids.get(&phrase.to_lowercase()) {
            return Some(LicenseAtom::spdx(id.clone()));
        }
        if let Some(id) = LicenseCatalog::canonical_license_id(phrase) {
            return Some(LicenseAtom::spdx(id));
        }
        match LicenseCatalog::alias(phrase) {
            Some(Some(id)) => Some(LicenseAtom::spdx(self.canonical_known(id))),
            Some(None) => Some(LicenseAtom::unverified(phrase)),
            None => None,
        }
    }

    /// Prefers the policy's spelling of an alias target when it has one.
    fn canonical_known(&self, id: &str) -> String {
        self.known_ids
            .get(&id.to_lowercase())
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    fn resolve_atom(&self, phrase: &str) -> LicenseAtom {
        self.lookup_phrase(phrase)
            .unwrap_or_else(|| LicenseAtom::unverified(phrase))
    }
}

struct Parser<'a> {
    resolver: &'a ExpressionResolver,
    raw: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn malformed(&self, details: &str) -> ExpressionError {
        ExpressionError::Malformed {
            expression: self.raw.to_string(),
            details: details.to_string(),
        }
    }

    /// operand ((AND|OR) operand)*, with a single operator kind per level
    fn parse_compound(&mut self) -> Result<LicenseExpression, ExpressionError> {
        let mut operands = vec![self.parse_with()?];
        let mut operator: Option<Token> = None;

        while let Some(token) = self.peek() {
            if !matches!(token, Token::And | Token::Or) {
                break;
            }
            let token = token.clone();
            if operator.as_ref().is_some_and(|existing| *existing != token) {
                return Err(ExpressionError::Ambiguous {
                    expression: self.raw.to_string(),
                });
            }
            operator = Some(token);
            self.pos += 1;
            operands.push(self.parse_with()?);
        }

        Ok(match operator {
            None => operands.remove(0),
            Some(Token::And) => LicenseExpression::And(flatten(operands, true)),
            Some(_) => LicenseExpression::Or(flatten(operands, false)),
        })
    }

    /// primary [WITH exception]
    fn parse_with(&mut self) -> Result<LicenseExpression, ExpressionError> {
        let primary = self.parse_primary()?;
        if self.peek() != Some(&Token::With) {
            return Ok(primary);
        }
        self.pos += 1;

        let exception = match self.peek() {
            Some(Token::Phrase(phrase)) => phrase.clone(),
            _ => return Err(self.malformed("WITH must be followed by an exception id")),
        };
        self.pos += 1;

        let LicenseExpression::Atom(license) = primary else {
            return Err(self.malformed("WITH must follow a single license"));
        };
        let exception = LicenseCatalog::canonical_exception_id(&exception)
            .map(str::to_string)
            .unwrap_or(exception);
        Ok(LicenseExpression::With { license, exception })
    }

    fn parse_primary(&mut self) -> Result<LicenseExpression, ExpressionError> {
        match self.peek() {
            Some(Token::Open) => {
                self.pos += 1;
                let inner = self.parse_compound()?;
                if self.peek() != Some(&Token::Close) {
                    return Err(self.malformed("unbalanced parentheses"));
                }
                self.pos += 1;
                Ok(inner)
            }
            Some(Token::Phrase(phrase)) => {
                let atom = self.resolver.resolve_atom(phrase);
                self.pos += 1;
                Ok(LicenseExpression::Atom(atom))
            }
            Some(Token::Close) => Err(self.malformed("unbalanced parentheses")),
            Some(_) => Err(self.malformed("operator without a left operand")),
            None => Err(self.malformed("expression ends with an operator")),
        }
    }
}

/// Merges same-operator children so `A AND (B AND C)` becomes one level.
fn flatten(operands: Vec<LicenseExpression>, is_and: bool) -> Vec<LicenseExpression> {
    let mut flat = Vec::with_capacity(operands.len());
    for operand in operands {
        match operand {
            LicenseExpression::And(children) if is_and => flat.extend(children),
            LicenseExpression::Or(children) if !is_and => flat.extend(children),
            other => flat.push(other),
        }
    }
    flat
}

fn tokenize(raw: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    fn end_word(current: &mut String, words: &mut Vec<String>, tokens: &mut Vec<Token>) {
        if current.is_empty() {
            return;
        }
        let word = std::mem::take(current);
        let operator = match word.as_str() {
            "AND" => Some(Token::And),
            "OR" => Some(Token::Or),
            "WITH" => Some(Token::With),
            _ => None,
        };
        match operator {
            Some(op) => {
                end_phrase(words, tokens);
                tokens.push(op);
            }
            None => words.push(word),
        }
    }

    fn end_phrase(words: &mut Vec<String>, tokens: &mut Vec<Token>) {
        if !words.is_empty() {
            tokens.push(Token::Phrase(words.join(" ")));
            words.clear();
        }
    }

    for c in raw.chars() {
        match c {
            '(' | ')' => {
                end_word(&mut current, &mut words, &mut tokens);
                end_phrase(&mut words, &mut tokens);
                tokens.push(if c == '(' { Token::Open } else { Token::Close });
            }
            c if c.is_whitespace() => end_word(&mut current, &mut words, &mut tokens),
            c => current.push(c),
        }
    }
    end_word(&mut current, &mut words, &mut tokens);
    end_phrase(&mut words, &mut tokens);
    tokens
}

fn is_placeholder(text: &str) -> bool {
    text.is_empty() || PLACEHOLDERS.iter().any(|p| text.eq_ignore_ascii_case(p))
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}
