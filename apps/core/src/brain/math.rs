//! Local arithmetic and prime-number answers.
//!
//! Expressions are parsed with a small recursive-descent parser over
//! `+ - * / ^ **`, parentheses and decimals. Nothing is ever handed to an
//! interpreter. Anything the parser rejects falls through to the providers.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Largest upper bound accepted for prime listings.
pub const PRIME_RANGE_CAP: u64 = 100_000;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("invalid expression: {0}")]
    Invalid(String),
}

static QUESTION_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(what\s+is|what's|whats|calculate|solve|compute|evaluate)\b\s*")
        .expect("Invalid regex: math question prefix")
});

static EMBEDDED_EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\d(][\d\s.()+\-*/^]*[\d)]").expect("Invalid regex: embedded expression")
});

static NUMBERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("Invalid regex: integer literal"));

fn is_expression_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '*' | '/' | '^' | '(' | ')' | '.')
}

fn has_operator(expr: &str) -> bool {
    // A leading sign alone does not make an expression.
    expr.trim_start_matches(['-', '+'])
        .chars()
        .any(|c| matches!(c, '+' | '-' | '*' | '/' | '^'))
}

/// Pulls an arithmetic expression out of a message, without spaces.
///
/// Accepts a bare expression (`3 + 5`) or one behind a question prefix
/// (`what is 15 * 8 - 10?`). Returns `None` for anything else.
pub fn extract_expression(text: &str) -> Option<String> {
    let (body, prefixed) = match QUESTION_PREFIX.find(text) {
        Some(m) => (&text[m.end()..], true),
        None => (text, false),
    };
    let body = body.trim().trim_end_matches(['?', '!', '=', '.']).trim();

    let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    if !compact.is_empty()
        && compact.chars().all(is_expression_char)
        && compact.chars().any(|c| c.is_ascii_digit())
        && has_operator(&compact)
    {
        return Some(compact);
    }

    if !prefixed {
        return None;
    }

    let candidate = EMBEDDED_EXPRESSION.find(body)?;
    let compact: String = candidate
        .as_str()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    has_operator(&compact).then_some(compact)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

fn tokenize(expr: &str) -> Result<Vec<Token>, MathError> {
    let chars: Vec<char> = expr.chars().filter(|c| !c.is_whitespace()).collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| MathError::Invalid(format!("bad number '{}'", literal)))?;
                tokens.push(Token::Num(value));
                continue;
            }
            '+' => tokens.push(Token::Plus),
            '-' => tokens.push(Token::Minus),
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push(Token::Caret);
                i += 1;
            }
            '*' => tokens.push(Token::Star),
            '/' => tokens.push(Token::Slash),
            '^' => tokens.push(Token::Caret),
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            other => return Err(MathError::Invalid(format!("unexpected '{}'", other))),
        }
        i += 1;
    }

    Ok(tokens)
}

/// Deepest nesting of parentheses and unary/exponent chains accepted.
const MAX_DEPTH: usize = 64;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn descend(&mut self) -> Result<(), MathError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(MathError::Invalid("expression nested too deeply".to_string()));
        }
        Ok(())
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<f64, MathError> {
        let mut value = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == Token::Plus { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    // term := unary (('*' | '/') unary)*
    fn term(&mut self) -> Result<f64, MathError> {
        let mut value = self.unary()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.pos += 1;
            let rhs = self.unary()?;
            if op == Token::Star {
                value *= rhs;
            } else {
                if rhs == 0.0 {
                    return Err(MathError::DivisionByZero);
                }
                value /= rhs;
            }
        }
        Ok(value)
    }

    // unary := ('-' | '+') unary | power
    fn unary(&mut self) -> Result<f64, MathError> {
        self.descend()?;
        let value = self.unary_inner();
        self.depth -= 1;
        value
    }

    fn unary_inner(&mut self) -> Result<f64, MathError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    // power := primary ('^' unary)?   (right-associative, binds tighter than unary minus)
    fn power(&mut self) -> Result<f64, MathError> {
        let base = self.primary()?;
        if self.peek() == Some(Token::Caret) {
            self.pos += 1;
            let exponent = self.unary()?;
            if base == 0.0 && exponent < 0.0 {
                return Err(MathError::DivisionByZero);
            }
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64, MathError> {
        match self.next() {
            Some(Token::Num(value)) => Ok(value),
            Some(Token::LParen) => {
                self.descend()?;
                let value = self.expr()?;
                self.depth -= 1;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(MathError::Invalid("missing ')'".to_string())),
                }
            }
            Some(other) => Err(MathError::Invalid(format!("unexpected {:?}", other))),
            None => Err(MathError::Invalid("unexpected end of expression".to_string())),
        }
    }
}

/// Evaluates an arithmetic expression.
pub fn evaluate(expr: &str) -> Result<f64, MathError> {
    let tokens = tokenize(expr)?;
    if tokens.is_empty() {
        return Err(MathError::Invalid("empty expression".to_string()));
    }

    let mut parser = Parser::new(tokens);
    let value = parser.expr()?;

    if parser.pos != parser.tokens.len() {
        return Err(MathError::Invalid("trailing input".to_string()));
    }
    if !value.is_finite() {
        return Err(MathError::Invalid("result is not a finite number".to_string()));
    }

    Ok(value)
}

/// Integers print without a fraction; other values keep six significant
/// digits, or switch to scientific notation when very small.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    if value.abs() < 1e-6 {
        let rendered = format!("{:.5e}", value);
        return match rendered.split_once('e') {
            Some((mantissa, exponent)) => format!("{}e{}", trim_fraction(mantissa), exponent),
            None => rendered,
        };
    }

    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (5 - magnitude).clamp(0, 15) as usize;
    trim_fraction(&format!("{:.*}", decimals, value)).to_string()
}

fn trim_fraction(rendered: &str) -> &str {
    if rendered.contains('.') {
        rendered.trim_end_matches('0').trim_end_matches('.')
    } else {
        rendered
    }
}

const PRIME_KEYWORDS: &[&str] = &["prime number", "primes", "prime from", "prime between"];

pub fn is_prime_query(text: &str) -> bool {
    let lowered = text.to_lowercase();
    PRIME_KEYWORDS
        .iter()
        .any(|kw| lowered.contains(kw))
}

/// Outcome of a prime listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimeListing {
    pub start: u64,
    pub end: u64,
    pub primes: Vec<u64>,
    /// The requested upper bound exceeded [`PRIME_RANGE_CAP`].
    pub capped: bool,
}

/// Reads the range from a prime query. Two numbers give the bounds, one
/// number is the upper bound, none defaults to 1..=100.
pub fn prime_range(text: &str) -> (u64, u64) {
    let numbers: Vec<u64> = NUMBERS
        .find_iter(text)
        .map(|m| m.as_str().parse::<u64>().unwrap_or(u64::MAX))
        .collect();

    match numbers.as_slice() {
        [a, b, ..] => (*a.min(b), *a.max(b)),
        [n] => (if *n > 10 { 1 } else { 2 }, *n),
        [] => (1, 100),
    }
}

/// Primes in `start..=end` by the sieve of Eratosthenes.
pub fn primes_between(start: u64, end: u64) -> PrimeListing {
    let capped = end > PRIME_RANGE_CAP;
    let end = end.min(PRIME_RANGE_CAP);
    let start = start.min(end);

    if end < 2 {
        return PrimeListing {
            start,
            end,
            primes: Vec::new(),
            capped,
        };
    }

    let limit = end as usize;
    let mut sieve = vec![true; limit + 1];
    sieve[0] = false;
    sieve[1] = false;

    let mut i = 2;
    while i * i <= limit {
        if sieve[i] {
            let mut j = i * i;
            while j <= limit {
                sieve[j] = false;
                j += i;
            }
        }
        i += 1;
    }

    let primes = (start.max(2) as usize..=limit)
        .filter(|&n| sieve[n])
        .map(|n| n as u64)
        .collect();

    PrimeListing {
        start,
        end,
        primes,
        capped,
    }
}

/// Answers a math-tagged message locally, or `None` to defer to providers.
pub fn answer(text: &str) -> Option<String> {
    if is_prime_query(text) {
        let (start, end) = prime_range(text);
        let listing = primes_between(start, end);
        return Some(render_primes(&listing));
    }

    let expr = extract_expression(text)?;
    match evaluate(&expr) {
        Ok(value) => Some(format!("🧮 {} = **{}**", expr, format_number(value))),
        Err(e) => {
            tracing::debug!(expression = %expr, error = %e, "Deferring math to providers");
            None
        }
    }
}

fn render_primes(listing: &PrimeListing) -> String {
    let mut out = String::new();

    if listing.primes.is_empty() {
        out.push_str(&format!(
            "No prime numbers found between {} and {}.",
            listing.start, listing.end
        ));
    } else {
        let joined = listing
            .primes
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            "🔢 **Prime numbers from {} to {}:**\n\n{}\n\n📊 **Total:** {} primes",
            listing.start,
            listing.end,
            joined,
            listing.primes.len()
        ));
    }

    if listing.capped {
        out.push_str(&format!(
            "\n\n(Ranges are limited to {}; the upper bound was reduced.)",
            PRIME_RANGE_CAP
        ));
    }

    out
}
