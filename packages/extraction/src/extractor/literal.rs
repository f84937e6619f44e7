//! Parser for JavaScript data literals.
//!
//! Accepts the subset of JavaScript that can only build plain data:
//! objects, arrays, strings, numbers, `true`/`false`/`null`, plus the
//! `undefined`/`NaN`/`Infinity` keywords. There are no identifiers as
//! values, no calls and no operators, so nothing on the page can run.
//!
//! Values map onto `serde_json::Value` the way `JSON.stringify` would see
//! them: `undefined` members disappear, non-finite numbers become `null`.

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

use crate::error::{LiteralError, LiteralErrorKind, LiteralResult};

/// Parse `input` as exactly one literal (surrounding whitespace and
/// comments allowed).
pub fn parse_literal(input: &str, max_depth: usize) -> LiteralResult<Value> {
    let mut parser = Parser::new(input, max_depth);
    let value = parser.parse_value()?.unwrap_or(Value::Null);
    parser.skip_trivia()?;
    if parser.peek().is_some() {
        return Err(parser.error(LiteralErrorKind::TrailingCharacters));
    }
    Ok(value)
}

/// Parse one literal from the start of `input`, ignoring whatever follows.
///
/// Returns the value and the number of bytes consumed.
pub fn parse_literal_prefix(input: &str, max_depth: usize) -> LiteralResult<(Value, usize)> {
    let mut parser = Parser::new(input, max_depth);
    let value = parser.parse_value()?.unwrap_or(Value::Null);
    Ok((value, parser.pos))
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, max_depth: usize) -> Self {
        Self {
            src,
            pos: 0,
            depth: 0,
            max_depth,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.src[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn error(&self, kind: LiteralErrorKind) -> LiteralError {
        let consumed = &self.src[..self.pos];
        let line = consumed.matches('\n').count() + 1;
        let line_start = consumed.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = consumed[line_start..].chars().count() + 1;
        LiteralError { kind, line, column }
    }

    fn unexpected(&self) -> LiteralError {
        match self.peek() {
            Some(c) => self.error(LiteralErrorKind::UnexpectedChar(c)),
            None => self.error(LiteralErrorKind::UnexpectedEnd),
        }
    }

    fn enter(&mut self) -> LiteralResult<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.error(LiteralErrorKind::TooDeep(self.max_depth)));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) -> LiteralResult<()> {
        loop {
            match (self.peek(), self.peek_second()) {
                (Some(c), _) if c.is_whitespace() || c == '\u{FEFF}' => {
                    self.bump();
                }
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                (Some('/'), Some('*')) => {
                    let start = self.pos;
                    match self.src[self.pos + 2..].find("*/") {
                        Some(end) => self.pos += 2 + end + 2,
                        None => {
                            self.pos = start;
                            return Err(self.error(LiteralErrorKind::UnterminatedComment));
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// `None` stands for `undefined`.
    fn parse_value(&mut self) -> LiteralResult<Option<Value>> {
        self.skip_trivia()?;
        match self.peek() {
            None => Err(self.error(LiteralErrorKind::UnexpectedEnd)),
            Some('{') => self.parse_object().map(Some),
            Some('[') => self.parse_array().map(Some),
            Some(q @ ('"' | '\'')) => self.parse_string(q).map(|s| Some(Value::String(s))),
            Some('`') => self.parse_template().map(|s| Some(Value::String(s))),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => {
                self.parse_number().map(Some)
            }
            Some(c) if is_ident_start(c) => self.parse_keyword(),
            Some(c) => Err(self.error(LiteralErrorKind::UnexpectedChar(c))),
        }
    }

    fn parse_keyword(&mut self) -> LiteralResult<Option<Value>> {
        let start = self.pos;
        let word = self.parse_identifier();
        match word {
            "true" => Ok(Some(Value::Bool(true))),
            "false" => Ok(Some(Value::Bool(false))),
            "null" => Ok(Some(Value::Null)),
            "undefined" => Ok(None),
            "NaN" | "Infinity" => Ok(Some(Value::Null)),
            other => {
                let word = other.to_string();
                self.pos = start;
                Err(self.error(LiteralErrorKind::UnsupportedExpression(word)))
            }
        }
    }

    fn parse_identifier(&mut self) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.bump();
            } else {
                break;
            }
        }
        &src[start..self.pos]
    }

    fn parse_object(&mut self) -> LiteralResult<Value> {
        self.enter()?;
        self.bump();

        // Last assignment wins but the key keeps its first position.
        let mut members: IndexMap<String, Option<Value>> = IndexMap::new();
        loop {
            self.skip_trivia()?;
            if self.eat('}') {
                break;
            }

            let key = self.parse_key()?;
            self.skip_trivia()?;
            if !self.eat(':') {
                return Err(self.unexpected());
            }
            let value = self.parse_value()?;
            members.insert(key, value);

            self.skip_trivia()?;
            if self.eat(',') {
                continue;
            }
            if self.eat('}') {
                break;
            }
            return Err(self.unexpected());
        }

        self.leave();
        let map: Map<String, Value> = members
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect();
        Ok(Value::Object(map))
    }

    fn parse_key(&mut self) -> LiteralResult<String> {
        match self.peek() {
            Some(q @ ('"' | '\'')) => self.parse_string(q),
            Some(c) if c.is_ascii_digit() || c == '.' => match self.parse_number()? {
                Value::Number(n) => Ok(n.to_string()),
                _ => Ok("Infinity".to_string()),
            },
            Some(c) if is_ident_start(c) => Ok(self.parse_identifier().to_string()),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_array(&mut self) -> LiteralResult<Value> {
        self.enter()?;
        self.bump();

        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.eat(']') {
                break;
            }
            // Hole, as in `[1,,2]`
            if self.eat(',') {
                items.push(Value::Null);
                continue;
            }

            items.push(self.parse_value()?.unwrap_or(Value::Null));

            self.skip_trivia()?;
            if self.eat(',') {
                continue;
            }
            if self.eat(']') {
                break;
            }
            return Err(self.unexpected());
        }

        self.leave();
        Ok(Value::Array(items))
    }

    fn parse_string(&mut self, quote: char) -> LiteralResult<String> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.peek() {
                None | Some('\n') | Some('\r') => {
                    return Err(self.error(LiteralErrorKind::UnterminatedString));
                }
                Some(c) if c == quote => {
                    self.bump();
                    return Ok(out);
                }
                Some('\\') => self.parse_escape(&mut out)?,
                Some(c) => {
                    self.bump();
                    out.push(c);
                }
            }
        }
    }

    fn parse_template(&mut self) -> LiteralResult<String> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err(self.error(LiteralErrorKind::UnterminatedString)),
                Some('`') => {
                    self.bump();
                    return Ok(out);
                }
                Some('$') if self.peek_second() == Some('{') => {
                    return Err(self.error(LiteralErrorKind::TemplateSubstitution));
                }
                Some('\\') => self.parse_escape(&mut out)?,
                Some('\r') => {
                    self.bump();
                    self.eat('\n');
                    out.push('\n');
                }
                Some(c) => {
                    self.bump();
                    out.push(c);
                }
            }
        }
    }

    fn parse_escape(&mut self, out: &mut String) -> LiteralResult<()> {
        let escape_start = self.pos;
        self.bump();
        let c = match self.bump() {
            Some(c) => c,
            None => return Err(self.error(LiteralErrorKind::UnterminatedString)),
        };

        match c {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'v' => out.push('\u{0B}'),
            '0' if !self.peek().is_some_and(|n| n.is_ascii_digit()) => out.push('\0'),
            '1'..='9' | '0' => {
                self.pos = escape_start;
                return Err(self.error(LiteralErrorKind::InvalidEscape));
            }
            'x' => {
                let code = self.read_hex(2, escape_start)?;
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            'u' => {
                let code = self.read_unicode_escape(escape_start)?;
                if (0xD800..=0xDBFF).contains(&code) {
                    // High surrogate: combine with a following low surrogate.
                    let rest = &self.src[self.pos..];
                    if rest.starts_with("\\u") {
                        let save = self.pos;
                        self.pos += 2;
                        let low = self.read_unicode_escape(save)?;
                        if (0xDC00..=0xDFFF).contains(&low) {
                            let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                            out.push(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
                        } else {
                            out.push(char::REPLACEMENT_CHARACTER);
                            out.push(char::from_u32(low).unwrap_or(char::REPLACEMENT_CHARACTER));
                        }
                    } else {
                        out.push(char::REPLACEMENT_CHARACTER);
                    }
                } else {
                    out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
            }
            // Line continuation
            '\n' | '\u{2028}' | '\u{2029}' => {}
            '\r' => {
                self.eat('\n');
            }
            other => out.push(other),
        }
        Ok(())
    }

    fn read_unicode_escape(&mut self, escape_start: usize) -> LiteralResult<u32> {
        if self.eat('{') {
            let start = self.pos;
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.bump();
            }
            let digits = &self.src[start..self.pos];
            if digits.is_empty() || !self.eat('}') {
                self.pos = escape_start;
                return Err(self.error(LiteralErrorKind::InvalidEscape));
            }
            match u32::from_str_radix(digits, 16) {
                Ok(code) if code <= 0x10FFFF => Ok(code),
                _ => {
                    self.pos = escape_start;
                    Err(self.error(LiteralErrorKind::InvalidEscape))
                }
            }
        } else {
            self.read_hex(4, escape_start)
        }
    }

    fn read_hex(&mut self, count: usize, escape_start: usize) -> LiteralResult<u32> {
        let start = self.pos;
        for _ in 0..count {
            match self.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    self.bump();
                }
                _ => {
                    self.pos = escape_start;
                    return Err(self.error(LiteralErrorKind::InvalidEscape));
                }
            }
        }
        u32::from_str_radix(&self.src[start..self.pos], 16).map_err(|_| {
            self.pos = escape_start;
            self.error(LiteralErrorKind::InvalidEscape)
        })
    }

    fn parse_number(&mut self) -> LiteralResult<Value> {
        let start = self.pos;
        let negative = match self.peek() {
            Some('-') => {
                self.bump();
                true
            }
            Some('+') => {
                self.bump();
                false
            }
            _ => false,
        };

        if self.peek().is_some_and(is_ident_start) {
            let word = self.parse_identifier();
            if word == "Infinity" {
                return Ok(Value::Null);
            }
            let word = word.to_string();
            self.pos = start;
            return Err(self.error(LiteralErrorKind::UnsupportedExpression(word)));
        }

        let radix = match (self.peek(), self.peek_second()) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('o' | 'O')) => Some(8),
            (Some('0'), Some('b' | 'B')) => Some(2),
            _ => None,
        };

        let value = match radix {
            Some(radix) => {
                self.pos += 2;
                let digits_start = self.pos;
                while self.peek().is_some_and(|c| c.is_digit(radix) || c == '_') {
                    self.bump();
                }
                let digits: String = self.src[digits_start..self.pos]
                    .chars()
                    .filter(|c| *c != '_')
                    .collect();
                let magnitude = u64::from_str_radix(&digits, radix)
                    .map_err(|_| self.number_error(start))?;
                integer_value(negative, magnitude)
            }
            None => self.parse_decimal(start, negative)?,
        };

        if self.peek().is_some_and(is_ident_continue) {
            return Err(self.number_error(start));
        }
        Ok(value)
    }

    fn parse_decimal(&mut self, start: usize, negative: bool) -> LiteralResult<Value> {
        let digits_start = self.pos;
        let mut saw_digit = false;
        let mut is_float = false;

        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
            saw_digit = true;
            self.bump();
        }
        if self.peek() == Some('.') {
            is_float = true;
            self.bump();
            while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
                saw_digit = true;
                self.bump();
            }
        }
        if !saw_digit {
            return Err(self.number_error(start));
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            let exp_start = self.pos;
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
            if self.pos == exp_start {
                return Err(self.number_error(start));
            }
        }

        let text: String = self.src[digits_start..self.pos]
            .chars()
            .filter(|c| *c != '_')
            .collect();

        if !is_float {
            if let Ok(magnitude) = text.parse::<u64>() {
                return Ok(integer_value(negative, magnitude));
            }
        }

        let magnitude: f64 = text.parse().map_err(|_| self.number_error(start))?;
        let signed = if negative { -magnitude } else { magnitude };
        Ok(float_value(signed))
    }

    fn number_error(&mut self, start: usize) -> LiteralError {
        let mut end = self.pos;
        while let Some(c) = self.src[end..].chars().next() {
            if is_ident_continue(c) || c == '.' {
                end += c.len_utf8();
            } else {
                break;
            }
        }
        let text = self.src[start..end].to_string();
        self.pos = start;
        self.error(LiteralErrorKind::InvalidNumber(text))
    }
}

fn integer_value(negative: bool, magnitude: u64) -> Value {
    if !negative {
        return Value::Number(Number::from(magnitude));
    }
    match i64::try_from(magnitude) {
        Ok(v) => Value::Number(Number::from(-v)),
        Err(_) if magnitude == i64::MIN.unsigned_abs() => Value::Number(Number::from(i64::MIN)),
        Err(_) => float_value(-(magnitude as f64)),
    }
}

fn float_value(v: f64) -> Value {
    // Whole floats such as `1.0` read back as integers, like JavaScript.
    if v.fract() == 0.0 && v.abs() < 9_007_199_254_740_992.0 && !(v == 0.0 && v.is_sign_negative()) {
        return Value::Number(Number::from(v as i64));
    }
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
