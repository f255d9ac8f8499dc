// Template tokenizer using recursive descent

use crate::error::{Result, TemplateError};

use super::token::{Kind, ParsedTemplate, Placeholder, Segment};

pub struct TemplateParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> TemplateParser<'a> {
    pub fn parse(template: &'a str) -> Result<ParsedTemplate> {
        let mut parser = Self {
            input: template,
            pos: 0,
        };
        let segments = parser.parse_segments()?;
        Ok(ParsedTemplate::new(template, segments))
    }

    fn parse_segments(&mut self) -> Result<Vec<Segment>> {
        let mut segments = Vec::new();
        let mut literal_buf = String::new();

        while self.pos < self.input.len() {
            if self.peek_char() == Some('{') {
                // {{ is an escaped brace
                if self.peek_ahead(1) == Some('{') {
                    self.pos += 2;
                    literal_buf.push('{');
                } else {
                    if !literal_buf.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal_buf)));
                    }
                    let token = self.parse_placeholder()?;
                    segments.push(Segment::Placeholder(token));
                }
            } else if self.peek_char() == Some('}') {
                if self.peek_ahead(1) == Some('}') {
                    self.pos += 2;
                    literal_buf.push('}');
                } else {
                    return Err(TemplateError::syntax(self.pos, "unexpected closing brace"));
                }
            } else {
                literal_buf.push(self.consume_char()?);
            }
        }

        if !literal_buf.is_empty() {
            segments.push(Segment::Literal(literal_buf));
        }

        Ok(segments)
    }

    fn parse_placeholder(&mut self) -> Result<Placeholder> {
        self.expect_char('{')?;
        self.skip_whitespace();

        let name = self.parse_name()?;
        self.skip_whitespace();

        let default = if self.peek_char() == Some('=') {
            self.consume_char()?;
            Some(self.take_until(&['|', '}'])?.trim().to_string())
        } else {
            None
        };

        let format = if self.peek_char() == Some('|') {
            self.consume_char()?;
            let start = self.pos;
            let format = self.take_until(&['}'])?.trim().to_string();
            if format.is_empty() {
                return Err(TemplateError::syntax(start, "empty format specifier"));
            }
            Some(format)
        } else {
            None
        };

        self.skip_whitespace();
        self.expect_char('}')?;

        Placeholder::new(Kind::Single, &name, default, format)
    }

    fn parse_name(&mut self) -> Result<String> {
        let mut name = String::new();

        while let Some(ch) = self.peek_char() {
            if ch.is_alphanumeric() || matches!(ch, '_' | '.' | '[' | ']') {
                name.push(self.consume_char()?);
            } else if ch == '=' || ch == '|' || ch == '}' || ch.is_whitespace() {
                break;
            } else {
                return Err(TemplateError::syntax(
                    self.pos,
                    format!("invalid character '{}' in placeholder name", ch),
                ));
            }
        }

        Ok(name)
    }

    /// Consume characters up to (not including) one of `stops`
    fn take_until(&mut self, stops: &[char]) -> Result<&'a str> {
        let input = self.input;
        let start = self.pos;
        loop {
            match self.peek_char() {
                Some(ch) if stops.contains(&ch) => return Ok(&input[start..self.pos]),
                Some('{') => {
                    return Err(TemplateError::syntax(
                        self.pos,
                        "'{' is not allowed inside a placeholder",
                    ))
                }
                Some(_) => {
                    self.consume_char()?;
                }
                None => {
                    return Err(TemplateError::syntax(start, "unterminated placeholder"));
                }
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_ahead(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn consume_char(&mut self) -> Result<char> {
        let ch = self
            .peek_char()
            .ok_or_else(|| TemplateError::syntax(self.pos, "unexpected end of input"))?;
        self.pos += ch.len_utf8();
        Ok(ch)
    }

    fn expect_char(&mut self, expected: char) -> Result<()> {
        match self.peek_char() {
            Some(ch) if ch == expected => {
                self.consume_char()?;
                Ok(())
            }
            Some(ch) => Err(TemplateError::syntax(
                self.pos,
                format!("expected '{}' but found '{}'", expected, ch),
            )),
            None => Err(TemplateError::syntax(
                self.pos,
                format!("expected '{}' but found end of input", expected),
            )),
        }
    }
}
