//! Text form of paths and elements.
//!
//! ```text
//! path    := element ("/" element)*
//! element := name? ("(" param ("," param)* ")")? (":" type)?
//! param   := type ("=" arg)?
//! ```
//!
//! `\` escapes the next character anywhere. Arguments may be quoted; the
//! printer always quotes them. A lone `/` is the root path.

use crate::{Element, Error, Path, Result, TypeDescriptor};

const SPECIAL: [char; 8] = ['\\', '/', '(', ')', ':', '=', ',', '"'];

/// Escape every delimiter in a name.
pub(crate) fn escape_into(s: &str, out: &mut String) {
    for c in s.chars() {
        if SPECIAL.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
}

/// Escape a type name; commas stay bare since they only appear inside `<>`.
pub(crate) fn escape_type_into(s: &str, out: &mut String) {
    for c in s.chars() {
        if c != ',' && SPECIAL.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
}

pub(crate) fn quote_into(s: &str, out: &mut String) {
    out.push('"');
    escape_into(s, out);
    out.push('"');
}

/// Parse the text form of a path.
pub(crate) fn parse_path(input: &str) -> Result<Path> {
    if input.is_empty() {
        return Err(Error::parse(input, 0, "empty path"));
    }
    if input == "/" {
        return Ok(Path::root());
    }

    let segments = split_segments(input);
    let last = segments.len() - 1;
    let mut elements = Vec::with_capacity(segments.len());
    for (k, (offset, segment)) in segments.into_iter().enumerate() {
        if segment.is_empty() {
            if k == 0 {
                elements.push(Element::root());
                continue;
            }
            return Err(Error::parse(input, offset, "empty element"));
        }
        let element = ElementParser::new(input, segment, offset).parse()?;
        if element.is_root() && k > 0 {
            return Err(Error::parse(input, offset, "only the first element may be the root"));
        }
        if k == last && element.ty().is_none() {
            return Err(Error::parse(
                input,
                input.len(),
                "the last element must declare a type",
            ));
        }
        elements.push(element);
    }
    Path::of_elements(elements)
}

/// Parse the text form of a single element.
pub(crate) fn parse_element(input: &str) -> Result<Element> {
    if input.is_empty() {
        return Ok(Element::root());
    }
    ElementParser::new(input, input, 0).parse()
}

/// Split on `/` that is neither escaped nor inside a parenthetical.
fn split_segments(input: &str) -> Vec<(usize, &str)> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut quoted = false;
    let mut chars = input.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' if depth > 0 => quoted = !quoted,
            '(' if !quoted => depth += 1,
            ')' if !quoted && depth > 0 => depth -= 1,
            '/' if !quoted && depth == 0 => {
                segments.push((start, &input[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push((start, &input[start..]));
    segments
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Name,
    Arguments,
    Type,
}

struct ElementParser<'a> {
    input: &'a str,
    segment: &'a str,
    offset: usize,
    state: State,
    buf: String,
    name: String,
    parameters: Option<Vec<TypeDescriptor>>,
    arguments: Vec<Option<String>>,
    /// Column where the text currently in `buf` started.
    start: usize,
    open_paren: usize,
    close_paren: usize,
    closed: bool,
    in_argument: bool,
    quoted: bool,
    was_quoted: bool,
    angle_depth: usize,
}

impl<'a> ElementParser<'a> {
    fn new(input: &'a str, segment: &'a str, offset: usize) -> Self {
        Self {
            input,
            segment,
            offset,
            state: State::Name,
            buf: String::new(),
            name: String::new(),
            parameters: None,
            arguments: Vec::new(),
            start: 0,
            open_paren: 0,
            close_paren: 0,
            closed: false,
            in_argument: false,
            quoted: false,
            was_quoted: false,
            angle_depth: 0,
        }
    }

    fn error(&self, column: usize, message: impl Into<String>) -> Error {
        Error::parse(self.input, self.offset + column, message)
    }

    fn stray(&self, column: usize, c: char) -> Error {
        self.error(column, format!("unexpected {c:?}"))
    }

    fn parse(mut self) -> Result<Element> {
        let mut chars = self.segment.char_indices();
        while let Some((i, c)) = chars.next() {
            if c == '\\' {
                if self.closed || self.was_quoted {
                    return Err(self.stray(i, c));
                }
                match chars.next() {
                    Some((_, escaped)) => self.buf.push(escaped),
                    None => return Err(self.error(i, "trailing escape")),
                }
                continue;
            }
            match self.state {
                State::Name => self.name_char(i, c)?,
                State::Arguments => self.arguments_char(i, c)?,
                State::Type => self.type_char(i, c)?,
            }
        }

        match self.state {
            State::Name => self.name = std::mem::take(&mut self.buf),
            State::Arguments if !self.closed => {
                return Err(self.error(self.open_paren, "unterminated '('"));
            }
            State::Arguments => {}
            State::Type => {}
        }

        let ty = if self.state == State::Type {
            let text = std::mem::take(&mut self.buf);
            Some(self.parse_type(&text, self.start)?)
        } else {
            None
        };

        let arguments = if self.arguments.iter().all(Option::is_some) && !self.arguments.is_empty() {
            Some(self.arguments.iter().flatten().cloned().collect())
        } else if self.arguments.iter().all(Option::is_none) {
            None
        } else {
            return Err(self.error(
                self.close_paren,
                "either every parameter or none may carry an argument",
            ));
        };

        Element::new(std::mem::take(&mut self.name), ty, self.parameters.take(), arguments)
            .map_err(|e| self.error(0, e.to_string()))
    }

    fn name_char(&mut self, i: usize, c: char) -> Result<()> {
        match c {
            '(' => {
                self.name = std::mem::take(&mut self.buf);
                self.parameters = Some(Vec::new());
                self.state = State::Arguments;
                self.open_paren = i;
                self.start = i + 1;
            }
            ':' => {
                self.name = std::mem::take(&mut self.buf);
                self.state = State::Type;
                self.start = i + 1;
            }
            ')' | '/' => return Err(self.stray(i, c)),
            _ => self.buf.push(c),
        }
        Ok(())
    }

    fn arguments_char(&mut self, i: usize, c: char) -> Result<()> {
        if self.closed {
            return match c {
                ':' => {
                    self.state = State::Type;
                    self.start = i + 1;
                    Ok(())
                }
                _ => Err(self.error(i, format!("expected ':' after ')', found {c:?}"))),
            };
        }

        if self.quoted {
            if c == '"' {
                self.quoted = false;
                self.was_quoted = true;
            } else {
                self.buf.push(c);
            }
            return Ok(());
        }

        if self.in_argument {
            match c {
                '"' if self.buf.is_empty() && !self.was_quoted => self.quoted = true,
                ',' => {
                    self.finish_argument();
                    self.start = i + 1;
                }
                ')' => {
                    self.finish_argument();
                    self.close(i);
                }
                _ if self.was_quoted => {
                    return Err(self.error(i, format!("unexpected {c:?} after closing quote")));
                }
                '(' | '=' | '"' => return Err(self.stray(i, c)),
                _ => self.buf.push(c),
            }
            return Ok(());
        }

        match c {
            '<' => {
                self.angle_depth += 1;
                self.buf.push(c);
            }
            '>' if self.angle_depth > 0 => {
                self.angle_depth -= 1;
                self.buf.push(c);
            }
            ',' if self.angle_depth > 0 => self.buf.push(c),
            ',' => {
                self.finish_parameter(i)?;
                self.arguments.push(None);
                self.start = i + 1;
            }
            '=' if self.angle_depth == 0 => {
                self.finish_parameter(i)?;
                self.arguments.push(None);
                self.in_argument = true;
                self.start = i + 1;
            }
            ')' if self.angle_depth == 0 => {
                let empty_list = self.buf.trim().is_empty()
                    && self.parameters.as_ref().is_some_and(Vec::is_empty);
                if !empty_list {
                    self.finish_parameter(i)?;
                    self.arguments.push(None);
                }
                self.close(i);
            }
            '(' | ')' | ':' | '"' | '=' | '>' => return Err(self.stray(i, c)),
            _ => self.buf.push(c),
        }
        Ok(())
    }

    fn type_char(&mut self, i: usize, c: char) -> Result<()> {
        match c {
            '<' => self.angle_depth += 1,
            '>' if self.angle_depth > 0 => self.angle_depth -= 1,
            ',' if self.angle_depth > 0 => {}
            '(' | ')' | ':' | '=' | '"' | ',' | '>' => return Err(self.stray(i, c)),
            _ => {}
        }
        self.buf.push(c);
        Ok(())
    }

    fn close(&mut self, i: usize) {
        self.closed = true;
        self.close_paren = i;
        self.in_argument = false;
        self.was_quoted = false;
    }

    fn finish_parameter(&mut self, i: usize) -> Result<()> {
        let text = std::mem::take(&mut self.buf);
        if text.trim().is_empty() {
            return Err(self.error(i, "expected a parameter type"));
        }
        let parameter = self.parse_type(&text, self.start)?;
        if let Some(parameters) = self.parameters.as_mut() {
            parameters.push(parameter);
        }
        Ok(())
    }

    fn finish_argument(&mut self) {
        let argument = std::mem::take(&mut self.buf);
        if let Some(slot) = self.arguments.last_mut() {
            *slot = Some(argument);
        }
        self.in_argument = false;
        self.was_quoted = false;
    }

    fn parse_type(&self, text: &str, start: usize) -> Result<TypeDescriptor> {
        text.trim().parse::<TypeDescriptor>().map_err(|e| match e {
            Error::Parse {
                column, message, ..
            } => self.error(start + column, message),
            other => self.error(start, other.to_string()),
        })
    }
}
