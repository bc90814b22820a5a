//! Line codec for the backslash-escaped CSV dialect.
//!
//! # Dialect
//! - One record per line, cells separated by `,`.
//! - `\t`, `\n`, `\r`, `\f` decode to TAB, LF, CR and FF; any other `\X`
//!   decodes to `X` (so `\"` is a quote and `\\` a backslash).
//! - A `"` opens or closes a quoted region in which commas are literal. The
//!   quote characters themselves are not part of the cell text.
//! - On output a cell is quoted if and only if its raw value contains a comma.
//!
//! This is not RFC 4180: quotes are never doubled, and a record never spans
//! more than one line.

/// One decoded cell of a CSV line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    /// Decoded cell text.
    pub text: String,
    /// Whether any part of the cell was quote-delimited in the source.
    pub was_quoted: bool,
}

impl Cell {
    /// Build a cell from decoded text.
    #[must_use]
    pub fn new(text: impl Into<String>, was_quoted: bool) -> Self {
        Self {
            text: text.into(),
            was_quoted,
        }
    }
}

#[derive(Clone, Copy)]
enum State {
    Plain,
    Quoted,
    Escaped { quoted: bool },
}

/// Split one line into cells.
///
/// The line must not contain its terminator. A line without commas yields
/// exactly one cell, and a trailing comma yields a trailing empty cell.
///
/// # Examples
/// ```
/// use slashcsv::cell::split_line;
///
/// let cells = split_line(r#"O\"Brien,"a,b",\t"#);
/// let texts: Vec<_> = cells.iter().map(|c| c.text.as_str()).collect();
/// assert_eq!(texts, ["O\"Brien", "a,b", "\t"]);
/// assert!(cells[1].was_quoted);
/// ```
#[must_use]
pub fn split_line(line: &str) -> Vec<Cell> {
    let mut cells = Vec::new();
    let mut text = String::new();
    let mut was_quoted = false;
    let mut state = State::Plain;

    for c in line.chars() {
        state = match state {
            State::Escaped { quoted } => {
                text.push(unescape(c));
                if quoted { State::Quoted } else { State::Plain }
            }
            State::Quoted => match c {
                '\\' => State::Escaped { quoted: true },
                '"' => State::Plain,
                _ => {
                    text.push(c);
                    State::Quoted
                }
            },
            State::Plain => match c {
                '\\' => State::Escaped { quoted: false },
                '"' => {
                    was_quoted = true;
                    State::Quoted
                }
                ',' => {
                    cells.push(Cell::new(std::mem::take(&mut text), was_quoted));
                    was_quoted = false;
                    State::Plain
                }
                _ => {
                    text.push(c);
                    State::Plain
                }
            },
        };
    }

    cells.push(Cell::new(text, was_quoted));
    cells
}

fn unescape(c: char) -> char {
    match c {
        't' => '\t',
        'n' => '\n',
        'r' => '\r',
        'f' => '\x0C',
        _ => c,
    }
}

/// Encode one value as cell text.
///
/// Control characters, quotes and backslashes are escaped. The result is
/// wrapped in quotes only when `value` contains a comma.
///
/// # Examples
/// ```
/// use slashcsv::cell::format_cell;
///
/// assert_eq!(format_cell("a\nb"), r"a\nb");
/// assert_eq!(format_cell("say \"hi\", bye"), r#""say \"hi\", bye""#);
/// ```
#[must_use]
pub fn format_cell(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    let mut has_comma = false;

    for c in value.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\x0C' => out.push_str("\\f"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            ',' => {
                has_comma = true;
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    if has_comma {
        out.insert(0, '"');
        out.push('"');
    }
    out
}

/// Encode values and join them into one line, without a terminator.
#[must_use]
pub fn format_line<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut line = String::new();
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        line.push_str(&format_cell(value.as_ref()));
    }
    line
}
