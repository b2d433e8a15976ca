//! Line-oriented output buffer shared by all generators.

/// Accumulates generated text one line at a time.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Formatter {
    out: String,
}

impl Formatter {
    /// Creates an empty formatter.
    #[must_use]
    pub const fn new() -> Self {
        Self { out: String::new() }
    }

    /// Appends `text` followed by a newline.
    pub fn line(&mut self, text: impl AsRef<str>) {
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    /// Appends an empty line.
    pub fn empty_line(&mut self) {
        self.out.push('\n');
    }

    /// Appends pre-formatted text verbatim.
    pub fn push_str(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Consumes the formatter and returns the text.
    #[must_use]
    pub fn finish(self) -> String {
        self.out
    }
}

/// Formats its arguments and appends them as one line of a [`Formatter`].
#[macro_export]
macro_rules! fmtln {
    ($fmt:expr, $($arg:tt)*) => {
        $fmt.line(format!($($arg)*))
    };
}

/// Width of a boxed banner comment line.
pub const BANNER_WIDTH: usize = 79;

/// Renders a full-width `//` rule line.
#[must_use]
pub fn banner_rule() -> String {
    "/".repeat(BANNER_WIDTH)
}

/// Renders `text` as a boxed banner line, `// text ... //`.
#[must_use]
pub fn banner_line(text: &str) -> String {
    let inner = BANNER_WIDTH - 6;
    format!("// {text:<inner$} //")
}

/// Escapes `text` for use inside a C string literal.
#[must_use]
pub fn escape_c_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
