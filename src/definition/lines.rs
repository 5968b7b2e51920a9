//! Method and property body lines

/// One line of a generated body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Code { text: String, indent: usize },
    Comment { text: String, indent: usize },
    Todo { text: String, indent: usize },
    Blank,
}

impl Line {
    pub fn text(&self) -> &str {
        match self {
            Line::Code { text, .. } | Line::Comment { text, .. } | Line::Todo { text, .. } => text,
            Line::Blank => "",
        }
    }

    pub fn indent(&self) -> usize {
        match self {
            Line::Code { indent, .. } | Line::Comment { indent, .. } | Line::Todo { indent, .. } => {
                *indent
            }
            Line::Blank => 0,
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, Line::Code { .. })
    }
}

/// Builds a body while tracking the current indentation depth.
///
/// `open` and `close` emit braces and move the depth, so nested blocks read
/// the same way as the source they produce.
#[derive(Debug, Default)]
pub struct Lines {
    lines: Vec<Line>,
    indent: usize,
}

impl Lines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn code(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push(Line::Code {
            text: text.into(),
            indent: self.indent,
        });
        self
    }

    pub fn comment(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push(Line::Comment {
            text: text.into(),
            indent: self.indent,
        });
        self
    }

    pub fn todo(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push(Line::Todo {
            text: text.into(),
            indent: self.indent,
        });
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(Line::Blank);
        self
    }

    /// Emit `{` and indent
    pub fn open(&mut self) -> &mut Self {
        self.code("{");
        self.indent += 1;
        self
    }

    /// Dedent and emit `}`
    pub fn close(&mut self) -> &mut Self {
        self.indent = self.indent.saturating_sub(1);
        self.code("}")
    }

    /// Dedent and emit `}` followed by `suffix`, as in `};` or `});`
    pub fn close_with(&mut self, suffix: &str) -> &mut Self {
        self.indent = self.indent.saturating_sub(1);
        self.code(format!("}}{}", suffix))
    }

    /// Emit a single statement one level deeper, for brace-less `if` bodies
    pub fn nested(&mut self, text: impl Into<String>) -> &mut Self {
        self.indent += 1;
        self.code(text);
        self.indent -= 1;
        self
    }

    pub fn build(&mut self) -> Vec<Line> {
        std::mem::take(&mut self.lines)
    }
}
