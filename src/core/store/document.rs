//! Line-preserving model of a sectioned `option = value` file
//!
//! Only the lines that are actually set or removed change when the document
//! is rendered back; comments, blank lines, continuation lines and unrelated
//! options come out byte-for-byte as they went in.

/// One physical line of the file
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// `[name]`
    Section { name: String, raw: String },

    /// `option = value`
    Entry {
        option: String,
        value: String,
        raw: String,
    },

    /// Comments, blank lines, continuations and anything unparseable
    Other(String),
}

impl Line {
    fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            return Line::Other(raw.to_string());
        }

        if trimmed.starts_with('[') && trimmed.ends_with(']') && trimmed.len() >= 2 {
            return Line::Section {
                name: trimmed[1..trimmed.len() - 1].trim().to_string(),
                raw: raw.to_string(),
            };
        }

        // Indented lines continue the previous value
        if raw.starts_with([' ', '\t']) {
            return Line::Other(raw.to_string());
        }

        match raw.split_once('=') {
            Some((option, value)) if !option.trim().is_empty() => Line::Entry {
                option: option.trim().to_string(),
                value: value.trim().to_string(),
                raw: raw.to_string(),
            },
            _ => Line::Other(raw.to_string()),
        }
    }

    fn raw(&self) -> &str {
        match self {
            Line::Section { raw, .. } | Line::Entry { raw, .. } | Line::Other(raw) => raw,
        }
    }

    fn entry(option: &str, value: &str) -> Self {
        Line::Entry {
            option: option.to_string(),
            value: value.to_string(),
            raw: format!("{option} = {value}"),
        }
    }
}

/// Parsed config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniDocument {
    lines: Vec<Line>,
    trailing_newline: bool,
}

impl Default for IniDocument {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            trailing_newline: true,
        }
    }
}

impl IniDocument {
    /// Parses file contents
    ///
    /// Parsing never fails: lines that are not sections or entries are kept
    /// verbatim and ignored for lookups. Entries before the first section
    /// header are not addressable.
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }

        Self {
            lines: text.lines().map(Line::parse).collect(),
            trailing_newline: text.ends_with('\n'),
        }
    }

    /// Value of `option` in the first `[section]` that defines it
    pub fn get(&self, section: &str, option: &str) -> Option<&str> {
        self.position(section, option).and_then(|i| match &self.lines[i] {
            Line::Entry { value, .. } => Some(value.as_str()),
            _ => None,
        })
    }

    /// Sets `option` in `[section]`, creating either as needed
    ///
    /// Returns `false` when the stored value already matched. `value` must
    /// be a single line without surrounding whitespace to read back equal.
    pub fn set(&mut self, section: &str, option: &str, value: &str) -> bool {
        if let Some(index) = self.position(section, option) {
            if let Line::Entry { value: current, .. } = &self.lines[index] {
                if current == value {
                    return false;
                }
            }
            self.lines[index] = Line::entry(option, value);
            return true;
        }

        match self.insertion_point(section) {
            Some(index) => self.lines.insert(index, Line::entry(option, value)),
            None => {
                if self
                    .lines
                    .last()
                    .is_some_and(|line| !line.raw().trim().is_empty())
                {
                    self.lines.push(Line::Other(String::new()));
                }
                self.lines.push(Line::Section {
                    name: section.to_string(),
                    raw: format!("[{section}]"),
                });
                self.lines.push(Line::entry(option, value));
            }
        }

        true
    }

    /// Removes every definition of `option` in `[section]`
    ///
    /// Returns `false` when there was nothing to remove.
    pub fn remove(&mut self, section: &str, option: &str) -> bool {
        let mut current: Option<String> = None;
        let before = self.lines.len();

        self.lines.retain(|line| match line {
            Line::Section { name, .. } => {
                current = Some(name.clone());
                true
            }
            Line::Entry { option: o, .. } => {
                !(current.as_deref() == Some(section) && o == option)
            }
            Line::Other(_) => true,
        });

        self.lines.len() != before
    }

    /// Renders the document back to text
    pub fn render(&self) -> String {
        let mut out = self
            .lines
            .iter()
            .map(Line::raw)
            .collect::<Vec<_>>()
            .join("\n");
        if self.trailing_newline && !self.lines.is_empty() {
            out.push('\n');
        }
        out
    }

    fn position(&self, section: &str, option: &str) -> Option<usize> {
        let mut current: Option<&str> = None;
        for (index, line) in self.lines.iter().enumerate() {
            match line {
                Line::Section { name, .. } => current = Some(name.as_str()),
                Line::Entry { option: o, .. } if current == Some(section) && o == option => {
                    return Some(index);
                }
                _ => {}
            }
        }
        None
    }

    /// Index just after the last entry of the first `[section]` block
    fn insertion_point(&self, section: &str) -> Option<usize> {
        let header = self.lines.iter().position(
            |line| matches!(line, Line::Section { name, .. } if name == section),
        )?;

        let mut insert_at = header + 1;
        for (index, line) in self.lines.iter().enumerate().skip(header + 1) {
            match line {
                Line::Section { .. } => break,
                Line::Entry { .. } => insert_at = index + 1,
                Line::Other(raw) if raw.starts_with([' ', '\t']) && insert_at == index => {
                    insert_at = index + 1;
                }
                Line::Other(_) => {}
            }
        }
        Some(insert_at)
    }
}
