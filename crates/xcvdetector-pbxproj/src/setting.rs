/// A single `NAME = VALUE;` line from a build settings dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Setting<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

impl<'a> Setting<'a> {
    /// Parse a line, dropping surrounding whitespace and the trailing `;`.
    /// Lines without `=` are not settings.
    pub fn parse(line: &'a str) -> Option<Setting<'a>> {
        let (name, value) = line.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let value = value.trim();
        let value = value.strip_suffix(';').unwrap_or(value).trim_end();
        Some(Setting { name, value })
    }

    /// The value with every double quote removed.
    pub fn unquoted(&self) -> String {
        self.value.replace('"', "")
    }
}
