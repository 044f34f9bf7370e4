//! Low-level emission helpers shared by the frontmatter and template passes

use crate::style::StyleAdapter;

const INDENT: &str = "  ";

/// Line-oriented source buffer with a fixed two-space indent
#[derive(Debug, Default)]
pub(crate) struct SourceWriter {
    out: String,
    depth: usize,
}

impl SourceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: &str) {
        if text.is_empty() {
            self.out.push('\n');
            return;
        }
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Emit an opening line and indent what follows.
    pub fn open(&mut self, text: &str) {
        self.line(text);
        self.depth += 1;
    }

    pub fn close(&mut self, text: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Icon components in order of first use; drives the single import line.
#[derive(Debug, Default)]
pub(crate) struct IconImports {
    order: Vec<String>,
}

impl IconImports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a use of `name` and hand it back for inline emission.
    pub fn use_icon<'a>(&mut self, name: &'a str) -> &'a str {
        if !self.order.iter().any(|known| known == name) {
            self.order.push(name.to_string());
        }
        name
    }

    pub fn import_line(&self) -> Option<String> {
        if self.order.is_empty() {
            return None;
        }
        Some(format!("import {{ {} }} from 'lucide-astro';", self.order.join(", ")))
    }
}

/// Resolve a style token and make it safe inside a double-quoted attribute.
pub(crate) fn class_attr(adapter: &dyn StyleAdapter, token: &str) -> String {
    escape_attr(&adapter.resolve(token))
}

/// Same as [`class_attr`] with fixed utility classes appended.
pub(crate) fn class_attr_with(adapter: &dyn StyleAdapter, token: &str, extra: &str) -> String {
    let resolved = adapter.resolve(token);
    if resolved.trim().is_empty() {
        escape_attr(extra)
    } else {
        escape_attr(&format!("{} {}", resolved, extra))
    }
}

pub(crate) fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// JavaScript string literal with JSON escaping rules.
///
/// `</` is split so a constant can never close an enclosing `<script>`.
/// U+2028 and U+2029 are escaped as well.
pub(crate) fn js_string(value: &str) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| String::from("\"\""))
        .replace("</", "<\\/")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}
