//! Minimal XML element tree for the engine input decks.

use std::fmt::Write;

#[derive(Debug, Clone)]
pub(crate) struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    pub(crate) fn new(name: &str) -> Self {
        Element {
            name: name.to_string(),
            attrs: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn attr(mut self, key: &str, value: impl ToString) -> Self {
        self.attrs.push((key.to_string(), value.to_string()));
        self
    }

    pub(crate) fn text(mut self, text: impl ToString) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub(crate) fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub(crate) fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Text-only child, e.g. `<batches>210</batches>`.
    pub(crate) fn leaf(name: &str, text: impl ToString) -> Self {
        Element::new(name).text(text)
    }

    pub(crate) fn to_document(&self) -> String {
        let mut out = String::from("<?xml version='1.0' encoding='utf-8'?>\n");
        self.render(&mut out, 0);
        out
    }

    fn render(&self, out: &mut String, depth: usize) {
        let pad = "  ".repeat(depth);
        let _ = write!(out, "{pad}<{}", self.name);
        for (k, v) in &self.attrs {
            let _ = write!(out, " {k}=\"{}\"", escape(v));
        }
        match (&self.text, self.children.is_empty()) {
            (None, true) => out.push_str(" />\n"),
            (Some(text), true) => {
                let _ = writeln!(out, ">{}</{}>", escape(text), self.name);
            }
            (text, false) => {
                out.push_str(">\n");
                if let Some(text) = text {
                    let _ = writeln!(out, "{pad}  {}", escape(text));
                }
                for child in &self.children {
                    child.render(out, depth + 1);
                }
                let _ = writeln!(out, "{pad}</{}>", self.name);
            }
        }
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Shortest round-trippable float text, always with a decimal point.
pub(crate) fn fmt_f64(v: f64) -> String {
    let s = format!("{v:?}");
    if s.contains('.') || s.contains('e') || s.contains("inf") || s.contains("NaN") {
        s
    } else {
        format!("{s}.0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_nested() {
        let doc = Element::new("settings")
            .child(Element::leaf("batches", 210))
            .child(Element::new("source").attr("type", "independent"))
            .to_document();
        assert!(doc.starts_with("<?xml"));
        assert!(doc.contains("  <batches>210</batches>\n"));
        assert!(doc.contains("  <source type=\"independent\" />\n"));
        assert!(doc.trim_end().ends_with("</settings>"));
    }

    #[test]
    fn test_escape_region_operators() {
        let doc = Element::new("cell").attr("region", "1 & \"2\" <3>").to_document();
        assert!(doc.contains("region=\"1 &amp; &quot;2&quot; &lt;3&gt;\""));
    }

    #[test]
    fn test_fmt_f64() {
        assert_eq!(fmt_f64(10.0), "10.0");
        assert_eq!(fmt_f64(-0.5), "-0.5");
        assert_eq!(fmt_f64(1e-12), "1e-12");
    }
}
