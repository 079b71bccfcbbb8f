//! Rendered page content
//!
//! Pages may hand the router either ready-made markup or a small element
//! tree. The viewport decides how to present either form.

use serde::{Deserialize, Serialize};

/// Content produced by [`Page::render`](super::Page::render)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PageContent {
    /// Pre-rendered markup string
    Markup(String),
    /// Constructed element tree
    Element(ContentNode),
}

impl PageContent {
    /// Flatten the content into a markup string
    pub fn to_markup(&self) -> String {
        match self {
            PageContent::Markup(markup) => markup.clone(),
            PageContent::Element(node) => node.to_markup(),
        }
    }

    /// Plain text of the content with all tags stripped
    pub fn text(&self) -> String {
        match self {
            PageContent::Markup(markup) => strip_tags(markup),
            PageContent::Element(node) => node.text(),
        }
    }
}

impl From<String> for PageContent {
    fn from(markup: String) -> Self {
        PageContent::Markup(markup)
    }
}

impl From<&str> for PageContent {
    fn from(markup: &str) -> Self {
        PageContent::Markup(markup.to_string())
    }
}

impl From<ContentNode> for PageContent {
    fn from(node: ContentNode) -> Self {
        PageContent::Element(node)
    }
}

/// A minimal element tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentNode {
    pub tag: String,
    pub class: Option<String>,
    pub text: Option<String>,
    pub children: Vec<ContentNode>,
}

impl ContentNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            class: None,
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: ContentNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = ContentNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }

    fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if let Some(class) = &self.class {
            out.push_str(&format!(" class=\"{}\"", class));
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.write_markup(out);
        }
        out.push_str(&format!("</{}>", self.tag));
    }

    /// Concatenated text of this node and its descendants, one line per node
    pub fn text(&self) -> String {
        let mut lines = Vec::new();
        self.collect_text(&mut lines);
        lines.join("\n")
    }

    fn collect_text(&self, lines: &mut Vec<String>) {
        if let Some(text) = &self.text {
            lines.push(text.clone());
        }
        for child in &self.children {
            child.collect_text(lines);
        }
    }
}

fn strip_tags(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut in_tag = false;
    for ch in markup.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_markup() {
        let node = ContentNode::new("section")
            .with_class("scanner")
            .child(ContentNode::new("h1").with_text("Scanner"))
            .child(ContentNode::new("p").with_text("3 breakouts"));

        assert_eq!(
            node.to_markup(),
            "<section class=\"scanner\"><h1>Scanner</h1><p>3 breakouts</p></section>"
        );
        assert_eq!(node.text(), "Scanner\n3 breakouts");
    }

    #[test]
    fn test_markup_text_strips_tags() {
        let content = PageContent::from("<div><b>XAU</b>/USD</div>");
        assert_eq!(content.text(), "XAU/USD");
        assert_eq!(content.to_markup(), "<div><b>XAU</b>/USD</div>");
    }
}
