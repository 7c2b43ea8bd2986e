//! XML formatting and attribute reading helpers

use crate::error::DeviceError;
use quick_xml::escape::escape;
use quick_xml::events::BytesStart;
use std::collections::HashMap;
use std::fmt::Display;

/// Small builder for the device fragments libvirt consumes.
///
/// Attributes keep insertion order. An element without children renders
/// self-closed; children are indented by two spaces per level.
#[derive(Debug, Clone)]
pub struct Element {
    name: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, key: &'static str, value: impl Display) -> Self {
        self.attrs.push((key, escape(&value.to_string()).into_owned()));
        self
    }

    /// Add the attribute only when the value is present and non-empty
    pub fn attr_opt(self, key: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.attr(key, v),
            _ => self,
        }
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out, 0);
        out
    }

    fn write_to(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        out.push_str(&indent);
        out.push('<');
        out.push_str(self.name);
        for (k, v) in &self.attrs {
            out.push_str(&format!(" {k}='{v}'"));
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for c in &self.children {
            out.push('\n');
            c.write_to(out, depth + 1);
        }
        out.push('\n');
        out.push_str(&indent);
        out.push_str(&format!("</{}>", self.name));
    }
}

/// Collect the unescaped attributes of a start tag
pub fn attributes(e: &BytesStart) -> Result<HashMap<String, String>, DeviceError> {
    let mut map = HashMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| DeviceError::Xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr.unescape_value()?.to_string();
        map.insert(key, value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_values_escaped() {
        let xml = Element::new("graphics")
            .attr("passwd", "a'b&<c>\"d")
            .attr("listen", "plain")
            .render();
        assert_eq!(
            xml,
            "<graphics passwd='a&apos;b&amp;&lt;c&gt;&quot;d' listen='plain'/>"
        );
    }

    #[test]
    fn test_self_closing_element() {
        let xml = Element::new("graphics")
            .attr("type", "vnc")
            .attr("port", 5901)
            .attr_opt("keymap", None)
            .attr_opt("listen", Some(""))
            .render();
        assert_eq!(xml, "<graphics type='vnc' port='5901'/>");
    }

    #[test]
    fn test_nested_element() {
        let xml = Element::new("video")
            .child(Element::new("model").attr("type", "vga"))
            .render();
        assert_eq!(xml, "<video>\n  <model type='vga'/>\n</video>");
    }
}
