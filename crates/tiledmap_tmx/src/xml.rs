//! A small owned element tree built from `quick-xml` events, plus typed
//! attribute accessors that report errors the way every reader expects.

use std::io::BufRead;
use std::str::FromStr;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tiledmap_core::literal::{Literal, parse_literal};
use tiledmap_core::model::Color;
use tiledmap_core::{Error, Result};

#[derive(Debug, Clone, Default)]
pub(crate) struct Element {
    pub name: String,
    attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    /// Concatenated text and CDATA content, untrimmed.
    pub text: String,
}

pub(crate) fn parse_str(xml: &str) -> Result<Element> {
    parse(Reader::from_str(xml))
}

pub(crate) fn parse_reader<R: BufRead>(reader: R) -> Result<Element> {
    parse(Reader::from_reader(reader))
}

fn parse<R: BufRead>(mut reader: Reader<R>) -> Result<Element> {
    // Whitespace is significant in property text, so nothing is trimmed here.
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            Error::malformed(format!(
                "XML error at byte {}: {e}",
                reader.buffer_position()
            ))
        })?;
        match event {
            Event::Start(e) => stack.push(start_element(&e)?),
            Event::Empty(e) => {
                let element = start_element(&e)?;
                close(element, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::malformed("unbalanced closing tag"))?;
                close(element, &mut stack, &mut root)?;
            }
            Event::Text(t) => {
                if let Some(current) = stack.last_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| Error::malformed(format!("invalid text content: {e}")))?;
                    current.text.push_str(&text);
                }
            }
            Event::CData(c) => {
                if let Some(current) = stack.last_mut() {
                    let text = std::str::from_utf8(&c)
                        .map_err(|e| Error::malformed(format!("invalid CDATA content: {e}")))?;
                    current.text.push_str(text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(Error::malformed(format!(
            "document ended inside <{}>",
            open.name
        )));
    }
    root.ok_or_else(|| Error::malformed("document has no root element"))
}

fn start_element(e: &BytesStart<'_>) -> Result<Element> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(|e| Error::malformed(format!("invalid element name: {e}")))?
        .to_string();
    let mut attributes = Vec::new();
    for attribute in e.attributes() {
        let attribute =
            attribute.map_err(|e| Error::malformed(format!("invalid attribute on <{name}>: {e}")))?;
        let key = std::str::from_utf8(attribute.key.as_ref())
            .map_err(|e| Error::malformed(format!("invalid attribute name: {e}")))?
            .to_string();
        let value = attribute
            .unescape_value()
            .map_err(|e| Error::malformed(format!("invalid value for '{key}': {e}")))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        ..Element::default()
    })
}

fn close(element: Element, stack: &mut [Element], root: &mut Option<Element>) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(Error::malformed("document has more than one root element")),
    }
    Ok(())
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn required(&self, name: &str) -> Result<&str> {
        self.attr(name)
            .ok_or_else(|| Error::missing(&self.name, name))
    }

    /// Parse an optional attribute with `FromStr`.
    pub fn parse<T: FromStr>(&self, name: &str) -> Result<Option<T>> {
        self.attr(name)
            .map(|value| {
                value
                    .trim()
                    .parse()
                    .map_err(|_| Error::format(format!("'{name}' on <{}>", self.name), value))
            })
            .transpose()
    }

    pub fn parse_required<T: FromStr>(&self, name: &str) -> Result<T> {
        self.parse(name)?
            .ok_or_else(|| Error::missing(&self.name, name))
    }

    /// `0`/`1` flags; `true`/`false` is accepted as well.
    pub fn flag(&self, name: &str) -> Result<Option<bool>> {
        self.attr(name)
            .map(|value| match value.trim() {
                "1" | "true" => Ok(true),
                "0" | "false" => Ok(false),
                other => Err(Error::format(format!("'{name}' on <{}>", self.name), other)),
            })
            .transpose()
    }

    pub fn literal<T: Literal>(&self, name: &str) -> Result<Option<T>> {
        self.attr(name)
            .map(|value| parse_literal(name, value))
            .transpose()
    }

    pub fn required_literal<T: Literal>(&self, name: &str) -> Result<T> {
        parse_literal(name, self.required(name)?)
    }

    pub fn color(&self, name: &str) -> Result<Option<Color>> {
        match self.attr(name) {
            None | Some("") => Ok(None),
            Some(value) => value.parse().map(Some),
        }
    }

    /// The single child called `name`, failing if it appears twice.
    pub fn at_most_one(&self, name: &str) -> Result<Option<&Element>> {
        let mut found = None;
        for child in self.children.iter().filter(|child| child.name == name) {
            if found.is_some() {
                return Err(Error::duplicate(&self.name, name));
            }
            found = Some(child);
        }
        Ok(found)
    }

    pub fn expect_name(&self, name: &str) -> Result<()> {
        if self.name == name {
            Ok(())
        } else {
            Err(Error::malformed(format!(
                "expected <{name}> but found <{}>",
                self.name
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_nested_tree() {
        let root = parse_str(
            r#"<?xml version="1.0"?>
<map version="1.10"><properties><property name="a" value="1"/></properties><layer id="1"/></map>"#,
        )
        .unwrap();
        assert_eq!(root.name, "map");
        assert_eq!(root.attr("version"), Some("1.10"));
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].children[0].attr("name"), Some("a"));
    }

    #[test]
    fn test_text_and_entities_are_kept() {
        let root = parse_str("<property name=\"s\">a &amp; b\n<![CDATA[<c>]]></property>").unwrap();
        assert_eq!(root.text, "a & b\n<c>");
    }

    #[test]
    fn test_truncated_document_is_malformed() {
        let err = parse_str("<map><layer>").unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
        let err = parse_str("").unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
    }

    #[test]
    fn test_attribute_helpers() {
        let el = parse_str(r##"<layer id="3" visible="0" opacity="x" tintcolor="#ff102030"/>"##)
            .unwrap();
        assert_eq!(el.parse_required::<u32>("id").unwrap(), 3);
        assert_eq!(el.flag("visible").unwrap(), Some(false));
        assert!(matches!(
            el.parse::<f32>("opacity"),
            Err(Error::Format { .. })
        ));
        assert!(el.color("tintcolor").unwrap().is_some());
        assert!(matches!(
            el.parse_required::<u32>("width"),
            Err(Error::MissingRequiredAttribute { ref element, ref attribute })
                if element == "layer" && attribute == "width"
        ));
    }

    #[test]
    fn test_at_most_one_rejects_duplicates() {
        let el = parse_str("<tileset><image/><image/></tileset>").unwrap();
        assert!(matches!(
            el.at_most_one("image"),
            Err(Error::DuplicateElement { .. })
        ));
        assert!(el.at_most_one("grid").unwrap().is_none());
    }
}
