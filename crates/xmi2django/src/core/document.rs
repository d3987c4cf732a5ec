//! Namespace-aware XML element tree
//!
//! XMI lookups need random access (parent packages, descendant searches for
//! multiplicity values, extension blocks), so the `quick-xml` event stream is
//! folded into a small owned tree first. Prefixes are resolved against the
//! `xmlns` declarations in scope, so lookups are done by namespace URI and local
//! name regardless of the prefixes a modeling tool happens to emit.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, span, trace, Level};

use super::error::{Result, XmiError};

/// XMI 2.1 namespace URI
pub const XMI_NS: &str = "http://schema.omg.org/spec/XMI/2.1";

/// UML 2.0 namespace URI
pub const UML_NS: &str = "http://schema.omg.org/spec/UML/2.0";

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// A single attribute with its prefix resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    /// Namespace URI; unprefixed attributes have none
    pub namespace: Option<String>,
    pub local_name: String,
    /// Unescaped value
    pub value: String,
}

/// An element of the document tree
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    pub namespace: Option<String>,
    pub local_name: String,
    pub attributes: Vec<XmlAttribute>,
    pub children: Vec<XmlElement>,
    /// Concatenated character data directly inside this element
    pub text: String,
}

impl XmlElement {
    pub fn new(local_name: impl Into<String>) -> Self {
        Self {
            local_name: local_name.into(),
            ..Self::default()
        }
    }

    /// True when the element has the given namespace and local name
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local_name == local_name
    }

    /// Value of an unprefixed attribute
    pub fn attr(&self, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.is_none() && a.local_name == local_name)
            .map(|a| a.value.as_str())
    }

    /// Value of a namespaced attribute
    pub fn attr_ns(&self, namespace: &str, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.as_deref() == Some(namespace) && a.local_name == local_name)
            .map(|a| a.value.as_str())
    }

    /// `xmi:id`
    pub fn xmi_id(&self) -> Option<&str> {
        self.attr_ns(XMI_NS, "id")
    }

    /// `xmi:type`
    pub fn xmi_type(&self) -> Option<&str> {
        self.attr_ns(XMI_NS, "type")
    }

    /// `xmi:value`
    pub fn xmi_value(&self) -> Option<&str> {
        self.attr_ns(XMI_NS, "value")
    }

    /// Direct children with the given local name, in document order
    pub fn children_named<'a>(&'a self, local_name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children
            .iter()
            .filter(move |c| c.local_name == local_name)
    }

    /// Own `xmi:Extension` children
    pub fn extensions(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter(|c| c.is(XMI_NS, "Extension"))
    }

    /// All descendants in document (pre-)order, excluding `self`
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Descendants with the given local name, in document order
    pub fn descendants_named<'a>(&'a self, local_name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.descendants().filter(move |d| d.local_name == local_name)
    }

    /// First descendant with the given local name
    pub fn first_descendant(&self, local_name: &str) -> Option<&XmlElement> {
        self.descendants().find(|d| d.local_name == local_name)
    }
}

/// Pre-order iterator over an element's subtree
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

/// An element still waiting for its end tag
struct OpenElement {
    element: XmlElement,
    /// `xmlns` declarations made on this element; `""` is the default namespace
    declarations: Vec<(String, String)>,
}

/// A parsed XML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmiDocument {
    root: XmlElement,
}

impl XmiDocument {
    /// Build the element tree from XML text
    pub fn parse_str(input: &str) -> Result<Self> {
        let parse_span = span!(Level::DEBUG, "read_xml", input_len = input.len());
        let _enter = parse_span.enter();

        let mut reader = Reader::from_str(input);
        let mut open: Vec<OpenElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    let element = open_element(e, &open)?;
                    open.push(element);
                }
                Ok(Event::Empty(ref e)) => {
                    let element = open_element(e, &open)?;
                    close_element(element.element, &mut open, &mut root)?;
                }
                Ok(Event::End(_)) => {
                    let element = open
                        .pop()
                        .ok_or_else(|| XmiError::xml("end tag without matching start tag"))?;
                    close_element(element.element, &mut open, &mut root)?;
                }
                Ok(Event::Text(ref t)) => {
                    if let Some(top) = open.last_mut() {
                        let text = t
                            .unescape()
                            .map_err(|e| XmiError::xml(format!("Text error: {e}")))?;
                        top.element.text.push_str(&text);
                    }
                }
                Ok(Event::CData(t)) => {
                    if let Some(top) = open.last_mut() {
                        let bytes = t.into_inner();
                        let text = std::str::from_utf8(&bytes)
                            .map_err(|e| XmiError::xml(format!("CDATA error: {e}")))?;
                        top.element.text.push_str(text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(XmiError::xml(format!(
                        "XML parse error at position {}: {e}",
                        reader.error_position()
                    )));
                }
                _ => {}
            }
        }

        if !open.is_empty() {
            return Err(XmiError::xml(format!(
                "unexpected end of document, {} element(s) left open",
                open.len()
            )));
        }

        let root = root.ok_or_else(|| XmiError::malformed("document has no root element"))?;
        debug!(root = %root.local_name, "XML tree built");
        Ok(Self { root })
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// The first `XMI` element in the XMI namespace, the root included
    pub fn xmi_element(&self) -> Option<&XmlElement> {
        std::iter::once(&self.root)
            .chain(self.root.descendants())
            .find(|e| e.is(XMI_NS, "XMI"))
    }
}

fn open_element(e: &BytesStart<'_>, open: &[OpenElement]) -> Result<OpenElement> {
    let name_bytes = e.name();
    let qname = std::str::from_utf8(name_bytes.as_ref())
        .map_err(|e| XmiError::xml(format!("Invalid tag name: {e}")))?;

    let mut declarations = Vec::new();
    let mut raw_attributes = Vec::new();

    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| XmiError::xml(format!("Attribute error: {e}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| XmiError::xml(format!("Attribute key error: {e}")))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| XmiError::xml(format!("Attribute value error: {e}")))?
            .to_string();

        if key == "xmlns" {
            declarations.push((String::new(), value));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            declarations.push((prefix.to_string(), value));
        } else {
            raw_attributes.push((key, value));
        }
    }

    let (prefix, local_name) = split_qname(qname);
    let namespace = resolve_prefix(prefix.unwrap_or(""), &declarations, open);

    let attributes = raw_attributes
        .into_iter()
        .map(|(key, value)| {
            let (prefix, local_name) = split_qname(&key);
            XmlAttribute {
                namespace: prefix.and_then(|p| resolve_prefix(p, &declarations, open)),
                local_name: local_name.to_string(),
                value,
            }
        })
        .collect();

    trace!(tag = qname, "Opened element");

    Ok(OpenElement {
        element: XmlElement {
            namespace,
            local_name: local_name.to_string(),
            attributes,
            children: Vec::new(),
            text: String::new(),
        },
        declarations,
    })
}

fn close_element(
    element: XmlElement,
    open: &mut [OpenElement],
    root: &mut Option<XmlElement>,
) -> Result<()> {
    match open.last_mut() {
        Some(parent) => parent.element.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(XmiError::xml("document has more than one root element")),
    }
    Ok(())
}

fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    }
}

/// Look a prefix up in the element's own declarations, then outward
fn resolve_prefix(prefix: &str, own: &[(String, String)], open: &[OpenElement]) -> Option<String> {
    if prefix == "xml" {
        return Some(XML_NS.to_string());
    }
    std::iter::once(own)
        .chain(open.iter().rev().map(|o| o.declarations.as_slice()))
        .find_map(|decls| decls.iter().find(|(p, _)| p == prefix))
        .map(|(_, uri)| uri.clone())
        .filter(|uri| !uri.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xmi:XMI xmi:version="2.1" xmlns:xmi="http://schema.omg.org/spec/XMI/2.1" xmlns:uml="http://schema.omg.org/spec/UML/2.0">
  <uml:Model xmi:id="m1" name="Shop">
    <ownedMember xmi:type="uml:Class" xmi:id="c1" name="Order">
      <ownedComment><body>Line &amp; more</body></ownedComment>
    </ownedMember>
  </uml:Model>
</xmi:XMI>"#;

    #[test]
    fn test_resolves_prefixed_names() {
        let doc = XmiDocument::parse_str(SAMPLE).unwrap();
        let xmi = doc.xmi_element().unwrap();
        assert!(xmi.is(XMI_NS, "XMI"));
        assert_eq!(xmi.attr_ns(XMI_NS, "version"), Some("2.1"));

        let model = xmi.children_named("Model").next().unwrap();
        assert!(model.is(UML_NS, "Model"));
        assert_eq!(model.xmi_id(), Some("m1"));
        assert_eq!(model.attr("name"), Some("Shop"));
    }

    #[test]
    fn test_unprefixed_attributes_have_no_namespace() {
        let doc = XmiDocument::parse_str(SAMPLE).unwrap();
        let class = doc.root().first_descendant("ownedMember").unwrap();
        assert_eq!(class.xmi_type(), Some("uml:Class"));
        assert_eq!(class.attr("name"), Some("Order"));
        assert_eq!(class.attr("type"), None);
        assert_eq!(class.namespace, None);
    }

    #[test]
    fn test_text_is_unescaped() {
        let doc = XmiDocument::parse_str(SAMPLE).unwrap();
        let body = doc.root().first_descendant("body").unwrap();
        assert_eq!(body.text, "Line & more");
    }

    #[test]
    fn test_descendants_in_document_order() {
        let doc = XmiDocument::parse_str(
            "<a><b><c/></b><d/></a>",
        )
        .unwrap();
        let names: Vec<_> = doc
            .root()
            .descendants()
            .map(|e| e.local_name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "c", "d"]);
    }

    #[test]
    fn test_default_namespace_applies_to_elements_only() {
        let doc = XmiDocument::parse_str(r#"<root xmlns="urn:x" kind="k"><child/></root>"#).unwrap();
        assert_eq!(doc.root().namespace.as_deref(), Some("urn:x"));
        assert_eq!(doc.root().children[0].namespace.as_deref(), Some("urn:x"));
        assert_eq!(doc.root().attr("kind"), Some("k"));
    }

    #[test]
    fn test_rejects_broken_xml() {
        let result = XmiDocument::parse_str("<a><b></a>");
        assert!(matches!(result, Err(XmiError::Xml { .. })));
    }

    #[test]
    fn test_rejects_unclosed_document() {
        let result = XmiDocument::parse_str("<a><b/>");
        assert!(matches!(result, Err(XmiError::Xml { .. })));
    }

    #[test]
    fn test_rejects_empty_document() {
        let result = XmiDocument::parse_str("   ");
        assert!(matches!(result, Err(XmiError::MalformedDocument { .. })));
    }
}
