//! A small namespace-aware XML tree, built once and kept around so the
//! reader's several harvesting passes (§4.B.2-8) can each walk it
//! independently instead of re-parsing the byte stream per pass.

use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use crate::error::{QflowError, Result};

use super::constants::{D_NS, Q_NS};

/// Which recognized namespace (if any) an element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Questionnaire,
    Display,
    Other,
}

/// One element of the tree: its namespace, local name, attributes,
/// directly-owned text and child elements, in document order.
#[derive(Debug, Clone)]
pub struct XmlNode {
    pub namespace: Namespace,
    pub local_name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
    pub text: String,
}

impl XmlNode {
    fn new(namespace: Namespace, local_name: String) -> Self {
        Self {
            namespace,
            local_name,
            attrs: Vec::new(),
            children: Vec::new(),
            text: String::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_tag(&self, name: &str) -> bool {
        self.namespace == Namespace::Questionnaire && self.local_name == name
    }

    /// Direct children whose local name is `name`, in the recognized
    /// questionnaire namespace.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.is_tag(name))
    }

    pub fn first_child_named(&self, name: &str) -> Option<&XmlNode> {
        self.children_named(name).next()
    }

    /// Depth-first, pre-order walk of every descendant (not including
    /// `self`).
    pub fn descendants(&self) -> Vec<&XmlNode> {
        let mut out = Vec::new();
        for child in &self.children {
            out.push(child);
            out.extend(child.descendants());
        }
        out
    }
}

fn classify_namespace(result: &ResolveResult) -> Namespace {
    match result {
        ResolveResult::Bound(ns) => {
            let uri = ns.as_ref();
            if uri == Q_NS.as_bytes() {
                Namespace::Questionnaire
            } else if uri == D_NS.as_bytes() {
                Namespace::Display
            } else {
                Namespace::Other
            }
        }
        _ => Namespace::Other,
    }
}

/// Parse the whole document into an [`XmlNode`] tree rooted at the
/// outermost element.
///
/// Fails with [`QflowError::MalformedXml`] when the document is not
/// well-formed; the underlying `quick_xml` message is carried verbatim.
pub fn parse_document(xml: &str) -> Result<XmlNode> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        let (resolved, event) = reader
            .read_resolved_event_into(&mut buf)
            .map_err(|e| QflowError::MalformedXml(e.to_string()))?;

        match event {
            Event::Start(e) => {
                let namespace = classify_namespace(&resolved);
                let local_name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                let mut node = XmlNode::new(namespace, local_name);
                for attr in e.attributes() {
                    let attr = attr?;
                    let key =
                        String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
                    let value = attr.unescape_value()?.into_owned();
                    node.attrs.push((key, value));
                }
                stack.push(node);
            }
            Event::Empty(e) => {
                let namespace = classify_namespace(&resolved);
                let local_name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                let mut node = XmlNode::new(namespace, local_name);
                for attr in e.attributes() {
                    let attr = attr?;
                    let key =
                        String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
                    let value = attr.unescape_value()?.into_owned();
                    node.attrs.push((key, value));
                }
                attach(&mut stack, &mut root, node);
            }
            Event::Text(t) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&t.unescape()?);
                }
            }
            Event::CData(t) => {
                if let Some(top) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&t.into_inner()).into_owned();
                    top.text.push_str(&text);
                }
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| QflowError::MalformedXml("unbalanced end tag".to_string()))?;
                attach(&mut stack, &mut root, node);
            }
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            _ => {}
        }
        buf.clear();
    }

    root.ok_or_else(|| QflowError::MalformedXml("no root element found".to_string()))
}

fn attach(stack: &mut Vec<XmlNode>, root: &mut Option<XmlNode>, node: XmlNode) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else {
        *root = Some(node);
    }
}
