// src/document.rs

//! Queryable HTML document.
//!
//! Wraps `scraper` behind a small query vocabulary: an element name plus
//! attribute predicates (present, equal to a literal, matching a regex).
//! Extractors only speak this vocabulary, so the parser underneath can be
//! swapped without touching them.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};

/// A parsed HTML page.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse a full HTML document. Parsing is lenient and never fails.
    pub fn parse(text: &str) -> Self {
        Self {
            html: Html::parse_document(text),
        }
    }

    /// The document's root element.
    pub fn root(&self) -> Node<'_> {
        Node(self.html.root_element())
    }

    /// All elements matching `query`, in document order.
    pub fn find_all(&self, query: &Query) -> Vec<Node<'_>> {
        self.root().find_all(query)
    }

    /// First element matching `query`.
    pub fn find(&self, query: &Query) -> Option<Node<'_>> {
        self.root().find(query)
    }
}

/// A single element inside a [`Document`].
#[derive(Clone, Copy)]
pub struct Node<'a>(ElementRef<'a>);

impl<'a> Node<'a> {
    /// Descendants matching `query`, in document order. The node itself is excluded.
    pub fn find_all(&self, query: &Query) -> Vec<Node<'a>> {
        self.0
            .select(&query.selector)
            .filter(|el| query.matches_attrs(el))
            .map(Node)
            .collect()
    }

    /// First descendant matching `query`.
    pub fn find(&self, query: &Query) -> Option<Node<'a>> {
        self.0
            .select(&query.selector)
            .find(|el| query.matches_attrs(el))
            .map(Node)
    }

    /// Element name, e.g. `"td"`.
    pub fn name(&self) -> &'a str {
        self.0.value().name()
    }

    /// Attribute value, if present.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    /// Concatenated text content with surrounding whitespace trimmed.
    pub fn text(&self) -> String {
        self.0.text().collect::<String>().trim().to_string()
    }
}

/// Attribute predicate applied on top of the element name.
#[derive(Debug, Clone)]
pub enum AttrMatch {
    /// Attribute exists (any value).
    Present(String),
    /// Attribute value equals the literal.
    Equals(String, String),
    /// Attribute value contains a match of the regex.
    Pattern(String, Regex),
}

impl AttrMatch {
    fn matches(&self, el: &ElementRef<'_>) -> bool {
        let value = |name: &str| el.value().attr(name);
        match self {
            AttrMatch::Present(name) => value(name).is_some(),
            AttrMatch::Equals(name, expected) => value(name) == Some(expected.as_str()),
            AttrMatch::Pattern(name, re) => value(name).is_some_and(|v| re.is_match(v)),
        }
    }
}

/// Element query: a tag name plus zero or more attribute predicates.
#[derive(Debug, Clone)]
pub struct Query {
    selector: Selector,
    attrs: Vec<AttrMatch>,
}

impl Query {
    /// Query elements by tag name.
    pub fn tag(name: &str) -> Result<Self> {
        let selector = Selector::parse(name).map_err(|e| AppError::selector(name, format!("{e:?}")))?;
        Ok(Self {
            selector,
            attrs: Vec::new(),
        })
    }

    /// Require the attribute to be present.
    pub fn has_attr(mut self, name: &str) -> Self {
        self.attrs.push(AttrMatch::Present(name.to_string()));
        self
    }

    /// Require the attribute to equal `value`.
    pub fn attr_eq(mut self, name: &str, value: &str) -> Self {
        self.attrs
            .push(AttrMatch::Equals(name.to_string(), value.to_string()));
        self
    }

    /// Require the attribute to match `pattern` (unanchored, case-sensitive).
    pub fn attr_matches(mut self, name: &str, pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern)?;
        self.attrs.push(AttrMatch::Pattern(name.to_string(), re));
        Ok(self)
    }

    fn matches_attrs(&self, el: &ElementRef<'_>) -> bool {
        self.attrs.iter().all(|m| m.matches(el))
    }
}
