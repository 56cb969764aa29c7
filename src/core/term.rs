//! RDF term interpretation of template variables and result columns

use oxigraph::model::{BlankNode, Literal, NamedNode, Quad, Variable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a raw value is interpreted as an RDF term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TermKind {
    NamedNode,
    BlankNode,
    /// A literal, optionally language-tagged or datatyped.
    /// A language tag takes precedence over a datatype.
    Literal {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        datatype: Option<String>,
    },
    Variable,
    DefaultGraph,
}

impl TermKind {
    /// A plain literal kind.
    pub fn literal() -> Self {
        TermKind::Literal { language: None, datatype: None }
    }

    /// Builds the term this kind describes for the given lexical value.
    /// Values are taken as-is, IRIs and language tags are not validated.
    pub fn create_term(&self, lexical: &str) -> RdfTerm {
        match self {
            TermKind::NamedNode => RdfTerm::NamedNode(NamedNode::new_unchecked(lexical)),
            TermKind::BlankNode => RdfTerm::BlankNode(BlankNode::new_unchecked(lexical)),
            TermKind::Literal { language: Some(language), .. } => RdfTerm::Literal(
                Literal::new_language_tagged_literal_unchecked(lexical, language.as_str()),
            ),
            TermKind::Literal { language: None, datatype: Some(datatype) } => RdfTerm::Literal(
                Literal::new_typed_literal(lexical, NamedNode::new_unchecked(datatype.as_str())),
            ),
            TermKind::Literal { language: None, datatype: None } => {
                RdfTerm::Literal(Literal::new_simple_literal(lexical))
            }
            TermKind::Variable => RdfTerm::Variable(Variable::new_unchecked(lexical)),
            TermKind::DefaultGraph => RdfTerm::DefaultGraph,
        }
    }
}

/// A named query-template placeholder or result column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableSpec {
    pub name: String,
    #[serde(flatten)]
    pub kind: TermKind,
}

impl VariableSpec {
    pub fn new(name: &str, kind: TermKind) -> Self {
        Self { name: name.to_string(), kind }
    }

    pub fn named_node(name: &str) -> Self {
        Self::new(name, TermKind::NamedNode)
    }

    pub fn literal(name: &str) -> Self {
        Self::new(name, TermKind::literal())
    }

    /// Pairs this variable with the term built from `lexical`.
    pub fn bind(&self, lexical: &str) -> TermBinding {
        TermBinding { name: self.name.clone(), term: self.kind.create_term(lexical) }
    }
}

/// An RDF term, or one of the term-like values a variable can be bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RdfTerm {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    Literal(Literal),
    Variable(Variable),
    DefaultGraph,
    Quad(Box<Quad>),
}

impl RdfTerm {
    /// Name of the term type, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            RdfTerm::NamedNode(_) => "NamedNode",
            RdfTerm::BlankNode(_) => "BlankNode",
            RdfTerm::Literal(_) => "Literal",
            RdfTerm::Variable(_) => "Variable",
            RdfTerm::DefaultGraph => "DefaultGraph",
            RdfTerm::Quad(_) => "Quad",
        }
    }
}

impl fmt::Display for RdfTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RdfTerm::NamedNode(node) => fmt::Display::fmt(node, f),
            RdfTerm::BlankNode(node) => fmt::Display::fmt(node, f),
            RdfTerm::Literal(literal) => fmt::Display::fmt(literal, f),
            RdfTerm::Variable(variable) => fmt::Display::fmt(variable, f),
            RdfTerm::DefaultGraph => write!(f, "DEFAULT"),
            RdfTerm::Quad(quad) => fmt::Display::fmt(quad.as_ref(), f),
        }
    }
}

/// A variable name together with the term it is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermBinding {
    pub name: String,
    pub term: RdfTerm,
}
