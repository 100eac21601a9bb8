//! The graph node data model (spec §3) — the sole persisted entity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Class,
    Interface,
    Method,
    Property,
    Field,
    Enum,
    Struct,
    File,
    Project,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Class => "class",
            NodeKind::Interface => "interface",
            NodeKind::Method => "method",
            NodeKind::Property => "property",
            NodeKind::Field => "field",
            NodeKind::Enum => "enum",
            NodeKind::Struct => "struct",
            NodeKind::File => "file",
            NodeKind::Project => "project",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "class" => Ok(NodeKind::Class),
            "interface" => Ok(NodeKind::Interface),
            "method" => Ok(NodeKind::Method),
            "property" => Ok(NodeKind::Property),
            "field" => Ok(NodeKind::Field),
            "enum" => Ok(NodeKind::Enum),
            "struct" => Ok(NodeKind::Struct),
            "file" => Ok(NodeKind::File),
            "project" => Ok(NodeKind::Project),
            other => Err(format!("unknown node kind `{other}`")),
        }
    }
}

/// A byte range within a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRange {
    pub start: u32,
    pub end: u32,
}

/// Where a node's definition lives in the original source tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub file: String,
    pub range: Option<SourceRange>,
}

/// A single graph node, shaped per spec §3.
///
/// Relationship arrays hold target `id`s only — never owned/nested nodes.
/// Dead edges (an id with no matching document in the same collection) are
/// a normal, expected occurrence; see `store::DocumentStore` for how
/// traversals tolerate them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub kind: NodeKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceRef>,

    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_sealed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<String>,

    #[serde(default, rename = "contains")]
    pub contains: Vec<String>,
    #[serde(default, rename = "containedIn")]
    pub contained_in: Vec<String>,
    #[serde(default, rename = "hasMember")]
    pub has_member: Vec<String>,
    #[serde(default, rename = "inherits")]
    pub inherits: Vec<String>,
    #[serde(default, rename = "implements")]
    pub implements: Vec<String>,
    #[serde(default, rename = "calls")]
    pub calls: Vec<String>,
    #[serde(default, rename = "callsVia")]
    pub calls_via: Vec<String>,
    #[serde(default, rename = "indirectCall")]
    pub indirect_call: Vec<String>,
    #[serde(default, rename = "uses")]
    pub uses: Vec<String>,
}

/// Every relationship array a node can carry, used to address one generically
/// (traversal frontiers, semantic-stats projection).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayField {
    Contains,
    ContainedIn,
    HasMember,
    Inherits,
    Implements,
    Calls,
    CallsVia,
    IndirectCall,
    Uses,
}

impl ArrayField {
    pub fn name(&self) -> &'static str {
        match self {
            ArrayField::Contains => "contains",
            ArrayField::ContainedIn => "containedIn",
            ArrayField::HasMember => "hasMember",
            ArrayField::Inherits => "inherits",
            ArrayField::Implements => "implements",
            ArrayField::Calls => "calls",
            ArrayField::CallsVia => "callsVia",
            ArrayField::IndirectCall => "indirectCall",
            ArrayField::Uses => "uses",
        }
    }
}

impl GraphNode {
    pub fn array_field(&self, field: ArrayField) -> &[String] {
        match field {
            ArrayField::Contains => &self.contains,
            ArrayField::ContainedIn => &self.contained_in,
            ArrayField::HasMember => &self.has_member,
            ArrayField::Inherits => &self.inherits,
            ArrayField::Implements => &self.implements,
            ArrayField::Calls => &self.calls,
            ArrayField::CallsVia => &self.calls_via,
            ArrayField::IndirectCall => &self.indirect_call,
            ArrayField::Uses => &self.uses,
        }
    }
}

/// Derive a node's containing class from its `fullName`: strip the last
/// `.`-separated segment (`Namespace.Class.Method` -> `Namespace.Class`).
///
/// Shared by Search's `containingClass` post-filter and Impact Analysis's
/// class-resolution step (spec §4.3.1, §4.4 step 1), so the two call sites
/// can't drift into different slicing rules.
pub fn containing_class_of(full_name: &str) -> Option<&str> {
    full_name.rfind('.').map(|idx| &full_name[..idx])
}

/// The last `.`-separated segment of a `fullName` (its class name alone,
/// without namespace prefix).
pub fn last_segment_of(full_name: &str) -> &str {
    match full_name.rfind('.') {
        Some(idx) => &full_name[idx + 1..],
        None => full_name,
    }
}
