//! Inspected variable tree
//!
//! A [`Variable`] carries whatever the debugger reported about one value:
//! a ready-made rendering, a scalar, or one of the aggregate forms in
//! [`Contents`]. [`Variable::value_string`] turns a tree into display text
//! under a depth bound and a per-node length bound.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const INDENT_WIDTH: usize = 2;

/// Kind of value, as reported by the debugger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Kind {
    /// Not reported
    #[default]
    Unknown,
    /// Boolean
    Bool,
    /// Signed or unsigned integer
    Int,
    /// Floating point
    Float,
    /// Complex number
    Complex,
    /// String
    String,
    /// Typed pointer
    Ptr,
    /// Raw pointer
    UnsafePtr,
    /// Fixed-size array
    Array,
    /// Slice
    Slice,
    /// Map
    Map,
    /// Struct
    Struct,
    /// Interface value
    Interface,
    /// Function
    Func,
    /// Channel
    Chan,
}

impl Kind {
    /// Pointer kinds, rendered as a dereference of their single child
    pub fn is_ptr(self) -> bool {
        matches!(self, Kind::Ptr | Kind::UnsafePtr)
    }

    /// Kinds with a single scalar value
    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            Kind::Bool | Kind::Int | Kind::Float | Kind::Complex | Kind::String
        )
    }

    /// Array and slice kinds
    pub fn is_list(self) -> bool {
        matches!(self, Kind::Array | Kind::Slice)
    }
}

/// Where a variable was declared
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Source file
    pub file: String,
    /// 1-based line
    pub line: u32,
    /// Enclosing function
    #[serde(default)]
    pub func: String,
}

/// What a variable node holds beyond its pre-rendered value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "items")]
pub enum Contents {
    /// Nothing inspected yet
    #[default]
    Empty,
    /// Own elemental value of a non-composite variable
    Scalar(String),
    /// Primitive elements of an array or slice
    List(Vec<String>),
    /// Map with primitive keys and values
    PrimitiveMap(BTreeMap<String, String>),
    /// Map with composite values
    NestedMap(BTreeMap<String, Variable>),
    /// Ordered sub-variables: struct fields, pointer target, composite elements
    Children(Vec<Variable>),
}

/// One inspected variable
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Variable {
    /// Name, empty for anonymous elements
    pub name: String,
    /// Pre-rendered value; when set it is shown as is
    pub value: String,
    /// Type shortened for display
    pub type_str: String,
    /// Full type expression
    pub full_type_str: String,
    /// Kind of value
    pub kind: Kind,
    /// Length of strings, slices, maps
    pub len: i64,
    /// Capacity of slices
    pub cap: i64,
    /// Address in target memory
    pub addr: u64,
    /// Allocated on the heap rather than the stack
    pub heap: bool,
    /// Declaration site
    pub loc: Location,
    /// Inspected contents
    pub contents: Contents,
}

impl Variable {
    /// Create an empty variable
    pub fn new(name: impl Into<String>, type_str: impl Into<String>, kind: Kind) -> Self {
        let type_str = type_str.into();
        Self {
            name: name.into(),
            full_type_str: type_str.clone(),
            type_str,
            kind,
            ..Self::default()
        }
    }

    /// Scalar variable holding `value`
    pub fn scalar(
        name: impl Into<String>,
        type_str: impl Into<String>,
        kind: Kind,
        value: impl Into<String>,
    ) -> Self {
        Self::new(name, type_str, kind).with_contents(Contents::Scalar(value.into()))
    }

    /// Replace the contents
    pub fn with_contents(mut self, contents: Contents) -> Self {
        self.contents = contents;
        self
    }

    /// Children, when the contents are a child list
    pub fn children(&self) -> &[Variable] {
        match &self.contents {
            Contents::Children(children) => children,
            _ => &[],
        }
    }

    /// Whether the contents variant fits the kind
    pub fn is_consistent(&self) -> bool {
        match &self.contents {
            Contents::Empty => true,
            Contents::Scalar(_) => !self.kind.is_list() && !matches!(self.kind, Kind::Map | Kind::Struct),
            Contents::List(_) => self.kind.is_list(),
            Contents::PrimitiveMap(_) | Contents::NestedMap(_) => self.kind == Kind::Map,
            Contents::Children(children) => {
                !self.kind.is_primitive() && (!self.kind.is_ptr() || children.len() <= 1)
            }
        }
    }

    /// Render the value for display
    ///
    /// Precedence: the pre-rendered `value`, a scalar, a pointer's single
    /// target (`*` then the target with its type), then a braced aggregate.
    /// Nodes deeper than `max_depth` render as `{...}`. Once a node's own
    /// text exceeds `max_len`, `...` is appended and its remaining entries
    /// are skipped.
    pub fn value_string(
        &self,
        multiline: bool,
        indent: usize,
        max_depth: usize,
        max_len: usize,
        with_type: bool,
    ) -> String {
        if !self.value.is_empty() {
            return self.value.clone();
        }
        if let Contents::Scalar(el) = &self.contents {
            if !el.is_empty() {
                return el.clone();
            }
        }
        if let [target] = self.children() {
            if self.kind.is_ptr() {
                return format!("*{}", target.value_string(multiline, indent, max_depth, max_len, true));
            }
        }

        let mut out = String::new();
        if with_type && !self.type_str.is_empty() {
            out.push_str(&self.type_str);
            out.push(' ');
        }
        if indent > max_depth {
            out.push_str("{...}");
            return out;
        }
        out.push('{');

        let mut any = false;
        for (i, entry) in self.entries(multiline, indent + 1, max_depth, max_len).enumerate() {
            any = true;
            if multiline {
                out.push('\n');
                push_indent(&mut out, indent + 1);
            } else if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&entry);
            if out.len() > max_len {
                out.push_str("...");
                break;
            }
        }

        if multiline && any {
            out.push('\n');
            push_indent(&mut out, indent);
        }
        out.push('}');
        out
    }

    /// `key: value` entries of the aggregate contents, rendered on demand
    fn entries(
        &self,
        multiline: bool,
        indent: usize,
        max_depth: usize,
        max_len: usize,
    ) -> Box<dyn Iterator<Item = String> + '_> {
        match &self.contents {
            Contents::Empty | Contents::Scalar(_) => Box::new(std::iter::empty()),
            Contents::List(items) => Box::new(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, el)| format!("{}: {}", i, el)),
            ),
            Contents::PrimitiveMap(map) => Box::new(map.iter().map(|(k, v)| format!("{}: {}", k, v))),
            Contents::NestedMap(map) => Box::new(map.iter().map(move |(k, v)| {
                format!(
                    "{}: {}",
                    k,
                    v.value_string(multiline, indent, max_depth, max_len, false)
                )
            })),
            Contents::Children(children) => Box::new(children.iter().map(move |child| {
                let value = child.value_string(multiline, indent, max_depth, max_len, true);
                if child.name.is_empty() {
                    value
                } else {
                    format!("{}: {}", child.name, value)
                }
            })),
        }
    }

    /// Name, type, length, capacity, address and heap flag, one per line or tab-separated
    pub fn type_info(&self, newlines: bool) -> String {
        let sep = if newlines { "\n" } else { "\t" };
        [
            format!("Name: {}", self.name),
            format!("Type: {}", self.type_str),
            format!("Len:  {}", self.len),
            format!("Cap:  {}", self.cap),
            format!("Addr: {:x}", self.addr),
            format!("Heap: {}", self.heap),
        ]
        .join(sep)
    }

    /// Descendant at a dotted path such as `cfg.server.port`
    ///
    /// Each segment matches a child name or a nested map key.
    pub fn find_path(&self, path: &str) -> Option<&Variable> {
        let mut node = self;
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            node = match &node.contents {
                Contents::Children(children) => children.iter().find(|c| c.name == segment)?,
                Contents::NestedMap(map) => map.get(segment)?,
                _ => return None,
            };
        }
        Some(node)
    }
}

/// Sort variables by name, in place
pub fn sort_by_name(vars: &mut [Variable]) {
    vars.sort_by(|a, b| a.name.cmp(&b.name));
}

fn push_indent(out: &mut String, level: usize) {
    out.extend(std::iter::repeat_n(' ', level * INDENT_WIDTH));
}
