//! Graphviz DOT rendering of an extracted [`Tree`].
//!
//! One node per value, colored by kind and scaled by popularity. Struct
//! values get a dotted cluster holding their field edges; interface values
//! get an "implement" edge to the concrete value they hold. Collections of
//! interface values with more than one element are compacted: a single
//! "elements" edge to the first element, with every other element merged
//! onto it through the patch table.
//!
//! Attributes are written in key order, so equal trees render to equal bytes.

use std::collections::{BTreeMap, HashMap};

use objtree_core::{EdgeFlags, Kind, Tree, TypeNode, ValueNode, ValueNodeId};
use tracing::debug;

use crate::error::RenderError;
use crate::palette::Palette;

/// Renderer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Name of the emitted `digraph`.
    pub graph_name: String,
    pub palette: Palette,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            graph_name: "objtree".into(),
            palette: Palette::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Renderer { options }
    }

    /// Renders `tree` as a DOT digraph. The tree is validated first.
    pub fn render(&self, tree: &Tree) -> Result<String, RenderError> {
        tree.validate()?;

        let mut drawer = Drawer {
            tree,
            palette: &self.options.palette,
            max_referred: tree.max_referred(),
            patch: HashMap::new(),
            out: String::new(),
        };
        drawer.out.push_str(&format!("digraph {} {{\n", graph_id(&self.options.graph_name)));
        drawer.out.push_str("node [style=filled shape=rect]\n");
        for value in &tree.values {
            drawer.value(value)?;
        }
        drawer.out.push_str("}\n");

        debug!(
            values = tree.values.len(),
            merged = drawer.patch.len(),
            bytes = drawer.out.len(),
            "rendered tree"
        );
        Ok(drawer.out)
    }
}

/// Renders `tree` with default options.
pub fn render(tree: &Tree) -> Result<String, RenderError> {
    Renderer::default().render(tree)
}

/// A collection element folded onto `alias`.
#[derive(Debug, Clone, Copy)]
struct Merge {
    /// Element count of the collection.
    len: u32,
    alias: ValueNodeId,
}

type Attrs = BTreeMap<&'static str, String>;

struct Drawer<'a> {
    tree: &'a Tree,
    palette: &'a Palette,
    max_referred: u32,
    patch: HashMap<ValueNodeId, Merge>,
    out: String,
}

impl Drawer<'_> {
    fn value(&mut self, value: &ValueNode) -> Result<(), RenderError> {
        let ty = self.tree.type_of(value).ok_or(RenderError::UnknownType {
            value: value.id,
            ty: value.ty,
        })?;

        let merge = self.patch.get(&value.id).copied();
        let src = match merge {
            Some(merge) if merge.alias != value.id => merge.alias,
            _ => {
                self.node(value, ty, merge.map_or(0, |m| m.len));
                value.id
            }
        };

        match ty.kind {
            Kind::Map | Kind::Slice | Kind::Array => self.collection(src, value, ty),
            Kind::Struct => self.structure(src, value, ty),
            Kind::Interface => self.interface(src, value, ty, merge.is_some()),
            _ => {}
        }
        Ok(())
    }

    fn node(&mut self, value: &ValueNode, ty: &TypeNode, extra: u32) {
        let referred = value.referred + extra;
        let fontsize = 8.0 + 8.0 * f64::from(referred) / f64::from(self.max_referred);

        let mut tooltip = ty.full_name();
        let doc = ty.doc("");
        if !doc.is_empty() {
            tooltip.push('\n');
            tooltip.push_str(doc);
        }

        let mut attrs = Attrs::new();
        attrs.insert("fillcolor", self.palette.color(ty.kind).to_string());
        attrs.insert("fontsize", format!("{:.1}", fontsize));
        attrs.insert("height", "0.25".into());
        attrs.insert("label", ty.display.clone());
        attrs.insert("margin", "0.05,0".into());
        attrs.insert("tooltip", tooltip);
        self.out.push_str(&format!("{} {};\n", value.id, attr_list(&attrs)));
    }

    fn edge(&mut self, src: ValueNodeId, dst: ValueNodeId, mut attrs: Attrs) {
        let dst = self.patch.get(&dst).map_or(dst, |merge| merge.alias);
        attrs.insert("arrowsize", "0.7".into());
        attrs.insert("weight", "100".into());
        attrs.insert("fontsize", "10".into());
        self.out.push_str(&format!("{} -> {} {};\n", src, dst, attr_list(&attrs)));
    }

    fn collection(&mut self, src: ValueNodeId, value: &ValueNode, ty: &TypeNode) {
        let holds_interfaces = ty
            .elements
            .get("")
            .and_then(|&element| self.tree.type_node(element))
            .is_some_and(|element| element.kind == Kind::Interface);
        let len = value.elements.len();

        match value.elements.values().next() {
            Some(&first) if holds_interfaces && len > 1 => {
                let mut attrs = Attrs::new();
                attrs.insert("label", "elements".into());
                attrs.insert("labeltooltip", format!("total: {}", len));
                self.edge(src, first, attrs);

                let merge = Merge {
                    len: len as u32,
                    alias: first,
                };
                for &element in value.elements.values() {
                    self.patch.insert(element, merge);
                }
            }
            _ => {
                for (key, &dst) in &value.elements {
                    let mut attrs = Attrs::new();
                    attrs.insert("label", "element".into());
                    attrs.insert("labeltooltip", format!("index: {}", key));
                    self.edge(src, dst, attrs);
                }
            }
        }
    }

    fn structure(&mut self, src: ValueNodeId, value: &ValueNode, ty: &TypeNode) {
        self.out.push_str(&format!("subgraph cluster_{} {{\n", src));
        self.out.push_str(&format!(
            "tooltip=\"{}\";\n",
            escape(&struct_definition(self.tree, value, ty))
        ));
        self.out.push_str("style=dotted;\n");
        self.out.push_str(&format!("bgcolor=\"{}\";\n", escape(&self.palette.cluster)));
        self.out.push_str("margin=\"0,0\";\n");

        for (key, &dst) in &value.elements {
            let flags = value.flags(key);
            let mut attrs = Attrs::new();
            attrs.insert("arrowhead", "open".into());
            attrs.insert("label", format!("{}{}", pointer_marker(flags), key));

            let doc = ty.doc(key);
            let tooltip = if doc.is_empty() {
                key.clone()
            } else {
                format!("{}: {}", key, doc)
            };
            attrs.insert("labeltooltip", tooltip);
            if flags.contains(EdgeFlags::ANONYMOUS) {
                attrs.insert("fontcolor", self.palette.muted.clone());
            }
            self.edge(src, dst, attrs);
        }
        self.out.push_str("}\n");
    }

    fn interface(&mut self, src: ValueNodeId, value: &ValueNode, ty: &TypeNode, merged: bool) {
        let mut methods: Vec<_> = ty.elements.iter().collect();
        methods.sort_by(|a, b| a.0.cmp(b.0));

        let lines: Vec<String> = methods
            .into_iter()
            .map(|(name, &method)| {
                let signature = self.tree.type_node(method).map_or("fn()", |t| t.display.as_str());
                let mut line = signature.replacen("fn", &format!("fn {}", name), 1);
                let doc = ty.doc(name);
                if !doc.is_empty() {
                    line.push('\n');
                    line.push_str(doc);
                }
                line
            })
            .collect();
        let tooltip = if lines.is_empty() {
            "any".to_string()
        } else {
            lines.join("\n")
        };

        let mut attrs = Attrs::new();
        attrs.insert("arrowhead", "onormal".into());
        attrs.insert("label", "implement".into());
        attrs.insert("labeltooltip", tooltip);
        if !merged {
            attrs.insert("style", "dashed".into());
        }
        for &dst in value.elements.values() {
            self.edge(src, dst, attrs.clone());
        }
    }
}

fn pointer_marker(flags: EdgeFlags) -> &'static str {
    if flags.contains(EdgeFlags::POINTER) {
        "*"
    } else {
        ""
    }
}

/// Rust-style definition of a struct type, with pointer markers taken from
/// the edges of `value`.
///
/// The catalog holds pointer-stripped types only, so a field left nil in
/// `value` has no edge and shows its pointee type without a marker.
fn struct_definition(tree: &Tree, value: &ValueNode, ty: &TypeNode) -> String {
    let name = if ty.name.is_empty() { &ty.display } else { &ty.name };
    let fields: Vec<(&str, String, bool)> = ty
        .elements
        .iter()
        .map(|(key, &field_ty)| {
            let shown = tree.type_node(field_ty).map_or("_", |t| t.display.as_str());
            (
                key.as_str(),
                format!("{}{}", pointer_marker(value.flags(key)), shown),
                ty.is_anonymous(key),
            )
        })
        .collect();

    if fields.is_empty() {
        return format!("struct {};", name);
    }
    if fields.iter().all(|(_, _, anonymous)| *anonymous) {
        let types: Vec<&str> = fields.iter().map(|(_, shown, _)| shown.as_str()).collect();
        return format!("struct {}({});", name, types.join(", "));
    }

    let mut out = format!("struct {} {{\n", name);
    for (key, shown, anonymous) in &fields {
        if *anonymous {
            out.push_str(&format!("    {},\n", shown));
        } else {
            out.push_str(&format!("    {}: {},\n", key, shown));
        }
    }
    out.push('}');
    out
}

fn attr_list(attrs: &Attrs) -> String {
    let pairs: Vec<String> = attrs
        .iter()
        .map(|(key, value)| format!("{}=\"{}\"", key, escape(value)))
        .collect();
    format!("[{}]", pairs.join(" "))
}

/// Escapes a DOT quoted string. Newlines become the `\n` escape.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

/// Plain DOT identifier when possible, quoted string otherwise.
fn graph_id(name: &str) -> String {
    let plain = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", escape(name))
    }
}
