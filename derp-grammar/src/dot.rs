//! Render grammars to graphviz `.dot` files.

use crate::language::Language;
use crate::node::{Grammar, Node, NodeId};
use crate::Alphabet;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io;
use std::io::Write;
use std::path::Path;

/// Settings related to rendering grammars.
#[derive(Clone, Debug)]
pub struct RenderSettings {
    /// Whether to mark the left and right operands of concatenations and unions
    pub show_edge_labels: bool,
    /// Whether to draw the derivatives computed so far, as dashed edges labelled with their token
    pub show_derivatives: bool,
    /// The title which should be displayed above the graph.
    ///
    /// Defaults to the filename given to [`Grammar::render_to`].
    pub title: Option<String>,
}

impl RenderSettings {
    /// Sets the name of the grammar
    pub fn with_name(mut self, name: impl AsRef<str>) -> Self {
        self.title = Some(name.as_ref().to_string());
        self
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            show_edge_labels: true,
            show_derivatives: false,
            title: None,
        }
    }
}

fn node_name(id: NodeId) -> String {
    format!("n{}", id.index())
}

fn escape_text(inp: &str) -> String {
    inp.replace('\\', "\\\\").replace('"', "\\\"")
}

impl<T: Alphabet> Grammar<T> {
    /// Draws every node reachable from `roots`.
    pub fn render<W: Write>(
        &self,
        roots: &[NodeId],
        output: &mut W,
        settings: &RenderSettings,
    ) -> io::Result<()> {
        let roots: Vec<_> = roots.iter().map(|&id| (id, None)).collect();
        self.render_roots(&roots, output, settings)
    }

    /// [`render`](Grammar::render) directly to a file.
    pub fn render_to(
        &self,
        roots: &[NodeId],
        path: impl AsRef<Path>,
        mut settings: RenderSettings,
    ) -> io::Result<()> {
        let path = path.as_ref();
        let mut w = File::create(path)?;

        if settings.title.is_none() {
            settings.title = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string());
        }

        self.render(roots, &mut w, &settings)
    }

    fn render_roots<W: Write>(
        &self,
        roots: &[(NodeId, Option<&str>)],
        output: &mut W,
        settings: &RenderSettings,
    ) -> io::Result<()> {
        let mut names: HashMap<NodeId, Vec<&str>> = HashMap::new();
        for (id, name) in roots {
            let entry = names.entry(*id).or_default();
            entry.extend(name);
        }

        writeln!(output, "digraph {{")?;
        writeln!(output, r#"node [fontname="monospace"]"#)?;

        if let Some(ref title) = settings.title {
            writeln!(output, r#"labelloc="t";"#)?;
            writeln!(output, r#"label="{}";"#, escape_text(title))?;
        }

        let start: Vec<_> = roots.iter().map(|(id, _)| *id).collect();
        for id in self.reachable(&start, settings.show_derivatives) {
            let name = node_name(id);
            let node = self.node(id);

            let mut attrs = Vec::new();
            let is_root = names.contains_key(&id);
            if is_root {
                attrs.push(r#"[shape="invhouse"]"#.to_string());
            } else if let Node::Terminal(_) = node {
                attrs.push(r#"[shape="box"]"#.to_string());
            }

            let label = match node {
                Node::Terminal(token) => token.to_string(),
                Node::Cat(..) => "CAT".to_string(),
                Node::Alt(..) => "ALT".to_string(),
                Node::Unbound => "?".to_string(),
            };
            attrs.push(format!(r#"[label="{}"]"#, escape_text(&label)));

            if node.is_unbound() {
                attrs.push(r#"[style="dashed"]"#.to_string());
            }
            if let Some(xlabel) = names.get(&id).filter(|n| !n.is_empty()) {
                attrs.push(format!(r#"[xlabel="{}"]"#, escape_text(&xlabel.join(", "))));
            }

            writeln!(output, "{name} {}", attrs.join(""))?;

            if let Some((l, r)) = node.children() {
                for (side, child) in [("L", l), ("R", r)] {
                    let child = node_name(child);
                    if settings.show_edge_labels {
                        writeln!(output, "{name} -> {child} [label=\"{side}\"]")?;
                    } else {
                        writeln!(output, "{name} -> {child}")?;
                    }
                }
            }

            if settings.show_derivatives {
                for (value, target) in self.sorted_derivatives(id) {
                    let target = node_name(target);
                    let label = escape_text(&value);
                    writeln!(
                        output,
                        "{name} -> {target} [style=\"dashed\"][label=\"{label}\"]"
                    )?;
                }
            }
        }

        writeln!(output, "}}")?;

        Ok(())
    }

    /// Nodes reachable from `roots`, in depth-first order, left operands first.
    fn reachable(&self, roots: &[NodeId], through_derivatives: bool) -> Vec<NodeId> {
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        let mut work_list: Vec<_> = roots.iter().rev().copied().collect();

        while let Some(id) = work_list.pop() {
            if !visited.insert(id) {
                continue;
            }
            order.push(id);

            if through_derivatives {
                let derivatives = self.sorted_derivatives(id);
                work_list.extend(derivatives.into_iter().rev().map(|(_, target)| target));
            }
            if let Some((l, r)) = self.node(id).children() {
                work_list.push(r);
                work_list.push(l);
            }
        }

        order
    }

    fn sorted_derivatives(&self, id: NodeId) -> Vec<(String, NodeId)> {
        let mut derivatives: Vec<_> = self.nodes[id.index()]
            .derivatives
            .iter()
            .map(|(value, target)| (format!("{value:?}"), *target))
            .collect();
        derivatives.sort();
        derivatives
    }
}

impl<T: Alphabet> Language<T> {
    /// Draws all nonterminals, labelled with their names.
    pub fn render<W: Write>(&self, output: &mut W, settings: &RenderSettings) -> io::Result<()> {
        let roots: Vec<_> = self.symbols().map(|(name, id)| (id, Some(name))).collect();
        self.grammar().render_roots(&roots, output, settings)
    }

    /// [`render`](Language::render) directly to a file.
    pub fn render_to(&self, path: impl AsRef<Path>, mut settings: RenderSettings) -> io::Result<()> {
        let path = path.as_ref();
        let mut w = File::create(path)?;

        if settings.title.is_none() {
            settings.title = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string());
        }

        self.render(&mut w, &settings)
    }
}
