//! Rendering a [`TopologyGraph`] through Graphviz.
//!
//! The graph is always serialised to DOT first. For [`RenderFormat::Dot`] that
//! text is the output; every other format is produced by piping it through
//! the Graphviz `dot` executable with the requested layout engine.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;
use std::thread;

use petgraph::dot::{Config, Dot};
use tracing::{debug, info};

use crate::error::{Result, TopologyError};
use crate::graph::TopologyGraph;

/// Default Graphviz layout engine.
pub const DEFAULT_LAYOUT: &str = "sfdp";

/// Default Graphviz executable.
pub const DEFAULT_ENGINE: &str = "dot";

/// Output format of a rendered topology.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RenderFormat {
    /// Graphviz source.
    Dot,
    /// Scalable vector graphics.
    #[default]
    Svg,
    /// PNG image.
    Png,
    /// JPEG image.
    Jpg,
    /// DOT with layout information.
    Xdot,
}

impl RenderFormat {
    /// All supported formats.
    pub const ALL: [Self; 5] = [Self::Dot, Self::Svg, Self::Png, Self::Jpg, Self::Xdot];

    /// Graphviz `-T` name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Xdot => "xdot",
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unsupported output format {s:?}, expected one of: dot, svg, png, jpg, xdot"))
    }
}

/// Caller-selected rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Output format.
    pub format: RenderFormat,
    /// Graphviz layout engine (`sfdp`, `dot`, `neato`, ...).
    pub layout: String,
    /// Graphviz executable.
    pub engine: PathBuf,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: RenderFormat::default(),
            layout: DEFAULT_LAYOUT.to_string(),
            engine: PathBuf::from(DEFAULT_ENGINE),
        }
    }
}

impl RenderOptions {
    /// Options with the given format and layout and the default engine.
    pub fn new(format: RenderFormat, layout: impl Into<String>) -> Self {
        Self {
            format,
            layout: layout.into(),
            ..Self::default()
        }
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialises `graph` as an undirected DOT graph.
#[must_use]
pub fn to_dot(graph: &TopologyGraph, layout: &str) -> String {
    let inner = graph.inner();
    let body = Dot::with_attr_getters(
        inner,
        &[Config::GraphContentOnly, Config::NodeNoLabel, Config::EdgeNoLabel],
        &|_, _| "arrowhead=none, arrowtail=none ".to_string(),
        &|_, (_, node)| {
            format!(
                "label=\"{}\", tooltip=\"{}\", fillcolor=\"{}\" ",
                escape(&node.name),
                escape(&node.tooltip),
                node.fill_color,
            )
        },
    )
    .to_string();

    format!(
        "graph topology {{\n    layout=\"{}\"\n    node [style=filled]\n{body}}}\n",
        escape(layout)
    )
}

/// Renders `graph` and writes the result to `out`.
pub fn render<W: Write>(graph: &TopologyGraph, options: &RenderOptions, out: &mut W) -> Result<()> {
    let bytes = render_bytes(graph, options)?;
    out.write_all(&bytes)
        .and_then(|()| out.flush())
        .map_err(|e| TopologyError::GraphConstruction(format!("failed to write diagram: {e}")))
}

/// Renders `graph` into the file at `path`.
pub fn render_to_file(graph: &TopologyGraph, options: &RenderOptions, path: &Path) -> Result<()> {
    let bytes = render_bytes(graph, options)?;
    std::fs::write(path, bytes).map_err(|e| {
        TopologyError::GraphConstruction(format!("failed to write {}: {e}", path.display()))
    })?;
    info!(path = %path.display(), format = %options.format, "wrote topology");
    Ok(())
}

/// Renders `graph` into memory.
pub fn render_bytes(graph: &TopologyGraph, options: &RenderOptions) -> Result<Vec<u8>> {
    let dot = to_dot(graph, &options.layout);
    if options.format == RenderFormat::Dot {
        return Ok(dot.into_bytes());
    }
    run_layout_engine(&dot, options)
}

fn run_layout_engine(dot: &str, options: &RenderOptions) -> Result<Vec<u8>> {
    debug!(
        engine = %options.engine.display(),
        layout = %options.layout,
        format = %options.format,
        "running layout engine"
    );

    let mut child = Command::new(&options.engine)
        .arg(format!("-K{}", options.layout))
        .arg(format!("-T{}", options.format))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            TopologyError::GraphConstruction(format!(
                "failed to start {}: {e}",
                options.engine.display()
            ))
        })?;

    // Feed stdin from its own thread while stdout and stderr are drained.
    let (output, sent) = thread::scope(|scope| {
        let writer = child
            .stdin
            .take()
            .map(|mut stdin| scope.spawn(move || stdin.write_all(dot.as_bytes())));
        let output = child.wait_with_output();
        let sent = writer.map_or(Ok(()), |handle| {
            handle
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")))
        });
        (output, sent)
    });

    let output = output.map_err(|e| {
        TopologyError::GraphConstruction(format!("layout engine did not finish: {e}"))
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TopologyError::GraphConstruction(format!(
            "layout engine exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    sent.map_err(|e| {
        TopologyError::GraphConstruction(format!("failed to send graph to layout engine: {e}"))
    })?;

    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TopologyBuilder;
    use crate::types::{Endpoint, EndpointRole};
    use test_case::test_case;

    fn endpoint(name: &str, role: EndpointRole) -> Endpoint {
        Endpoint {
            id: String::new(),
            name: name.into(),
            cluster: "bj".into(),
            role,
            external: false,
            public_addresses: vec!["1.1.1.1".into()],
            node_subnets: vec![],
            pod_subnets: vec![],
        }
    }

    fn sample() -> TopologyGraph {
        let mut builder = TopologyBuilder::new("bj");
        builder
            .add_endpoint(&endpoint("bj.connector", EndpointRole::Connector))
            .expect("add");
        builder
            .add_endpoint(&endpoint("bj.\"quoted\"", EndpointRole::EdgeNode))
            .expect("add");
        builder.link("bj.connector", "bj.\"quoted\"").expect("link");
        builder.finish()
    }

    #[test_case("dot", RenderFormat::Dot ; "dot")]
    #[test_case("SVG", RenderFormat::Svg ; "upper case")]
    #[test_case("xdot", RenderFormat::Xdot ; "xdot")]
    fn parses_format(input: &str, expected: RenderFormat) {
        assert_eq!(input.parse::<RenderFormat>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_format() {
        assert!("gif".parse::<RenderFormat>().is_err());
    }

    #[test]
    fn dot_output_is_undirected_and_styled() {
        let dot = to_dot(&sample(), "neato");

        assert!(dot.starts_with("graph topology {"));
        assert!(dot.contains("layout=\"neato\""));
        assert!(dot.contains("node [style=filled]"));
        assert!(dot.contains("label=\"bj.connector\""));
        assert!(dot.contains("fillcolor=\"forestgreen\""));
        assert!(dot.contains("fillcolor=\"darkseagreen3\""));
        assert!(dot.contains("label=\"bj.\\\"quoted\\\"\""));
        assert!(dot.contains("Public Addresses: 1.1.1.1"));
        assert!(dot.contains(" -- "));
        assert!(dot.contains("arrowhead=none"));
        assert!(!dot.contains("->"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn dot_format_skips_layout_engine() {
        let options = RenderOptions {
            format: RenderFormat::Dot,
            layout: DEFAULT_LAYOUT.into(),
            engine: PathBuf::from("/nonexistent/graphviz"),
        };
        let mut out = Vec::new();
        render(&sample(), &options, &mut out).expect("should render");
        assert!(String::from_utf8_lossy(&out).contains("bj.connector"));
    }

    #[test]
    fn missing_engine_is_graph_construction_error() {
        let options = RenderOptions {
            format: RenderFormat::Svg,
            layout: DEFAULT_LAYOUT.into(),
            engine: PathBuf::from("/nonexistent/graphviz"),
        };
        let err = render_bytes(&sample(), &options).expect_err("should fail");
        assert!(matches!(err, TopologyError::GraphConstruction(_)));
    }

    #[cfg(unix)]
    #[test]
    fn engine_exiting_early_reports_its_stderr() {
        let mut builder = TopologyBuilder::new("bj");
        builder
            .add_endpoint(&endpoint("bj.connector", EndpointRole::Connector))
            .expect("add");
        for i in 0..3000 {
            let name = format!("bj.edge-node-{i:05}");
            builder.add_endpoint(&endpoint(&name, EndpointRole::EdgeNode)).expect("add");
            builder.link("bj.connector", &name).expect("link");
        }
        let graph = builder.finish();
        assert!(to_dot(&graph, DEFAULT_LAYOUT).len() > 256 * 1024);

        // cat rejects -K and exits without reading its input.
        let options = RenderOptions {
            format: RenderFormat::Svg,
            layout: DEFAULT_LAYOUT.into(),
            engine: PathBuf::from("cat"),
        };
        let err = render_bytes(&graph, &options).expect_err("should fail");
        let message = err.to_string();
        assert!(message.contains("layout engine exited with"), "{message}");
        assert!(!message.contains("failed to send graph"), "{message}");
    }

    #[test]
    fn escape_handles_quotes_and_newlines() {
        assert_eq!(escape("a\"b\nc\\"), "a\\\"b\\nc\\\\");
    }
}
