//! Text formats for data graphs and GFDs.
//!
//! Graphs use a subset of the Graphviz DOT language:
//!
//! ```text
//! graph G {
//!   0 [label=person, name="Joel Coen"];
//!   1 [label=film, title=Fargo];
//!   0 -- 1 [label=directed];
//! }
//! ```
//!
//! Vertex ids are assigned in order of first appearance of a node name. The
//! `label` attribute becomes the vertex (or edge) label; `node_id` is identity
//! information and is not stored. Graph, node and edge default statements and
//! graph-level `key=value` assignments are accepted and ignored. Subgraphs are
//! not supported.
//!
//! A GFD file is two literal lines (premises, then conclusion) followed by the
//! pattern graph. Literals are whitespace-separated `lhs=rhs` pairs where each
//! side is either `<index>.<attribute>` or a constant.

use std::path::Path;

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::error::CoreError;
use crate::gfd::Gfd;
use crate::graph::{AttributedGraph, Edge, Vertex, LABEL_ATTRIBUTE};
use crate::literal::{Literal, Token};

/// Attribute carrying the DOT node name; consumed on read.
const NODE_ID_ATTRIBUTE: &str = "node_id";

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parses a graph in the DOT subset described in the module docs.
pub fn read_graph(text: &str) -> Result<AttributedGraph, CoreError> {
    parse_graph_text(text, 1)
}

/// Serializes a graph to the DOT subset. Vertices are named by their id.
pub fn write_graph(graph: &AttributedGraph) -> String {
    let mut out = String::from("graph G {\n");
    for v in graph.vertices() {
        let Some(vertex) = graph.vertex(v) else {
            continue;
        };
        out.push_str(&format!("  {} [label={}", v, quote(&vertex.label)));
        for (name, value) in &vertex.attributes {
            if name == LABEL_ATTRIBUTE || name == NODE_ID_ATTRIBUTE {
                continue;
            }
            out.push_str(&format!(", {}={}", quote(name), quote(value)));
        }
        out.push_str("];\n");
    }
    for (a, b, edge) in graph.edges() {
        out.push_str(&format!("  {} -- {} [label={}];\n", a, b, quote(&edge.label)));
    }
    out.push_str("}\n");
    out
}

/// Parses a GFD: premises line, conclusion line, then the pattern graph.
///
/// The result is checked by [`Gfd::new`], so out-of-range tokens and
/// disconnected patterns surface as [`CoreError::MalformedGfd`].
pub fn read_gfd(text: &str) -> Result<Gfd, CoreError> {
    let mut parts = text.splitn(3, '\n');
    let premises = parse_literals(parts.next().unwrap_or(""), 1)?;
    let conclusion = parse_literals(parts.next().unwrap_or(""), 2)?;
    let pattern = parse_graph_text(parts.next().unwrap_or(""), 3)?;
    Gfd::new(pattern, premises, conclusion)
}

/// Serializes a GFD in the format accepted by [`read_gfd`].
pub fn write_gfd(gfd: &Gfd) -> String {
    let mut out = write_literals(gfd.premises());
    out.push('\n');
    out.push_str(&write_literals(gfd.conclusion()));
    out.push('\n');
    out.push_str(&write_graph(gfd.pattern()));
    out
}

pub fn read_graph_file(path: impl AsRef<Path>) -> Result<AttributedGraph, CoreError> {
    read_graph(&read_text(path.as_ref())?)
}

pub fn read_gfd_file(path: impl AsRef<Path>) -> Result<Gfd, CoreError> {
    read_gfd(&read_text(path.as_ref())?)
}

fn read_text(path: &Path) -> Result<String, CoreError> {
    std::fs::read_to_string(path).map_err(|source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_error(line: usize, message: impl Into<String>) -> CoreError {
    CoreError::Parse {
        line,
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Literals
// ---------------------------------------------------------------------------

fn parse_literals(line_text: &str, line: usize) -> Result<Vec<Literal>, CoreError> {
    line_text
        .split_whitespace()
        .map(|pair| parse_literal(pair, line))
        .collect()
}

fn parse_literal(pair: &str, line: usize) -> Result<Literal, CoreError> {
    let (lhs, rhs) = pair
        .split_once('=')
        .ok_or_else(|| parse_error(line, format!("literal '{}' has no '='", pair)))?;
    if lhs.is_empty() || rhs.is_empty() {
        return Err(parse_error(line, format!("literal '{}' has an empty side", pair)));
    }
    Ok(Literal::new(parse_token(lhs), parse_token(rhs)))
}

/// `<usize>.<attribute>` is a vertex token; anything else is a constant.
fn parse_token(text: &str) -> Token {
    if let Some((prefix, attribute)) = text.split_once('.') {
        if let Ok(index) = prefix.parse::<usize>() {
            if !attribute.is_empty() {
                return Token::vertex(index, attribute);
            }
        }
    }
    Token::constant(text)
}

fn write_literals(literals: &[Literal]) -> String {
    literals
        .iter()
        .map(Literal::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// DOT lexer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    /// Bare identifier or numeral.
    Id(String),
    /// Double-quoted string, unescaped.
    Quoted(String),
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Eq,
    Comma,
    Semi,
    EdgeOp,
}

fn is_id_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.' || !c.is_ascii()
}

fn tokenize(text: &str, first_line: usize) -> Result<Vec<(Tok, usize)>, CoreError> {
    let mut out = Vec::new();
    let mut line = first_line;
    let mut line_start = true;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
            line_start = true;
            continue;
        }
        if c.is_whitespace() {
            continue;
        }
        let at_line_start = std::mem::replace(&mut line_start, false);
        match c {
            '#' if at_line_start => {
                while chars.peek().is_some_and(|&n| n != '\n') {
                    chars.next();
                }
            }
            '/' => match chars.next() {
                Some('/') => {
                    while chars.peek().is_some_and(|&n| n != '\n') {
                        chars.next();
                    }
                }
                Some('*') => {
                    let start = line;
                    let mut closed = false;
                    while let Some(n) = chars.next() {
                        match n {
                            '\n' => line += 1,
                            '*' if chars.peek() == Some(&'/') => {
                                chars.next();
                                closed = true;
                                break;
                            }
                            _ => {}
                        }
                    }
                    if !closed {
                        return Err(parse_error(start, "unterminated block comment"));
                    }
                }
                _ => return Err(parse_error(line, "unexpected '/'")),
            },
            '{' => out.push((Tok::LBrace, line)),
            '}' => out.push((Tok::RBrace, line)),
            '[' => out.push((Tok::LBracket, line)),
            ']' => out.push((Tok::RBracket, line)),
            '=' => out.push((Tok::Eq, line)),
            ',' => out.push((Tok::Comma, line)),
            ';' => out.push((Tok::Semi, line)),
            '-' => match chars.peek() {
                Some('-') | Some('>') => {
                    chars.next();
                    out.push((Tok::EdgeOp, line));
                }
                Some(&n) if n.is_ascii_digit() || n == '.' => {
                    let mut word = String::from('-');
                    while let Some(&n) = chars.peek().filter(|&&n| is_id_char(n)) {
                        word.push(n);
                        chars.next();
                    }
                    out.push((Tok::Id(word), line));
                }
                _ => return Err(parse_error(line, "unexpected '-'")),
            },
            '"' => {
                let start = line;
                let mut value = String::new();
                let mut closed = false;
                while let Some(n) = chars.next() {
                    match n {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => match chars.peek() {
                            Some(&e) if e == '"' || e == '\\' => {
                                value.push(e);
                                chars.next();
                            }
                            Some('\n') => {
                                // line continuation
                                chars.next();
                                line += 1;
                            }
                            _ => value.push('\\'),
                        },
                        '\n' => {
                            line += 1;
                            value.push('\n');
                        }
                        other => value.push(other),
                    }
                }
                if !closed {
                    return Err(parse_error(start, "unterminated string"));
                }
                out.push((Tok::Quoted(value), start));
            }
            c if is_id_char(c) => {
                let mut word = String::from(c);
                while let Some(&n) = chars.peek().filter(|&&n| is_id_char(n)) {
                    word.push(n);
                    chars.next();
                }
                out.push((Tok::Id(word), line));
            }
            other => return Err(parse_error(line, format!("unexpected character '{}'", other))),
        }
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// DOT parser
// ---------------------------------------------------------------------------

struct PendingEdge {
    a: String,
    b: String,
    label: String,
    line: usize,
}

/// Collects nodes and edges by name, then assigns positional ids.
#[derive(Default)]
struct GraphBuilder {
    nodes: IndexMap<String, IndexMap<String, String>>,
    edges: Vec<PendingEdge>,
}

impl GraphBuilder {
    fn touch(&mut self, name: &str) {
        if !self.nodes.contains_key(name) {
            self.nodes.insert(name.to_string(), IndexMap::new());
        }
    }

    fn node(&mut self, name: String, attrs: IndexMap<String, String>) {
        self.nodes.entry(name).or_default().extend(attrs);
    }

    fn build(self) -> Result<AttributedGraph, CoreError> {
        let mut graph = AttributedGraph::new();
        let mut ids = Vec::with_capacity(self.nodes.len());
        for attrs in self.nodes.values() {
            let mut attributes = attrs.clone();
            let label = attributes.shift_remove(LABEL_ATTRIBUTE).unwrap_or_default();
            attributes.shift_remove(NODE_ID_ATTRIBUTE);
            ids.push(graph.add_vertex(Vertex { label, attributes }));
        }
        for edge in self.edges {
            let lookup = |name: &str| {
                self.nodes
                    .get_index_of(name)
                    .map(|i| ids[i])
                    .ok_or_else(|| parse_error(edge.line, format!("unknown node '{}'", name)))
            };
            let a = lookup(&edge.a)?;
            let b = lookup(&edge.b)?;
            graph
                .add_edge(a, b, Edge::new(edge.label))
                .map_err(|err| parse_error(edge.line, err.to_string()))?;
        }
        Ok(graph)
    }
}

struct Parser {
    toks: Vec<(Tok, usize)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Tok> {
        self.toks.get(self.pos).map(|(t, _)| t)
    }

    fn line(&self) -> usize {
        self.toks
            .get(self.pos)
            .or_else(|| self.toks.last())
            .map(|(_, l)| *l)
            .unwrap_or(1)
    }

    fn bump(&mut self) -> Option<Tok> {
        let tok = self.toks.get(self.pos).map(|(t, _)| t.clone());
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, want: Tok, what: &str) -> Result<(), CoreError> {
        let line = self.line();
        match self.bump() {
            Some(tok) if tok == want => Ok(()),
            Some(tok) => Err(parse_error(line, format!("expected {}, found {:?}", what, tok))),
            None => Err(parse_error(line, format!("expected {}, found end of input", what))),
        }
    }

    fn ident(&mut self, what: &str) -> Result<String, CoreError> {
        let line = self.line();
        match self.bump() {
            Some(Tok::Id(s)) | Some(Tok::Quoted(s)) => Ok(s),
            Some(tok) => Err(parse_error(line, format!("expected {}, found {:?}", what, tok))),
            None => Err(parse_error(line, format!("expected {}, found end of input", what))),
        }
    }

    /// Returns the lowercased keyword if the next token is a bare identifier.
    fn keyword(&self) -> Option<String> {
        match self.peek() {
            Some(Tok::Id(s)) => Some(s.to_ascii_lowercase()),
            _ => None,
        }
    }

    fn graph(&mut self) -> Result<GraphBuilder, CoreError> {
        if self.keyword().as_deref() == Some("strict") {
            self.bump();
        }
        match self.keyword().as_deref() {
            Some("graph") | Some("digraph") => {
                self.bump();
            }
            _ => return Err(parse_error(self.line(), "expected 'graph' or 'digraph'")),
        }
        if matches!(self.peek(), Some(Tok::Id(_)) | Some(Tok::Quoted(_))) {
            self.bump();
        }
        self.expect(Tok::LBrace, "'{'")?;

        let mut builder = GraphBuilder::default();
        loop {
            match self.peek() {
                Some(Tok::RBrace) => {
                    self.bump();
                    break;
                }
                Some(Tok::Semi) => {
                    self.bump();
                }
                Some(_) => self.statement(&mut builder)?,
                None => return Err(parse_error(self.line(), "missing closing '}'")),
            }
        }
        if let Some(tok) = self.peek() {
            return Err(parse_error(
                self.line(),
                format!("unexpected {:?} after graph body", tok),
            ));
        }
        Ok(builder)
    }

    fn statement(&mut self, builder: &mut GraphBuilder) -> Result<(), CoreError> {
        let line = self.line();
        match self.keyword().as_deref() {
            Some("subgraph") => return Err(parse_error(line, "subgraphs are not supported")),
            Some("graph") | Some("node") | Some("edge") => {
                self.bump();
                self.attr_list()?;
                return Ok(());
            }
            _ => {}
        }

        let name = self.ident("node name")?;
        match self.peek() {
            Some(Tok::Eq) => {
                self.bump();
                self.ident("attribute value")?;
            }
            Some(Tok::EdgeOp) => {
                let mut chain: SmallVec<[String; 4]> = SmallVec::new();
                chain.push(name);
                while matches!(self.peek(), Some(Tok::EdgeOp)) {
                    self.bump();
                    chain.push(self.ident("node name")?);
                }
                let attrs = self.attr_list()?;
                let label = attrs.get(LABEL_ATTRIBUTE).cloned().unwrap_or_default();
                for node in &chain {
                    builder.touch(node);
                }
                for pair in chain.windows(2) {
                    builder.edges.push(PendingEdge {
                        a: pair[0].clone(),
                        b: pair[1].clone(),
                        label: label.clone(),
                        line,
                    });
                }
            }
            _ => {
                let attrs = self.attr_list()?;
                builder.node(name, attrs);
            }
        }
        Ok(())
    }

    /// Parses zero or more `[k=v, ...]` groups.
    fn attr_list(&mut self) -> Result<IndexMap<String, String>, CoreError> {
        let mut attrs = IndexMap::new();
        while matches!(self.peek(), Some(Tok::LBracket)) {
            self.bump();
            loop {
                match self.peek() {
                    Some(Tok::RBracket) => {
                        self.bump();
                        break;
                    }
                    Some(Tok::Comma) | Some(Tok::Semi) => {
                        self.bump();
                    }
                    _ => {
                        let key = self.ident("attribute name")?;
                        self.expect(Tok::Eq, "'='")?;
                        let value = self.ident("attribute value")?;
                        attrs.insert(key, value);
                    }
                }
            }
        }
        Ok(attrs)
    }
}

fn parse_graph_text(text: &str, first_line: usize) -> Result<AttributedGraph, CoreError> {
    let mut parser = Parser {
        toks: tokenize(text, first_line)?,
        pos: 0,
    };
    parser.graph()?.build()
}

// ---------------------------------------------------------------------------
// Writer helpers
// ---------------------------------------------------------------------------

const KEYWORDS: [&str; 6] = ["strict", "graph", "digraph", "node", "edge", "subgraph"];

fn is_plain(s: &str) -> bool {
    let mut chars = s.chars();
    let identifier = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    let numeral = !s.is_empty()
        && s.strip_prefix('-').unwrap_or(s).chars().all(|c| c.is_ascii_digit())
        && s != "-";
    (identifier && !KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(s))) || numeral
}

fn quote(s: &str) -> String {
    if is_plain(s) {
        s.to_string()
    } else {
        format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
    }
}
