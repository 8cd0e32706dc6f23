//! GML serialisation of a flattened network.
//!
//! The layout follows the common `graph [ node [ ... ] edge [ ... ] ]`
//! dialect: nodes carry an integer `id` and a `label`, edges refer to node
//! ids through `source` and `target`. Absent attributes are omitted.
//! Strings escape `&` and `"` as `&amp;` and `&quot;`.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::{self, Read, Write};

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use crate::bond::BondOrder;
use crate::element::Element;
use crate::error::GmlError;
use crate::flatten::{FlatEdge, FlatGraph, FlatNode};
use crate::network::{CompoundId, TransitionType};

pub fn write_gml<W: Write>(graph: &FlatGraph, mut out: W) -> io::Result<()> {
    let mut pairs = HashSet::with_capacity(graph.edge_count());
    let multigraph = !graph
        .edge_references()
        .all(|e| pairs.insert((e.source(), e.target())));

    writeln!(out, "graph [")?;
    writeln!(out, "  directed 1")?;
    if multigraph {
        writeln!(out, "  multigraph 1")?;
    }

    for idx in graph.node_indices() {
        let node = &graph[idx];
        writeln!(out, "  node [")?;
        writeln!(out, "    id {}", idx.index())?;
        writeln!(out, "    label {}", Quoted(&node.label))?;
        writeln!(out, "    element {}", Quoted(node.element.symbol()))?;
        if let Some(charge) = node.charge {
            writeln!(out, "    charge {charge}")?;
        }
        if let Some(isotope) = node.isotope {
            writeln!(out, "    isotope {isotope}")?;
        }
        if let Some(hcount) = node.hcount {
            writeln!(out, "    hcount {hcount}")?;
        }
        if let Some(id) = node.compound_id {
            writeln!(out, "    compound_id {id}")?;
        }
        if let Some(name) = &node.compound_name {
            writeln!(out, "    compound_name {}", Quoted(name))?;
        }
        writeln!(out, "  ]")?;
    }

    for edge in graph.edge_references() {
        let weight = edge.weight();
        writeln!(out, "  edge [")?;
        writeln!(out, "    source {}", edge.source().index())?;
        writeln!(out, "    target {}", edge.target().index())?;
        writeln!(out, "    transition {}", Quoted(weight.transition.as_str()))?;
        if let Some(order) = weight.order {
            writeln!(out, "    order {:?}", order.value())?;
        }
        if let Some(id) = weight.compound_id {
            writeln!(out, "    compound_id {id}")?;
        }
        if let Some(name) = &weight.compound_name {
            writeln!(out, "    compound_name {}", Quoted(name))?;
        }
        if let Some(moving) = weight.moving_atom {
            writeln!(out, "    moving_atom {moving}")?;
        }
        if let Some(ids) = &weight.reaction_ids {
            writeln!(out, "    reaction_ids {}", Quoted(ids))?;
        }
        writeln!(out, "  ]")?;
    }

    writeln!(out, "]")?;
    out.flush()
}

struct Quoted<'a>(&'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for ch in self.0.chars() {
            match ch {
                '&' => f.write_str("&amp;")?,
                '"' => f.write_str("&quot;")?,
                c => write!(f, "{c}")?,
            }
        }
        f.write_str("\"")
    }
}

pub fn read_gml<R: Read>(mut reader: R) -> Result<FlatGraph, GmlError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_gml(&text)
}

/// Parses a document written by [`write_gml`]. Unknown keys are ignored.
pub fn parse_gml(text: &str) -> Result<FlatGraph, GmlError> {
    let tokens = tokenize(text)?;
    let mut pos = 0;
    let document = parse_list(&tokens, &mut pos, false)?;

    let graph = document
        .iter()
        .find_map(|(key, value)| match (key.as_str(), value) {
            ("graph", Value::List(entries)) => Some(entries),
            _ => None,
        })
        .ok_or(GmlError::MissingKey {
            block: "document",
            key: "graph",
        })?;

    let mut flat = FlatGraph::default();
    let mut ids: HashMap<i64, NodeIndex> = HashMap::new();

    for (key, value) in graph {
        let Value::List(entries) = value else {
            continue;
        };
        match key.as_str() {
            "node" => {
                let id: i64 = required(entries, "node", "id")?;
                if ids.contains_key(&id) {
                    return Err(GmlError::DuplicateNode { id });
                }
                let idx = flat.add_node(read_node(id, entries)?);
                ids.insert(id, idx);
            }
            "edge" => {
                let source: i64 = required(entries, "edge", "source")?;
                let target: i64 = required(entries, "edge", "target")?;
                let &from = ids.get(&source).ok_or(GmlError::UnknownNode { id: source })?;
                let &to = ids.get(&target).ok_or(GmlError::UnknownNode { id: target })?;
                flat.add_edge(from, to, read_edge(entries)?);
            }
            _ => {}
        }
    }
    Ok(flat)
}

fn read_node(id: i64, entries: &[(String, Value)]) -> Result<FlatNode, GmlError> {
    let element = match string(entries, "element")? {
        Some(symbol) => Element::from_symbol(&symbol).ok_or_else(|| GmlError::InvalidValue {
            key: "element".to_string(),
            value: symbol.clone(),
        })?,
        None => Element::Wildcard,
    };
    Ok(FlatNode {
        label: string(entries, "label")?.unwrap_or_else(|| id.to_string()),
        element,
        charge: integer(entries, "charge")?,
        isotope: integer(entries, "isotope")?,
        hcount: integer(entries, "hcount")?,
        compound_id: integer::<usize>(entries, "compound_id")?.map(CompoundId),
        compound_name: string(entries, "compound_name")?,
    })
}

fn read_edge(entries: &[(String, Value)]) -> Result<FlatEdge, GmlError> {
    let transition = string(entries, "transition")?.ok_or(GmlError::MissingKey {
        block: "edge",
        key: "transition",
    })?;
    let transition: TransitionType = transition.parse().map_err(|_| GmlError::InvalidValue {
        key: "transition".to_string(),
        value: transition.clone(),
    })?;

    let order = match lookup(entries, "order") {
        None => None,
        Some(value) => {
            let number = match value {
                Value::Float(f) => Some(*f),
                Value::Int(i) => Some(*i as f64),
                _ => None,
            };
            Some(number.and_then(BondOrder::from_value).ok_or_else(|| GmlError::InvalidValue {
                key: "order".to_string(),
                value: value.to_string(),
            })?)
        }
    };

    let reaction_ids = match lookup(entries, "reaction_ids") {
        Some(Value::Int(i)) => Some(i.to_string()),
        _ => string(entries, "reaction_ids")?,
    };

    Ok(FlatEdge {
        transition,
        order,
        compound_id: integer::<usize>(entries, "compound_id")?.map(CompoundId),
        compound_name: string(entries, "compound_name")?,
        moving_atom: integer(entries, "moving_atom")?,
        reaction_ids,
    })
}

fn lookup<'a>(entries: &'a [(String, Value)], key: &str) -> Option<&'a Value> {
    entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

fn invalid(key: &str, value: &Value) -> GmlError {
    GmlError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn integer<T: TryFrom<i64>>(entries: &[(String, Value)], key: &str) -> Result<Option<T>, GmlError> {
    match lookup(entries, key) {
        None => Ok(None),
        Some(value @ Value::Int(i)) => T::try_from(*i).map(Some).map_err(|_| invalid(key, value)),
        Some(value) => Err(invalid(key, value)),
    }
}

fn required<T: TryFrom<i64>>(
    entries: &[(String, Value)],
    block: &'static str,
    key: &'static str,
) -> Result<T, GmlError> {
    integer(entries, key)?.ok_or(GmlError::MissingKey { block, key })
}

fn string(entries: &[(String, Value)], key: &str) -> Result<Option<String>, GmlError> {
    match lookup(entries, key) {
        None => Ok(None),
        Some(Value::Str(s)) => Ok(Some(s.clone())),
        Some(value) => Err(invalid(key, value)),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<(String, Value)>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => write!(f, "{}", Quoted(s)),
            Value::List(_) => f.write_str("[...]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Key(String),
    Int(i64),
    Float(f64),
    Str(String),
    Open,
    Close,
}

fn tokenize(text: &str) -> Result<Vec<(usize, Token)>, GmlError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    let mut line = 1;

    while let Some(&ch) = chars.peek() {
        match ch {
            '\n' => {
                line += 1;
                chars.next();
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => {
                while chars.next_if(|&c| c != '\n').is_some() {}
            }
            '[' => {
                chars.next();
                tokens.push((line, Token::Open));
            }
            ']' => {
                chars.next();
                tokens.push((line, Token::Close));
            }
            '"' => {
                chars.next();
                let start = line;
                let mut raw = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(c) => {
                            if c == '\n' {
                                line += 1;
                            }
                            raw.push(c);
                        }
                        None => {
                            return Err(GmlError::Syntax {
                                line: start,
                                message: "unterminated string".to_string(),
                            })
                        }
                    }
                }
                tokens.push((start, Token::Str(unescape(&raw))));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut key = String::new();
                while let Some(c) = chars.next_if(|c| c.is_ascii_alphanumeric() || *c == '_') {
                    key.push(c);
                }
                tokens.push((line, Token::Key(key)));
            }
            c if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                let mut number = String::new();
                while let Some(c) =
                    chars.next_if(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
                {
                    number.push(c);
                }
                let token = if let Ok(i) = number.parse::<i64>() {
                    Token::Int(i)
                } else if let Ok(x) = number.parse::<f64>() {
                    Token::Float(x)
                } else {
                    return Err(GmlError::Syntax {
                        line,
                        message: format!("invalid number '{number}'"),
                    });
                };
                tokens.push((line, token));
            }
            c => {
                return Err(GmlError::Syntax {
                    line,
                    message: format!("unexpected character '{c}'"),
                })
            }
        }
    }
    Ok(tokens)
}

fn unescape(raw: &str) -> String {
    raw.replace("&quot;", "\"").replace("&amp;", "&")
}

fn parse_list(tokens: &[(usize, Token)], pos: &mut usize, nested: bool) -> Result<Vec<(String, Value)>, GmlError> {
    let mut entries = Vec::new();
    loop {
        let Some((line, token)) = tokens.get(*pos) else {
            if nested {
                let line = tokens.last().map_or(1, |(l, _)| *l);
                return Err(GmlError::Syntax {
                    line,
                    message: "unclosed '['".to_string(),
                });
            }
            return Ok(entries);
        };
        *pos += 1;

        let key = match token {
            Token::Key(key) => key.clone(),
            Token::Close if nested => return Ok(entries),
            other => {
                return Err(GmlError::Syntax {
                    line: *line,
                    message: format!("expected a key, found {other:?}"),
                })
            }
        };

        let Some((line, token)) = tokens.get(*pos) else {
            return Err(GmlError::Syntax {
                line: *line,
                message: format!("key '{key}' has no value"),
            });
        };
        *pos += 1;

        let value = match token {
            Token::Int(i) => Value::Int(*i),
            Token::Float(x) => Value::Float(*x),
            Token::Str(s) => Value::Str(s.clone()),
            Token::Open => Value::List(parse_list(tokens, pos, true)?),
            other => {
                return Err(GmlError::Syntax {
                    line: *line,
                    message: format!("expected a value for '{key}', found {other:?}"),
                })
            }
        };
        entries.push((key, value));
    }
}
