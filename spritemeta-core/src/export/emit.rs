//! Block-style YAML emitter with flow-style vectors.
//!
//! Layout rules, matching what the authoring tool writes:
//!
//! ```text
//! key: scalar
//! vec: {x: 1, y: 2}
//! map:
//!   child: 1
//! list:
//! - first: 1        <- sequence at the key's indent, first entry inline
//!   second: 2
//! - - {x: 0, y: 0}  <- nested sequences open on the same line
//!   - {x: 1, y: 0}
//! empty: []
//! ```

use crate::math::{Vec2, Vec3, Vec4};

/// A vector rendered as an inline `{x: .., y: ..}` mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlowVector {
    V2(Vec2),
    V3(Vec3),
    V4(Vec4),
}

impl FlowVector {
    pub fn render(&self) -> String {
        match *self {
            FlowVector::V2(v) => format!("{{x: {}, y: {}}}", float(v.x), float(v.y)),
            FlowVector::V3(v) => {
                format!("{{x: {}, y: {}, z: {}}}", float(v.x), float(v.y), float(v.z))
            }
            FlowVector::V4(v) => format!(
                "{{x: {}, y: {}, z: {}, w: {}}}",
                float(v.x),
                float(v.y),
                float(v.z),
                float(v.w)
            ),
        }
    }
}

impl From<Vec2> for FlowVector {
    fn from(v: Vec2) -> Self { FlowVector::V2(v) }
}
impl From<Vec3> for FlowVector {
    fn from(v: Vec3) -> Self { FlowVector::V3(v) }
}
impl From<Vec4> for FlowVector {
    fn from(v: Vec4) -> Self { FlowVector::V4(v) }
}

/// Document tree. Map entries keep insertion order.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Already-rendered scalar text.
    Scalar(String),
    Vector(FlowVector),
    Map(Vec<(String, Node)>),
    Seq(Vec<Node>),
}

impl Node {
    pub fn int(v: i64) -> Self { Node::Scalar(v.to_string()) }
    pub fn float(v: f32) -> Self { Node::Scalar(float(v)) }
    pub fn bool(v: bool) -> Self { Node::int(v as i64) }
    pub fn str(s: &str) -> Self { Node::Scalar(string(s)) }
    pub fn vector(v: impl Into<FlowVector>) -> Self { Node::Vector(v.into()) }
    pub fn seq<T>(items: impl IntoIterator<Item = T>, f: impl Fn(T) -> Node) -> Self {
        Node::Seq(items.into_iter().map(f).collect())
    }
}

/// Ordered map builder.
#[derive(Debug, Default)]
pub struct MapBuilder(Vec<(String, Node)>);

impl MapBuilder {
    pub fn new() -> Self { Self::default() }

    pub fn entry(mut self, key: impl Into<String>, value: Node) -> Self {
        self.0.push((key.into(), value));
        self
    }

    pub fn build(self) -> Node { Node::Map(self.0) }
}

/// `-0` prints as `0`; non-finite values use YAML's special forms.
pub fn float(v: f32) -> String {
    if v.is_nan() {
        ".nan".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { ".inf".to_string() } else { "-.inf".to_string() }
    } else if v == 0.0 {
        "0".to_string()
    } else {
        v.to_string()
    }
}

/// Plain scalar when YAML allows it, quoted otherwise.
pub fn string(s: &str) -> String {
    match serde_yaml::to_string(s) {
        Ok(text) => {
            let text = text.trim_end_matches('\n');
            if text.contains('\n') { json_quoted(s) } else { text.to_string() }
        }
        Err(_) => json_quoted(s),
    }
}

fn json_quoted(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "''".to_string())
}

pub fn to_string(root: &Node) -> String {
    let mut e = Emitter { out: String::new() };
    match root {
        Node::Map(entries) => {
            for (k, v) in entries {
                e.entry(String::new(), k, v, 0);
            }
        }
        other => e.item(String::new(), other, 0),
    }
    e.out
}

struct Emitter {
    out: String,
}

impl Emitter {
    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// `lead` is the text preceding the key on its first line; `col` is the
    /// key's column.
    fn entry(&mut self, lead: String, key: &str, value: &Node, col: usize) {
        let head = format!("{lead}{key}:");
        match value {
            Node::Scalar(s) => self.line(&format!("{head} {s}")),
            Node::Vector(v) => self.line(&format!("{head} {}", v.render())),
            Node::Map(entries) if entries.is_empty() => self.line(&format!("{head} {{}}")),
            Node::Seq(items) if items.is_empty() => self.line(&format!("{head} []")),
            Node::Map(entries) => {
                self.line(&head);
                for (k, v) in entries {
                    self.entry(pad(col + 2), k, v, col + 2);
                }
            }
            Node::Seq(items) => {
                self.line(&head);
                for item in items {
                    self.item(pad(col), item, col);
                }
            }
        }
    }

    /// `col` is the column of the dash.
    fn item(&mut self, lead: String, value: &Node, col: usize) {
        let mut head = lead;
        head.push_str("- ");
        match value {
            Node::Scalar(s) => self.line(&format!("{head}{s}")),
            Node::Vector(v) => self.line(&format!("{head}{}", v.render())),
            Node::Map(entries) if entries.is_empty() => self.line(&format!("{head}{{}}")),
            Node::Seq(items) if items.is_empty() => self.line(&format!("{head}[]")),
            Node::Map(entries) => {
                for (i, (k, v)) in entries.iter().enumerate() {
                    let lead = if i == 0 { head.clone() } else { pad(col + 2) };
                    self.entry(lead, k, v, col + 2);
                }
            }
            Node::Seq(items) => {
                for (i, item) in items.iter().enumerate() {
                    let lead = if i == 0 { head.clone() } else { pad(col + 2) };
                    self.item(lead, item, col + 2);
                }
            }
        }
    }
}

fn pad(n: usize) -> String { " ".repeat(n) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_vectors_by_arity() {
        assert_eq!(FlowVector::V2(Vec2::new(0.5, -1.0)).render(), "{x: 0.5, y: -1}");
        assert_eq!(FlowVector::V3(Vec3::new(1.0, 2.0, 0.0)).render(), "{x: 1, y: 2, z: 0}");
        assert_eq!(FlowVector::V4(Vec4::W).render(), "{x: 0, y: 0, z: 0, w: 1}");
    }

    #[test]
    fn float_forms() {
        assert_eq!(float(-0.0), "0");
        assert_eq!(float(-0.125), "-0.125");
        assert_eq!(float(100.0), "100");
        assert_eq!(float(f32::NAN), ".nan");
        assert_eq!(float(f32::NEG_INFINITY), "-.inf");
    }

    #[test]
    fn strings_are_quoted_only_when_needed() {
        assert_eq!(string("hero_0"), "hero_0");
        assert_eq!(string(""), "''");
        assert_eq!(string("true"), "'true'");
        assert_eq!(string("a\nb"), "\"a\\nb\"");
    }

    #[test]
    fn nested_layout() {
        let doc = MapBuilder::new()
            .entry("a", Node::int(1))
            .entry("m", MapBuilder::new().entry("v", Node::vector(Vec2::ONE)).build())
            .entry("empty", Node::Seq(Vec::new()))
            .entry("none", Node::Map(Vec::new()))
            .entry(
                "list",
                Node::Seq(vec![
                    MapBuilder::new().entry("k", Node::int(1)).entry("j", Node::int(2)).build(),
                ]),
            )
            .entry(
                "tris",
                Node::Seq(vec![Node::Seq(vec![Node::vector(Vec2::ZERO), Node::vector(Vec2::X)])]),
            )
            .build();
        let expected = "\
a: 1
m:
  v: {x: 1, y: 1}
empty: []
none: {}
list:
- k: 1
  j: 2
tris:
- - {x: 0, y: 0}
  - {x: 1, y: 0}
";
        assert_eq!(to_string(&doc), expected);
        let parsed: serde_yaml::Value = serde_yaml::from_str(expected).unwrap();
        assert_eq!(parsed["tris"][0][1]["x"].as_i64(), Some(1));
    }
}
