use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::TypeError;

/// One step into a value tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    /// A mapping key.
    Field(String),
    /// A sequence position.
    Index(usize),
}

/// Canonical address of a location inside a value tree.
///
/// The printed form joins field segments with `.` and renders index
/// segments as `[i]` directly after their parent, e.g. `servers[0].host`.
/// Field names that would make this ambiguous (empty, or containing any of
/// `.`, `[`, `]`, `"`, `\`) print as a quoted bracket segment such as
/// `labels["app.kubernetes.io/name"]`. The root path prints as the empty
/// string. Printing and parsing round-trip.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// This path extended by a field segment.
    pub fn child(&self, field: impl Into<String>) -> Self {
        self.with(Segment::Field(field.into()))
    }

    /// This path extended by an index segment.
    pub fn index(&self, i: usize) -> Self {
        self.with(Segment::Index(i))
    }

    fn with(&self, segment: Segment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments (depth below the root).
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_root()
    }

    /// The enclosing path, or `None` at the root.
    pub fn parent(&self) -> Option<Path> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            segments: rest.to_vec(),
        })
    }

    /// Returns `true` if `prefix` is this path or one of its ancestors.
    ///
    /// The comparison is segment-aligned: `user1` does not start with `user`.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

fn needs_quoting(name: &str) -> bool {
    name.is_empty() || name.bytes().any(is_reserved)
}

fn is_reserved(b: u8) -> bool {
    matches!(b, b'.' | b'[' | b']' | b'"' | b'\\')
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Index(i) => write!(f, "[{i}]")?,
                Segment::Field(name) if needs_quoting(name) => {
                    let quoted = serde_json::to_string(name).map_err(|_| fmt::Error)?;
                    write!(f, "[{quoted}]")?;
                }
                Segment::Field(name) => {
                    if pos > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = TypeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let bytes = input.as_bytes();
        let mut segments = Vec::new();
        let mut pos = 0;

        while pos < bytes.len() {
            let (segment, next) = match bytes[pos] {
                b'[' => parse_bracket(input, pos)?,
                b'.' if !segments.is_empty() => parse_bare(input, pos + 1)?,
                _ if segments.is_empty() => parse_bare(input, pos)?,
                other => {
                    return Err(TypeError::invalid_path(
                        input,
                        format!("expected '.' or '[' at offset {pos}, found {:?}", other as char),
                    ))
                }
            };
            segments.push(segment);
            pos = next;
        }

        Ok(Self { segments })
    }
}

/// Parse an unquoted field name starting at `start`.
fn parse_bare(input: &str, start: usize) -> Result<(Segment, usize), TypeError> {
    let bytes = input.as_bytes();
    let end = bytes[start..]
        .iter()
        .position(|b| is_reserved(*b))
        .map_or(bytes.len(), |offset| start + offset);

    if end == start {
        return Err(TypeError::invalid_path(
            input,
            format!("empty field name at offset {start}"),
        ));
    }
    if matches!(bytes.get(end), Some(b']' | b'"' | b'\\')) {
        return Err(TypeError::invalid_path(
            input,
            format!("unexpected {:?} at offset {end}", bytes[end] as char),
        ));
    }

    Ok((Segment::Field(input[start..end].to_string()), end))
}

/// Parse `[123]` or `["quoted"]` starting at the opening bracket.
fn parse_bracket(input: &str, open: usize) -> Result<(Segment, usize), TypeError> {
    let bytes = input.as_bytes();

    if bytes.get(open + 1) == Some(&b'"') {
        let mut i = open + 2;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 2,
                b'"' => break,
                _ => i += 1,
            }
        }
        if i >= bytes.len() {
            return Err(TypeError::invalid_path(input, "unterminated quoted field"));
        }
        if bytes.get(i + 1) != Some(&b']') {
            return Err(TypeError::invalid_path(
                input,
                format!("expected ']' at offset {}", i + 1),
            ));
        }
        let name: String = serde_json::from_str(&input[open + 1..=i])
            .map_err(|e| TypeError::invalid_path(input, e.to_string()))?;
        return Ok((Segment::Field(name), i + 2));
    }

    let close = bytes[open..]
        .iter()
        .position(|b| *b == b']')
        .map(|offset| open + offset)
        .ok_or_else(|| TypeError::invalid_path(input, "unterminated index"))?;
    let digits = &input[open + 1..close];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TypeError::invalid_path(
            input,
            format!("invalid index {digits:?}"),
        ));
    }
    let index = digits
        .parse()
        .map_err(|_| TypeError::invalid_path(input, format!("index {digits} out of range")))?;

    Ok((Segment::Index(index), close + 1))
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<Vec<Segment>> for Path {
    fn from(segments: Vec<Segment>) -> Self {
        Self { segments }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse(s: &str) -> Path {
        s.parse().unwrap()
    }

    #[test]
    fn root_prints_empty() {
        assert_eq!(Path::root().to_string(), "");
        assert!(Path::root().is_root());
        assert_eq!(parse(""), Path::root());
    }

    #[test]
    fn fields_join_with_dots() {
        let p = Path::root().child("user").child("address").child("city");
        assert_eq!(p.to_string(), "user.address.city");
    }

    #[test]
    fn indices_follow_parent_without_separator() {
        let p = Path::root().child("servers").index(0).child("host");
        assert_eq!(p.to_string(), "servers[0].host");
        assert_eq!(Path::root().index(3).to_string(), "[3]");
        assert_eq!(Path::root().index(1).index(2).to_string(), "[1][2]");
    }

    #[test]
    fn ambiguous_field_names_are_quoted() {
        let dotted = Path::root().child("a.b");
        let nested = Path::root().child("a").child("b");
        assert_eq!(dotted.to_string(), r#"["a.b"]"#);
        assert_ne!(dotted.to_string(), nested.to_string());

        let p = Path::root().child("labels").child("app.kubernetes.io/name");
        assert_eq!(p.to_string(), r#"labels["app.kubernetes.io/name"]"#);
        assert_eq!(Path::root().child("").to_string(), r#"[""]"#);
        assert_eq!(Path::root().child("[0]").to_string(), r#"["[0]"]"#);
    }

    #[test]
    fn parse_round_trips_printed_form() {
        for text in ["user.name", "items[2].id", "[0]", r#"a["b.c"].d"#, "a[1][2]"] {
            assert_eq!(parse(text).to_string(), text);
        }
    }

    #[test]
    fn parse_quoted_escape() {
        let p = parse(r#"["say \"hi\""]"#);
        assert_eq!(p.segments(), &[Segment::Field(r#"say "hi""#.into())]);
    }

    #[test]
    fn parse_rejects_malformed() {
        for bad in [".a", "a..b", "a.", "a[", "a[x]", "a[]", "a]b", r#"a["b"#, "a[0]b", "a[-1]"] {
            assert!(bad.parse::<Path>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn starts_with_is_segment_aligned() {
        let user = parse("user");
        assert!(parse("user").starts_with(&user));
        assert!(parse("user.name").starts_with(&user));
        assert!(parse("user[0]").starts_with(&user));
        assert!(!parse("user1").starts_with(&user));
        assert!(!parse("users.name").starts_with(&user));
        assert!(parse("anything").starts_with(&Path::root()));
    }

    #[test]
    fn parent_walks_up() {
        let p = parse("a.b[0]");
        assert_eq!(p.parent(), Some(parse("a.b")));
        assert_eq!(parse("a").parent(), Some(Path::root()));
        assert_eq!(Path::root().parent(), None);
    }

    #[test]
    fn serializes_as_string() {
        let p = parse("user.tags[1]");
        assert_eq!(serde_json::to_string(&p).unwrap(), r#""user.tags[1]""#);
    }

    fn segment() -> impl Strategy<Value = Segment> {
        prop_oneof![
            "[a-z.\\[\\]\"]{0,6}".prop_map(Segment::Field),
            (0usize..50).prop_map(Segment::Index),
        ]
    }

    proptest! {
        #[test]
        fn printed_form_round_trips(segments in prop::collection::vec(segment(), 0..6)) {
            let path = Path::from(segments);
            let reparsed: Path = path.to_string().parse().unwrap();
            prop_assert_eq!(reparsed, path);
        }
    }
}
