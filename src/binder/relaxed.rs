//! Relaxed ("loose") key matching and dotted-path parsing

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// One element of a dotted configuration key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A dot-separated name (`last-name`)
    Name(String),
    /// A numeric bracket index (`[0]`)
    Index(usize),
    /// A non-numeric bracket key (`[k1]`), kept verbatim
    Key(String),
}

impl PathSegment {
    /// The name, if this is a name segment
    pub fn as_name(&self) -> Option<&str> {
        match self {
            PathSegment::Name(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Name(name) => write!(f, "{}", name),
            PathSegment::Index(index) => write!(f, "[{}]", index),
            PathSegment::Key(key) => write!(f, "[{}]", key),
        }
    }
}

fn segment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\[([^\]]*)\]|([^.\[\]]+)").expect("segment pattern is valid")
    })
}

/// Drop `-` and `_` and lower-case, so `last-name`, `last_name` and `lastName` compare equal
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Loose equality of two names
pub fn matches(declared: &str, candidate: &str) -> bool {
    normalize(declared) == normalize(candidate)
}

/// Split a key such as `person.list[0]` or `person.maps[k.1]` into segments
pub fn parse_path(key: &str) -> Vec<PathSegment> {
    segment_pattern()
        .captures_iter(key)
        .filter_map(|caps| {
            if let Some(bracket) = caps.get(1) {
                let inner = bracket.as_str();
                Some(match inner.parse::<usize>() {
                    Ok(index) => PathSegment::Index(index),
                    Err(_) => PathSegment::Key(inner.to_string()),
                })
            } else {
                caps.get(2).map(|name| PathSegment::Name(name.as_str().to_string()))
            }
        })
        .collect()
}

/// If `path` starts with `prefix` (loosely), return the remaining segments
pub fn strip_prefix<'a>(path: &'a [PathSegment], prefix: &[PathSegment]) -> Option<&'a [PathSegment]> {
    if path.len() < prefix.len() {
        return None;
    }
    let (head, rest) = path.split_at(prefix.len());
    let all_match = head.iter().zip(prefix).all(|(segment, expected)| match (segment, expected) {
        (PathSegment::Name(a), PathSegment::Name(b)) => matches(b, a),
        (a, b) => a == b,
    });
    all_match.then_some(rest)
}

/// Rebuild dotted text from segments (`a.b[0]`)
pub fn render(segments: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        if let PathSegment::Name(name) = segment {
            if !out.is_empty() {
                out.push('.');
            }
            out.push_str(name);
        } else {
            out.push_str(&segment.to_string());
        }
    }
    out
}

/// Render a mapping sub-key; a leading bracket is written bare, so `[k1]` and `k1` name the same entry
pub fn render_sub_key(segments: &[PathSegment]) -> String {
    let (head, rest) = match segments.split_first() {
        Some((PathSegment::Key(key), rest)) => (key.clone(), rest),
        Some((PathSegment::Index(index), rest)) => (index.to_string(), rest),
        _ => return render(segments),
    };

    let tail = render(rest);
    if tail.is_empty() {
        head
    } else if tail.starts_with('[') {
        format!("{}{}", head, tail)
    } else {
        format!("{}.{}", head, tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("last-name"), "lastname");
        assert_eq!(normalize("last_name"), "lastname");
        assert_eq!(normalize("lastName"), "lastname");
        assert_eq!(normalize("LAST-NAME"), "lastname");
        assert!(matches("isOwner", "is-owner"));
        assert!(!matches("lastName", "firstName"));
    }

    #[test]
    fn test_parse_path() {
        assert_eq!(
            parse_path("person.list[0]"),
            vec![
                PathSegment::Name("person".to_string()),
                PathSegment::Name("list".to_string()),
                PathSegment::Index(0),
            ]
        );
        assert_eq!(
            parse_path("person.maps[k.1]"),
            vec![
                PathSegment::Name("person".to_string()),
                PathSegment::Name("maps".to_string()),
                PathSegment::Key("k.1".to_string()),
            ]
        );
        assert!(parse_path("").is_empty());
    }

    #[test]
    fn test_strip_prefix_is_loose() {
        let path = parse_path("Person.last-name");
        let prefix = parse_path("person");
        let rest = strip_prefix(&path, &prefix).unwrap();
        assert_eq!(rest, &[PathSegment::Name("last-name".to_string())]);

        assert!(strip_prefix(&parse_path("people.age"), &prefix).is_none());
        assert!(strip_prefix(&parse_path("app.person.age"), &parse_path("app.person")).is_some());
    }

    #[test]
    fn test_render() {
        assert_eq!(render(&parse_path("a.b[0].c")), "a.b[0].c");
        assert_eq!(render(&parse_path("k1")), "k1");
    }

    #[test]
    fn test_render_sub_key() {
        assert_eq!(render_sub_key(&parse_path("[k1]")), "k1");
        assert_eq!(render_sub_key(&parse_path("k1")), "k1");
        assert_eq!(render_sub_key(&parse_path("[k.1].x")), "k.1.x");
        assert_eq!(render_sub_key(&parse_path("[2][0]")), "2[0]");
        assert_eq!(render_sub_key(&parse_path("Some_Key.x")), "Some_Key.x");
    }
}
