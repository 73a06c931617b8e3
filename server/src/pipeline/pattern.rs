//! Path patterns.
//!
//! Two flavours are used: plain `*` globs for gate include/exclude lists and
//! allow-lists, and segment patterns with `{var}` captures for routes.

use std::collections::HashMap;

/// `*` matches any run of characters, `/` included. Everything else is
/// literal, so `/css/*` matches `/css/app.css` and `/css/a/b.css` but not
/// `/css`.
pub fn simple_match(pattern: &str, text: &str) -> bool {
    let pattern = pattern.as_bytes();
    let text = text.as_bytes();

    let (mut p, mut t) = (0, 0);
    let mut star: Option<usize> = None;
    let mut resume = 0;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == b'*' {
            star = Some(p);
            p += 1;
            resume = t;
        } else if p < pattern.len() && pattern[p] == text[t] {
            p += 1;
            t += 1;
        } else if let Some(star_at) = star {
            p = star_at + 1;
            resume += 1;
            t = resume;
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|b| *b == b'*')
}

pub fn matches_any<S: AsRef<str>>(patterns: &[S], text: &str) -> bool {
    patterns
        .iter()
        .any(|pattern| simple_match(pattern.as_ref(), text))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Capture(String),
    /// `*`: exactly one segment.
    Any,
    /// `**`: the rest of the path, possibly empty. Only valid last.
    Rest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment {
                "*" => Segment::Any,
                "**" => Segment::Rest,
                s if s.len() > 2 && s.starts_with('{') && s.ends_with('}') => {
                    Segment::Capture(s[1..s.len() - 1].to_string())
                }
                s => Segment::Literal(s.to_string()),
            })
            .collect();

        Self {
            raw: pattern.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Captured variables when `path` matches.
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        let mut captures = HashMap::new();

        for (index, segment) in self.segments.iter().enumerate() {
            if *segment == Segment::Rest {
                return Some(captures);
            }

            let part = parts.get(index)?;
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Capture(name) => {
                    captures.insert(name.clone(), part.to_string());
                }
                Segment::Any | Segment::Rest => {}
            }
        }

        (parts.len() == self.segments.len()).then_some(captures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_match() {
        assert!(simple_match("/login", "/login"));
        assert!(!simple_match("/login", "/login/x"));
        assert!(simple_match("/css/*", "/css/anything"));
        assert!(simple_match("/css/*", "/css/a/b.css"));
        assert!(!simple_match("/css/*", "/css"));
        assert!(simple_match("/*.ico", "/favicon.ico"));
        assert!(simple_match("*", "/orders"));
        assert!(simple_match("/error-page/*", "/error-page/500"));
        assert!(simple_match("/a*c*e", "/abcde"));
        assert!(!simple_match("/a*c*e", "/abcdf"));
    }

    #[test]
    fn test_whitelist() {
        let whitelist = ["/", "/members/add", "/login", "/logout", "/css/*"];

        assert!(matches_any(&whitelist, "/"));
        assert!(matches_any(&whitelist, "/css/anything"));
        assert!(!matches_any(&whitelist, "/orders"));
        assert!(!matches_any(&whitelist, "/items/add"));
    }

    #[test]
    fn test_captures() {
        let pattern = PathPattern::parse("/api/members/{id}");

        let captures = pattern.matches("/api/members/user-ex").unwrap();
        assert_eq!(captures.get("id").map(String::as_str), Some("user-ex"));
        assert!(pattern.matches("/api/members").is_none());
        assert!(pattern.matches("/api/members/a/b").is_none());
    }

    #[test]
    fn test_root_and_wildcards() {
        assert!(PathPattern::parse("/").matches("/").is_some());
        assert!(PathPattern::parse("/").matches("/x").is_none());
        assert!(PathPattern::parse("/css/*").matches("/css/app.css").is_some());
        assert!(PathPattern::parse("/static/**").matches("/static/a/b/c").is_some());
        assert!(PathPattern::parse("/static/**").matches("/static").is_some());
    }
}
