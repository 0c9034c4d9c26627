//! Topic filters: MQTT-style wildcard patterns over `/`-separated paths.
//!
//! - `nav/tabs` matches exactly that path
//! - `nav/+` matches one level under `nav/`
//! - `nav/#` matches `nav` itself and everything below it
//! - `#` matches every path

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Exact(String),
    One,
    Rest,
}

/// A parsed subscription or handler pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicFilter {
    raw: String,
    segments: Vec<Segment>,
}

impl TopicFilter {
    /// Parse a pattern. A `#` anywhere but the last level swallows the
    /// remaining levels of the pattern.
    pub fn parse(pattern: &str) -> Self {
        let mut segments = Vec::new();
        for part in pattern.split('/').filter(|s| !s.is_empty()) {
            match part {
                "+" => segments.push(Segment::One),
                "#" => {
                    segments.push(Segment::Rest);
                    break;
                }
                other => segments.push(Segment::Exact(other.to_string())),
            }
        }
        Self { raw: pattern.to_string(), segments }
    }

    /// Whether `topic` (a concrete path, no wildcards) matches this filter.
    pub fn matches(&self, topic: &str) -> bool {
        let mut levels = topic.split('/').filter(|s| !s.is_empty());
        for segment in &self.segments {
            match segment {
                Segment::Rest => return true,
                Segment::One => {
                    if levels.next().is_none() {
                        return false;
                    }
                }
                Segment::Exact(want) => match levels.next() {
                    Some(level) if level == want => {}
                    _ => return false,
                },
            }
        }
        levels.next().is_none()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for TopicFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
