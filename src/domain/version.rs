//! Gem version numbers
//!
//! RubyGems versions are dot-separated segments of any length (`5.0`,
//! `5.2.4.1`, `6.0.0.rc1`). Runs of digits and runs of letters are separate
//! segments, so `rc10` is `"rc", 10`. Ordering follows RubyGems:
//! - trailing zeros are ignored, so `5.0` equals `5.0.0`
//! - missing segments count as zero
//! - a letter segment sorts below any number, which makes it a prerelease
//!
//! Each version is also mapped onto [`semver::Version`] for caret and tilde
//! ranges: the first three numbers become major/minor/patch, further numbers
//! become build metadata and everything from the first letter segment on
//! becomes the prerelease.

use crate::error::VersionError;
use regex::Regex;
use semver::{BuildMetadata, Prerelease, Version};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

// Same shape RubyGems accepts: leading number, then dot segments, optional `-pre` tail
static GEM_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+(?:\.[0-9A-Za-z]+)*(?:-[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?$").unwrap()
});

static SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+|[A-Za-z]+").unwrap());

/// One comparable piece of a gem version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Segment {
    Number(u64),
    Text(String),
}

impl Segment {
    const ZERO: Segment = Segment::Number(0);

    fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Segment::Number(a), Segment::Number(b)) => a.cmp(b),
            (Segment::Text(a), Segment::Text(b)) => a.cmp(b),
            (Segment::Text(_), Segment::Number(_)) => Ordering::Less,
            (Segment::Number(_), Segment::Text(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Number(n) => write!(f, "{}", n),
            Segment::Text(t) => write!(f, "{}", t),
        }
    }
}

/// A gem version, keeping the written form for display
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GemVersion {
    raw: String,
    segments: Vec<Segment>,
    semver: Version,
}

impl GemVersion {
    /// Parse a gem version string
    pub fn parse(value: &str) -> Result<Self, VersionError> {
        let raw = value.trim();
        if !GEM_VERSION_RE.is_match(raw) {
            return Err(VersionError::malformed(value));
        }

        // RubyGems treats `1.0.0-beta` as `1.0.0.pre.beta`
        let canonical = raw.replace('-', ".pre.");

        let segments = SEGMENT_RE
            .find_iter(&canonical)
            .map(|m| {
                let s = m.as_str();
                if s.starts_with(|c: char| c.is_ascii_digit()) {
                    s.parse()
                        .map(Segment::Number)
                        .map_err(|_| VersionError::malformed(value))
                } else {
                    Ok(Segment::Text(s.to_string()))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_segments(raw.to_string(), segments)
            .ok_or_else(|| VersionError::malformed(value))
    }

    fn from_segments(raw: String, segments: Vec<Segment>) -> Option<Self> {
        let split = prerelease_start(&segments);
        let release: Vec<u64> = segments[..split]
            .iter()
            .filter_map(|s| match s {
                Segment::Number(n) => Some(*n),
                Segment::Text(_) => None,
            })
            .collect();

        let component = |i: usize| release.get(i).copied().unwrap_or(0);
        let mut semver = Version::new(component(0), component(1), component(2));

        // Numbers print without leading zeros, which semver requires
        let pre = join(&segments[split..]);
        if !pre.is_empty() {
            semver.pre = Prerelease::new(&pre).ok()?;
        }

        let mut extra: Vec<Segment> = release.iter().skip(3).map(|n| Segment::Number(*n)).collect();
        while extra.last().is_some_and(Segment::is_zero) {
            extra.pop();
        }
        if !extra.is_empty() {
            semver.build = BuildMetadata::new(&join(&extra)).ok()?;
        }

        Some(Self {
            raw,
            segments,
            semver,
        })
    }

    /// Builds a version from release numbers only
    fn from_release(release: &[u64]) -> Self {
        let segments: Vec<Segment> = release.iter().map(|n| Segment::Number(*n)).collect();
        let raw = join(&segments);
        let component = |i: usize| release.get(i).copied().unwrap_or(0);
        let mut extra: Vec<u64> = release.iter().skip(3).copied().collect();
        while extra.last() == Some(&0) {
            extra.pop();
        }
        let mut semver = Version::new(component(0), component(1), component(2));
        if !extra.is_empty() {
            let build = extra.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(".");
            semver.build = BuildMetadata::new(&build).unwrap_or(BuildMetadata::EMPTY);
        }
        Self {
            raw,
            segments,
            semver,
        }
    }

    /// The version as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The semantic version used for caret and tilde ranges
    pub fn semver(&self) -> &Version {
        &self.semver
    }

    /// Returns true if this is a prerelease (any segment with a letter)
    pub fn is_prerelease(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Text(_)))
    }

    /// Numeric segments before any prerelease part
    pub fn release_segments(&self) -> Vec<u64> {
        self.segments[..prerelease_start(&self.segments)]
            .iter()
            .filter_map(|s| match s {
                Segment::Number(n) => Some(*n),
                Segment::Text(_) => None,
            })
            .collect()
    }

    /// The version with its prerelease part removed: `6.0.0.rc1` becomes `6.0.0`
    pub fn release(&self) -> GemVersion {
        if self.is_prerelease() {
            Self::from_release(&self.release_segments())
        } else {
            self.clone()
        }
    }

    /// Upper bound of a pessimistic (`~>`) constraint on this version
    ///
    /// Drops the prerelease part and the last release segment (if more than
    /// one), then increments the new last one: `5.0` becomes `6`, `5.0.1`
    /// becomes `5.1`, `6.0.0rc1` becomes `6.1`.
    pub fn bump(&self) -> GemVersion {
        let mut segments = self.release_segments();
        if segments.len() > 1 {
            segments.pop();
        }
        if let Some(last) = segments.last_mut() {
            *last += 1;
        }
        Self::from_release(&segments)
    }

    /// Segments with trailing zeros dropped from the release and prerelease parts
    fn canonical_segments(&self) -> Vec<&Segment> {
        let split = prerelease_start(&self.segments);
        let (release, pre) = self.segments.split_at(split);
        let trim = |part: &[Segment]| part.iter().rposition(|s| !s.is_zero()).map_or(0, |i| i + 1);
        release[..trim(release)]
            .iter()
            .chain(pre[..trim(pre)].iter())
            .collect()
    }
}

/// Index of the first letter segment, or the length when there is none
fn prerelease_start(segments: &[Segment]) -> usize {
    segments
        .iter()
        .position(|s| matches!(s, Segment::Text(_)))
        .unwrap_or(segments.len())
}

fn join(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

impl PartialEq for GemVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GemVersion {}

impl Hash for GemVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_segments().hash(state);
    }
}

impl Ord for GemVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.canonical_segments();
        let rhs = other.canonical_segments();
        let zero = Segment::ZERO;
        (0..lhs.len().max(rhs.len()))
            .map(|i| {
                let a = lhs.get(i).copied().unwrap_or(&zero);
                let b = rhs.get(i).copied().unwrap_or(&zero);
                a.cmp(b)
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for GemVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for GemVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl std::str::FromStr for GemVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for GemVersion {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<GemVersion> for String {
    fn from(version: GemVersion) -> Self {
        version.raw
    }
}
