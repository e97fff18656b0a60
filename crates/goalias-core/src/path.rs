//! Path mapper - versioned package path to profile path
//!
//! A versioned package lives at
//! `<prefix>/service/<provider>[/management]/<version>/<resource>`; its alias
//! for a profile lives at `<prefix>/profile/<name>/<provider>[/management]/<resource>`.
//! The version segment is dropped, which is what makes a profile path stable.
//!
//! The layout is a regex with named capture groups and can be replaced to
//! fit another repository convention.

use regex::Regex;

use crate::error::{AliasError, Result};

/// Default layout: `service/<provider>[/management]/<version>/<resource>`,
/// where the version is `YYYY-MM-DD[-preview]` or `vN[.N...]`.
pub const DEFAULT_PATTERN: &str = r"^(?P<prefix>.*?/)?service/(?P<provider>[^/]+)/(?:(?P<management>management)/)?(?P<version>\d{4}-\d{2}-\d{2}(?:-preview)?|v\d+(?:\.\d+)*)/(?P<resource>[^/]+)$";

/// Segment inserted in front of the profile name
pub const DEFAULT_PROFILE_SEGMENT: &str = "profile";

const REQUIRED_GROUPS: [&str; 3] = ["provider", "version", "resource"];

/// Maps versioned package paths onto profile paths
#[derive(Debug, Clone)]
pub struct PathMapper {
    pattern: Regex,
    root: Option<String>,
    segment: String,
}

impl Default for PathMapper {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_PATTERN).expect("default path pattern is valid"),
            root: None,
            segment: DEFAULT_PROFILE_SEGMENT.to_string(),
        }
    }
}

impl PathMapper {
    /// Create a mapper from a layout pattern.
    ///
    /// The pattern must define the `provider`, `version` and `resource`
    /// groups; `prefix` and `management` are optional.
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| AliasError::InvalidPattern(e.to_string()))?;
        for group in REQUIRED_GROUPS {
            if !pattern.capture_names().flatten().any(|name| name == group) {
                return Err(AliasError::InvalidPattern(format!(
                    "missing capture group `{group}`"
                )));
            }
        }
        Ok(Self {
            pattern,
            ..Self::default()
        })
    }

    /// Root prefix stripped before matching and restored in the result.
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        let root = normalize(&root.into());
        self.root = (!root.is_empty()).then_some(root);
        self
    }

    /// Segment inserted in front of the profile name (default `profile`).
    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = segment.into();
        self
    }

    /// Map `source` onto its location under `profile`.
    pub fn map_path(&self, source: &str, profile: &str) -> Result<String> {
        if profile.is_empty() || profile.contains(['/', '\\']) {
            return Err(AliasError::InvalidProfileName(profile.to_string()));
        }

        let source = normalize(source);
        let (root, rest) = self.split_root(&source);

        let captures = self
            .pattern
            .captures(rest)
            .ok_or_else(|| AliasError::PathShapeMismatch {
                path: source.clone(),
            })?;
        let group = |name: &str| captures.name(name).map(|m| m.as_str());

        let (Some(provider), Some(resource)) = (group("provider"), group("resource")) else {
            return Err(AliasError::PathShapeMismatch { path: source.clone() });
        };

        let mut segments: Vec<&str> = Vec::new();
        if let Some(root) = root {
            segments.push(root);
        }
        if let Some(prefix) = group("prefix") {
            segments.push(prefix.trim_end_matches('/'));
        }
        segments.extend([self.segment.as_str(), profile, provider]);
        if let Some(management) = group("management") {
            segments.push(management);
        }
        segments.push(resource);

        Ok(segments.join("/"))
    }

    /// Split off the configured root when `path` starts with it on a segment
    /// boundary.
    fn split_root<'p>(&'p self, path: &'p str) -> (Option<&'p str>, &'p str) {
        if let Some(root) = &self.root {
            if let Some(rest) = path.strip_prefix(root.as_str()) {
                if rest.is_empty() || rest.starts_with('/') || root.ends_with('/') {
                    return (Some(root.trim_end_matches('/')), rest.trim_start_matches('/'));
                }
            }
        }
        (None, path)
    }
}

/// Map `source` with the default layout.
pub fn map_path(source: &str, profile: &str) -> Result<String> {
    PathMapper::default().map_path(source, profile)
}

fn normalize(path: &str) -> String {
    let path = path.replace('\\', "/");
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && path.starts_with('/') {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}
