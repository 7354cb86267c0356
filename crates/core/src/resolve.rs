//! Line resolver: decides, line by line across chips, whether a kernel line
//! matches one of the user's requested identifiers.
//!
//! Requests start unresolved and resolve on their first match. In non-strict
//! mode a resolved request is no longer checked; in strict mode it keeps
//! being checked so that a second line with the same name is reported as
//! ambiguous. The first match always stands.

use serde::Serialize;
use tracing::debug;

use crate::diagnostics::{Diagnostic, Diagnostics};

/// How a request identifies its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    ByName,
    /// Offset on the first scanned chip.
    ByOffset,
}

/// Policy knobs for a resolver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Treat every identifier as a name even if it parses as an offset.
    pub by_name: bool,
    /// Keep checking resolved requests to detect duplicate names.
    pub strict: bool,
    /// The scan is restricted to a single chip; offsets are only meaningful then.
    pub chip_scoped: bool,
}

/// One user-supplied identifier and its resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionRequest {
    pub identifier: String,
    pub mode: MatchMode,
    pub resolved: bool,
    pub matched_chip_index: Option<usize>,
    pub matched_offset: Option<u32>,
    #[serde(skip)]
    matched_chip_name: Option<String>,
    #[serde(skip)]
    offset: Option<u32>,
}

impl ResolutionRequest {
    fn new(identifier: &str, opts: &ResolveOptions) -> Self {
        let offset = if !opts.by_name && opts.chip_scoped {
            identifier.parse::<u32>().ok()
        } else {
            None
        };
        Self {
            identifier: identifier.to_string(),
            mode: if offset.is_some() { MatchMode::ByOffset } else { MatchMode::ByName },
            resolved: false,
            matched_chip_index: None,
            matched_offset: None,
            matched_chip_name: None,
            offset,
        }
    }

    fn matches(&self, chip_index: usize, offset: u32, name: Option<&str>) -> bool {
        match self.mode {
            MatchMode::ByOffset => chip_index == 0 && self.offset == Some(offset),
            MatchMode::ByName => name == Some(self.identifier.as_str()),
        }
    }
}

/// Resolver state for one run.
#[derive(Debug, Clone)]
pub struct LineResolver {
    requests: Vec<ResolutionRequest>,
    strict: bool,
    num_found: usize,
    diags: Diagnostics,
}

/// Outcome of a finished resolution pass.
#[derive(Debug, Clone, Serialize)]
pub struct ResolveSummary {
    pub requests: Vec<ResolutionRequest>,
    pub num_found: usize,
    pub diagnostics: Diagnostics,
    /// Every request resolved to exactly one line.
    pub success: bool,
}

impl LineResolver {
    /// Build a resolver for `identifiers`, in argument order. An empty list
    /// matches every line.
    pub fn new<S: AsRef<str>>(identifiers: &[S], opts: ResolveOptions) -> Self {
        let requests =
            identifiers.iter().map(|id| ResolutionRequest::new(id.as_ref(), &opts)).collect();
        Self { requests, strict: opts.strict, num_found: 0, diags: Diagnostics::new() }
    }

    pub fn requests(&self) -> &[ResolutionRequest] {
        &self.requests
    }

    /// True when no identifiers were requested.
    pub fn matches_everything(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn num_found(&self) -> usize {
        self.num_found
    }

    /// Every request is resolved and no further lines need checking.
    pub fn is_done(&self) -> bool {
        !self.strict && !self.requests.is_empty() && self.requests.iter().all(|r| r.resolved)
    }

    /// Visit one kernel line. Returns true when the line should be emitted.
    pub fn resolve_line(
        &mut self,
        chip_index: usize,
        chip_name: &str,
        offset: u32,
        name: Option<&str>,
    ) -> bool {
        if self.requests.is_empty() {
            self.num_found += 1;
            return true;
        }

        let mut claimed_by: Option<String> = None;
        for req in &mut self.requests {
            if req.resolved && !self.strict {
                continue;
            }
            if !req.matches(chip_index, offset, name) {
                continue;
            }
            if !req.resolved {
                debug!(identifier = %req.identifier, chip = chip_name, offset, "resolved line");
                req.resolved = true;
                req.matched_chip_index = Some(chip_index);
                req.matched_offset = Some(offset);
                req.matched_chip_name = Some(chip_name.to_string());
                match &claimed_by {
                    Some(first) => self.diags.push_quiet(Diagnostic::SameLineRequest {
                        first: first.clone(),
                        second: req.identifier.clone(),
                        chip: chip_name.to_string(),
                        offset,
                    }),
                    None => claimed_by = Some(req.identifier.clone()),
                }
            } else if req.matched_chip_index != Some(chip_index) || req.matched_offset != Some(offset) {
                self.diags.push_quiet(Diagnostic::AmbiguousNameMatch {
                    identifier: req.identifier.clone(),
                    first_chip: req.matched_chip_name.clone().unwrap_or_default(),
                    first_offset: req.matched_offset.unwrap_or_default(),
                    second_chip: chip_name.to_string(),
                    second_offset: offset,
                });
            }
        }

        // One emitted line counts once, however many requests it satisfies.
        let emit = claimed_by.is_some();
        if emit {
            self.num_found += 1;
        }
        emit
    }

    /// Close the pass, reporting every request that never matched.
    pub fn finish(self) -> ResolveSummary {
        let LineResolver { requests, num_found, mut diags, .. } = self;
        for req in requests.iter().filter(|r| !r.resolved) {
            diags.push_quiet(Diagnostic::UnresolvedRequest { identifier: req.identifier.clone() });
        }
        let ambiguous = diags.count(|d| matches!(d, Diagnostic::AmbiguousNameMatch { .. }));
        let success = requests.is_empty() || (num_found == requests.len() && ambiguous == 0);
        ResolveSummary { requests, num_found, diagnostics: diags, success }
    }
}
