//! Front-end route classification.
//!
//! # Responsibilities
//! - Decide, from the path alone, which upstream serves a request
//! - Rewrite namespace API paths for the local backend
//! - Strip the namespace for the dev server
//!
//! # Design Decisions
//! - Rules compiled once from config, immutable afterwards
//! - Evaluated in declaration order, first match wins:
//!   namespace API, dev tooling, namespace, root static files

use crate::config::FrontendConfig;
use crate::routing::matcher::{Matcher, PathPrefixMatcher, RootExtensionMatcher, SegmentPrefixMatcher};

/// Where a request should be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Served by the local API backend under the rewritten path.
    LocalApi(String),
    /// Forwarded to the front-end dev server under the given path.
    ExternalDevServer(String),
    /// Not part of the front-end namespace.
    NotApplicable,
}

#[derive(Debug)]
enum Rule {
    NamespaceApi {
        matcher: SegmentPrefixMatcher,
        rewrite_prefix: String,
    },
    Unchanged(Box<dyn Matcher>),
    Namespace(SegmentPrefixMatcher),
}

impl Rule {
    fn apply(&self, path: &str) -> Option<Disposition> {
        match self {
            Rule::NamespaceApi {
                matcher,
                rewrite_prefix,
            } => {
                let rest = matcher.strip(path)?;
                // `/web/api` on its own belongs to the dev server
                if rest.is_empty() {
                    return None;
                }
                Some(Disposition::LocalApi(format!("{}{}", rewrite_prefix, rest)))
            }
            Rule::Unchanged(matcher) => matcher
                .matches(path)
                .then(|| Disposition::ExternalDevServer(path.to_string())),
            Rule::Namespace(matcher) => {
                let rest = matcher.strip(path)?;
                let rest = if rest.is_empty() { "/" } else { rest };
                Some(Disposition::ExternalDevServer(rest.to_string()))
            }
        }
    }
}

/// A trailing `/` marks a directory: `/_next/` matches `/_next` and `/_next/...`
/// but not `/_nextish`. Without it the prefix is matched as raw text.
fn dev_tooling_matcher(prefix: &str) -> Box<dyn Matcher> {
    match prefix.strip_suffix('/') {
        Some(dir) => Box::new(SegmentPrefixMatcher::new(dir)),
        None => Box::new(PathPrefixMatcher::new(prefix)),
    }
}

/// Classifies request paths for the front-end bridge.
#[derive(Debug)]
pub struct RouteClassifier {
    rules: Vec<Rule>,
}

impl RouteClassifier {
    pub fn from_config(config: &FrontendConfig) -> Self {
        let mut rules = Vec::new();

        rules.push(Rule::NamespaceApi {
            matcher: SegmentPrefixMatcher::new(format!("{}{}", config.namespace, config.api_prefix)),
            rewrite_prefix: config.api_rewrite_prefix.clone(),
        });
        for prefix in &config.dev_tooling_prefixes {
            rules.push(Rule::Unchanged(dev_tooling_matcher(prefix)));
        }
        rules.push(Rule::Namespace(SegmentPrefixMatcher::new(config.namespace.clone())));
        if !config.static_extensions.is_empty() {
            rules.push(Rule::Unchanged(Box::new(RootExtensionMatcher::new(
                config.static_extensions.iter().cloned(),
            ))));
        }

        Self { rules }
    }

    /// Classify a request path (without query string).
    pub fn classify(&self, path: &str) -> Disposition {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(path))
            .unwrap_or(Disposition::NotApplicable)
    }
}
