//! Resource reference parsing and expansion
//!
//! Users may declare a global compute resource as a bare name, a relative
//! path, or a full self link. API payloads always carry the canonical
//! relative link; bare names resolve against the owning project.

use std::sync::LazyLock;

use regex::Regex;

use crate::compute::client::COMPUTE_API_BASE;
use crate::error::ComputeError;

static GLOBAL_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https://www\.googleapis\.com/compute/v1/)?projects/([^/]+)/global/([a-zA-Z]+)/([a-z0-9-]+)$",
    )
    .expect("valid regex")
});

static BARE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]([a-z0-9-]*[a-z0-9])?$").expect("valid regex"));

/// Parsed reference to a global compute resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLink {
    pub project: String,
    pub collection: String,
    pub name: String,
}

impl ResourceLink {
    /// Canonical relative path, the form sent in API payloads
    pub fn relative_link(&self) -> String {
        format!(
            "projects/{}/global/{}/{}",
            self.project, self.collection, self.name
        )
    }

    /// Canonical URI of the remote object
    pub fn self_link(&self) -> String {
        format!("{}/{}", COMPUTE_API_BASE, self.relative_link())
    }
}

/// Parse one reference against the expected collection. `default_project`
/// fills in for bare names.
pub fn parse_global_reference(
    value: &str,
    collection: &str,
    default_project: &str,
) -> Result<ResourceLink, ComputeError> {
    if let Some(caps) = GLOBAL_LINK_RE.captures(value) {
        let found = &caps[2];
        if found != collection {
            return Err(ComputeError::InvalidReference(format!(
                "expected a {} reference, got '{}'",
                collection, value
            )));
        }
        return Ok(ResourceLink {
            project: caps[1].to_string(),
            collection: collection.to_string(),
            name: caps[3].to_string(),
        });
    }

    if BARE_NAME_RE.is_match(value) {
        return Ok(ResourceLink {
            project: default_project.to_string(),
            collection: collection.to_string(),
            name: value.to_string(),
        });
    }

    Err(ComputeError::InvalidReference(format!(
        "'{}' is not a valid {} reference",
        value, collection
    )))
}

pub fn parse_ssl_certificate(
    value: &str,
    default_project: &str,
) -> Result<ResourceLink, ComputeError> {
    parse_global_reference(value, "sslCertificates", default_project)
}

pub fn parse_ssl_policy(value: &str, default_project: &str) -> Result<ResourceLink, ComputeError> {
    parse_global_reference(value, "sslPolicies", default_project)
}

/// Parse a stored remote identity. A relative or self link carries its own
/// project; a bare name needs a default, and its absence is a configuration
/// error rather than a parse error.
pub fn parse_identity(
    value: &str,
    collection: &str,
    default_project: Option<&str>,
) -> Result<ResourceLink, ComputeError> {
    if GLOBAL_LINK_RE.is_match(value) {
        return parse_global_reference(value, collection, "");
    }
    let project = default_project.ok_or(ComputeError::MissingProject)?;
    parse_global_reference(value, collection, project)
}

/// Expand declared certificate references into canonical relative links,
/// in declared order. Fails on the first unparsable element.
pub fn expand_ssl_certificates(
    declared: &[String],
    default_project: &str,
) -> Result<Vec<String>, ComputeError> {
    declared
        .iter()
        .map(|value| Ok(parse_ssl_certificate(value, default_project)?.relative_link()))
        .collect()
}

/// Whether two references point at the same resource, comparing by trailing
/// name so a bare name matches its self link or relative path.
pub fn same_reference(a: &str, b: &str) -> bool {
    let name = |s: &str| s.rsplit('/').next().map(String::from);
    name(a) == name(b)
}

/// Element-wise [`same_reference`] over two lists, order-sensitive
pub fn same_reference_list(a: &[String], b: &[String]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b.iter())
            .all(|(x, y)| same_reference(x, y))
}
