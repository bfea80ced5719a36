use crate::shared::Result;
use std::borrow::Cow;

/// Maximum accepted purl length (security limit)
const MAX_PURL_LENGTH: usize = 2048;

/// Qualifier that marks a Debian source package purl
const SOURCE_ARCH_QUALIFIER: &str = "arch=source";

/// Parsed package URL (`pkg:<type>/<namespace>/<name>@<version>?<qualifiers>#<subpath>`)
///
/// The raw string is kept verbatim: it is the external identifier written to the
/// registry, so it must never be re-rendered from the parsed parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purl {
    raw: String,
    purl_type: String,
    namespace: Option<String>,
    name: String,
    version: Option<String>,
    qualifiers: Vec<(String, String)>,
}

impl Purl {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.len() > MAX_PURL_LENGTH {
            anyhow::bail!(
                "Purl is too long ({} bytes). Maximum allowed: {} bytes",
                raw.len(),
                MAX_PURL_LENGTH
            );
        }

        let Some(rest) = raw.strip_prefix("pkg:") else {
            anyhow::bail!("Purl '{}' does not start with 'pkg:'", raw);
        };

        let rest = rest.split_once('#').map_or(rest, |(head, _subpath)| head);
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };

        // '@' separates the version only after the last path segment starts,
        // npm scopes may carry an unencoded '@' in the namespace.
        let last_slash = path.rfind('/').unwrap_or(0);
        let (path, version) = match path[last_slash..].rfind('@') {
            Some(at) => {
                let at = last_slash + at;
                (&path[..at], Some(decode(&path[at + 1..]).into_owned()))
            }
            None => (path, None),
        };

        let mut segments = path.trim_matches('/').split('/');
        let purl_type = segments
            .next()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| anyhow::anyhow!("Purl '{}' has no package type", raw))?
            .to_lowercase();
        let segments: Vec<&str> = segments.filter(|s| !s.is_empty()).collect();
        let Some((name, namespace)) = segments.split_last() else {
            anyhow::bail!("Purl '{}' has no package name", raw);
        };

        let namespace = if namespace.is_empty() {
            None
        } else {
            Some(
                namespace
                    .iter()
                    .map(|s| decode(s).into_owned())
                    .collect::<Vec<_>>()
                    .join("/"),
            )
        };

        let qualifiers = query
            .map(|q| {
                q.split('&')
                    .filter_map(|pair| pair.split_once('='))
                    .map(|(k, v)| (k.to_lowercase(), decode(v).into_owned()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            raw: raw.to_string(),
            purl_type,
            namespace,
            name: decode(name).into_owned(),
            version: version.filter(|v| !v.is_empty()),
            qualifiers,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn purl_type(&self) -> &str {
        &self.purl_type
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn qualifier(&self, key: &str) -> Option<&str> {
        self.qualifiers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_debian_family(&self) -> bool {
        is_debian_type(&self.purl_type)
    }

    /// Whether both purls name the same package, ignoring version and qualifiers
    ///
    /// The Debian namespace is the distribution vendor, not part of the
    /// package name, so it is not compared for Debian-family purls.
    pub fn same_package(&self, other: &Purl) -> bool {
        if self.purl_type != other.purl_type || !self.name.eq_ignore_ascii_case(&other.name) {
            return false;
        }
        if self.is_debian_family() {
            return true;
        }
        let scope = |p: &Purl| p.namespace().map(|ns| ns.trim_start_matches('@').to_lowercase());
        scope(self) == scope(other)
    }
}

impl std::fmt::Display for Purl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn is_debian_type(purl_type: &str) -> bool {
    purl_type.eq_ignore_ascii_case("deb")
}

/// Returns the lowercase package type of a raw purl without a full parse.
pub fn purl_type_of(raw: &str) -> Option<String> {
    let rest = raw.trim().strip_prefix("pkg:")?;
    let end = rest.find(['/', '@', '?']).unwrap_or(rest.len());
    let purl_type = &rest[..end];
    (!purl_type.is_empty()).then(|| purl_type.to_lowercase())
}

/// Whether a raw purl string denotes a Debian-family package.
pub fn is_debian_purl(raw: &str) -> bool {
    purl_type_of(raw).is_some_and(|t| is_debian_type(&t))
}

/// Percent-decodes a purl, falling back to the input when it is not valid UTF-8.
pub fn decode(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}

/// Removes the `arch=source` qualifier from a Debian purl.
///
/// Returns `None` when the purl is not Debian-family or carries no such qualifier.
pub fn strip_source_arch(raw: &str) -> Option<String> {
    if !is_debian_purl(raw) {
        return None;
    }

    let (base, query) = raw.split_once('?')?;
    let remaining: Vec<&str> = query
        .split('&')
        .filter(|pair| *pair != SOURCE_ARCH_QUALIFIER)
        .collect();

    if remaining.len() == query.split('&').count() {
        return None;
    }

    if remaining.is_empty() {
        Some(base.to_string())
    } else {
        Some(format!("{}?{}", base, remaining.join("&")))
    }
}
