//! Prefix rules and path rewriting.

use url::Url;

use crate::config::ProxyRuleConfig;
use crate::proxy::ProxyError;

/// One compiled forwarding rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRule {
    pub prefix: String,
    pub target: Url,
    /// Rewrite `Host` to the upstream authority.
    pub change_origin: bool,
    /// Verify the upstream TLS certificate.
    pub secure: bool,
}

impl ProxyRule {
    pub fn from_config(config: &ProxyRuleConfig) -> Result<Self, ProxyError> {
        let target = Url::parse(&config.target).map_err(|source| ProxyError::InvalidTarget {
            prefix: config.prefix.clone(),
            source,
        })?;
        Ok(Self {
            prefix: config.prefix.clone(),
            target,
            change_origin: config.change_origin,
            secure: config.secure,
        })
    }

    /// Plain string prefix test; `/gdexfoo` is claimed by `/gdex` too.
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    /// Path left after stripping the prefix, always starting with `/`.
    pub fn strip(&self, path: &str) -> String {
        let rest = path.strip_prefix(self.prefix.as_str()).unwrap_or(path);
        if rest.starts_with('/') {
            rest.to_string()
        } else {
            format!("/{}", rest)
        }
    }

    /// Upstream URL for a request path and optional query.
    pub fn upstream_url(&self, path: &str, query: Option<&str>) -> Url {
        let base = self.target.path().trim_end_matches('/');
        let mut url = self.target.clone();
        url.set_path(&format!("{}{}", base, self.strip(path)));
        url.set_query(query);
        url
    }

    /// `host[:port]` of the upstream, for the rewritten `Host` header.
    pub fn authority(&self) -> String {
        let host = self.target.host_str().unwrap_or_default();
        match self.target.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }
}

/// Ordered rule set. First matching prefix wins.
#[derive(Debug, Clone, Default)]
pub struct ProxyTable {
    rules: Vec<ProxyRule>,
}

impl ProxyTable {
    pub fn new(rules: Vec<ProxyRule>) -> Self {
        Self { rules }
    }

    pub fn from_config(rules: &[ProxyRuleConfig]) -> Result<Self, ProxyError> {
        let rules = rules
            .iter()
            .map(ProxyRule::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn find(&self, path: &str) -> Option<&ProxyRule> {
        self.rules.iter().find(|rule| rule.matches(path))
    }

    pub fn rules(&self) -> &[ProxyRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
