// ── Topology resolver ──

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Server name -> hypervisor snapshot supplied by the orchestrator.
///
/// Read-only for the engines; callers refresh it before each operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostMap {
    servers: BTreeMap<String, String>,
}

impl HostMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from hypervisor -> member servers, the shape the agent reports.
    pub fn from_membership<I, S>(membership: I) -> Self
    where
        I: IntoIterator<Item = (String, S)>,
        S: IntoIterator<Item = String>,
    {
        let mut map = Self::new();
        for (hypervisor, servers) in membership {
            for server in servers {
                map.insert(server, hypervisor.clone());
            }
        }
        map
    }

    pub fn insert(&mut self, server: impl Into<String>, hypervisor: impl Into<String>) {
        self.servers.insert(server.into(), hypervisor.into());
    }

    /// Hypervisor currently running `server`, if known.
    pub fn belongs_to(&self, server: &str) -> Option<&str> {
        self.servers.get(server).map(String::as_str)
    }

    /// Like [`belongs_to`](Self::belongs_to), failing with `UnresolvedServer`.
    pub fn resolve(&self, server: &str) -> Result<&str, CoreError> {
        self.belongs_to(server)
            .ok_or_else(|| CoreError::UnresolvedServer {
                server: server.to_owned(),
            })
    }

    /// Servers whose name contains any of `ids`, with their hypervisor.
    pub fn matching<'a>(&'a self, ids: &[String]) -> Vec<(&'a str, &'a str)> {
        self.iter()
            .filter(|(server, _)| ids.iter().any(|id| server.contains(id.as_str())))
            .collect()
    }

    /// `(server, hypervisor)` pairs in server-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.servers
            .iter()
            .map(|(server, hypervisor)| (server.as_str(), hypervisor.as_str()))
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

impl FromIterator<(String, String)> for HostMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            servers: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn hosts() -> HostMap {
        HostMap::from_membership([
            ("hv-A".to_owned(), vec!["web-1".to_owned(), "web-2".to_owned()]),
            ("hv-B".to_owned(), vec!["db-1".to_owned()]),
        ])
    }

    #[test]
    fn resolves_server_to_hypervisor() {
        let hosts = hosts();
        assert_eq!(hosts.resolve("web-2").unwrap(), "hv-A");
        assert_eq!(hosts.belongs_to("db-1"), Some("hv-B"));
        assert_eq!(hosts.len(), 3);
    }

    #[test]
    fn unknown_server_is_unresolved() {
        let err = hosts().resolve("cache-1").unwrap_err();
        assert!(matches!(err, CoreError::UnresolvedServer { ref server } if server == "cache-1"));
    }

    #[test]
    fn matching_uses_substring_containment() {
        let hosts = hosts();
        let matched = hosts.matching(&["web".to_owned()]);
        assert_eq!(matched, vec![("web-1", "hv-A"), ("web-2", "hv-A")]);
        assert!(hosts.matching(&["cache".to_owned()]).is_empty());
    }

    #[test]
    fn deserializes_from_flat_object() {
        let hosts: HostMap =
            serde_json::from_str(r#"{ "web-1": "hv-A", "db-1": "hv-B" }"#).unwrap();
        assert_eq!(hosts.belongs_to("web-1"), Some("hv-A"));
    }
}
