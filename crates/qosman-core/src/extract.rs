// ── Link-quality extraction ──
//
// Walks VNF records to find which internal virtual links carry a
// minimum-bandwidth annotation, and which servers sit on those links.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreError;
use crate::model::{Quality, VnfRecord};

/// Annotation keys denoting a minimum-bandwidth guarantee. The first is the
/// historical misspelling orchestrators still emit.
pub const MINIMUM_BANDWIDTH_KEYS: &[&str] = &["minimum_bandwith", "minimum_bandwidth"];

/// A virtual link of one record and the quality it asks for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkQuality {
    pub vnfr_id: String,
    pub link_id: String,
    pub quality: Quality,
}

fn is_bandwidth_annotation(annotation: &str) -> bool {
    let key = annotation.split(':').next().unwrap_or_default().trim();
    MINIMUM_BANDWIDTH_KEYS.contains(&key)
}

/// Parse one `key:value` annotation already known to be a bandwidth one.
fn parse_annotation(record: &VnfRecord, link: &str, annotation: &str) -> Result<Quality, CoreError> {
    let malformed = || CoreError::MalformedQosAnnotation {
        record: record.id.clone(),
        link: link.to_owned(),
        annotation: annotation.to_owned(),
    };

    let parts: Vec<&str> = annotation.split(':').collect();
    let [_, value] = parts.as_slice() else {
        return Err(malformed());
    };
    let value = value.trim();
    if value.is_empty() {
        return Err(malformed());
    }
    Quality::classify(value)
}

/// Every (record, link) pair with a minimum-bandwidth annotation.
///
/// All bandwidth annotations on a link are validated; the first one decides
/// the link's quality. Any malformed annotation or unknown tag aborts.
pub fn link_qualities(records: &[VnfRecord]) -> Result<Vec<LinkQuality>, CoreError> {
    let mut tuples = Vec::new();
    for record in records {
        for link in &record.virtual_link {
            let mut chosen = None;
            for annotation in link.qos.iter().filter(|a| is_bandwidth_annotation(a)) {
                let quality = parse_annotation(record, &link.name, annotation)?;
                chosen.get_or_insert(quality);
            }
            if let Some(quality) = chosen {
                debug!(vnfr = %record.id, link = %link.name, %quality, "link carries QoS");
                tuples.push(LinkQuality {
                    vnfr_id: record.id.clone(),
                    link_id: link.name.clone(),
                    quality,
                });
            }
        }
    }
    Ok(tuples)
}

/// Host names of deployment units attached to a QoS-annotated link of
/// their own record.
///
/// A unit is listed once per matching connection point, so the result may
/// contain duplicates; see [`dedup_servers`].
pub fn servers_with_qos(records: &[VnfRecord], tuples: &[LinkQuality]) -> Vec<String> {
    let mut servers = Vec::new();
    for record in records {
        let links: Vec<&str> = tuples
            .iter()
            .filter(|t| t.vnfr_id == record.id)
            .map(|t| t.link_id.as_str())
            .collect();
        if links.is_empty() {
            continue;
        }
        for vdu in &record.vdu {
            for component in &vdu.vnfc {
                for cp in &component.connection_point {
                    if links.contains(&cp.virtual_link_reference.as_str()) {
                        servers.push(vdu.hostname.clone());
                    }
                }
            }
        }
    }
    servers
}

/// Extract tuples and discover servers in one pass over `records`.
pub fn removal_targets(records: &[VnfRecord]) -> Result<Vec<String>, CoreError> {
    let tuples = link_qualities(records)?;
    Ok(servers_with_qos(records, &tuples))
}

/// Order-preserving deduplication.
pub fn dedup_servers(servers: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(servers.len());
    for server in servers {
        if !unique.contains(server) {
            unique.push(server.clone());
        }
    }
    unique
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Component, ConnectionPoint, DeploymentUnit, InternalVirtualLink};
    use pretty_assertions::assert_eq;

    fn record(id: &str, hostname: &str, link: &str, qos: &[&str], cps: usize) -> VnfRecord {
        VnfRecord {
            id: id.into(),
            name: format!("{id}-name"),
            vdu: vec![DeploymentUnit {
                id: None,
                hostname: hostname.into(),
                vnfc: vec![Component {
                    connection_point: (0..cps)
                        .map(|_| ConnectionPoint {
                            virtual_link_reference: link.into(),
                        })
                        .collect(),
                }],
            }],
            virtual_link: vec![InternalVirtualLink {
                name: link.into(),
                qos: qos.iter().map(|s| (*s).to_owned()).collect(),
            }],
        }
    }

    #[test]
    fn shared_link_yields_both_servers() {
        let records = vec![
            record("r1", "s1", "vl-1", &["minimum_bandwith:HIGH"], 1),
            record("r2", "s2", "vl-1", &["minimum_bandwith:HIGH"], 1),
        ];
        let tuples = link_qualities(&records).unwrap();
        assert_eq!(tuples.len(), 2);
        assert!(tuples.iter().all(|t| t.quality == Quality::High));

        let mut servers = servers_with_qos(&records, &tuples);
        servers.sort();
        assert_eq!(servers, vec!["s1".to_owned(), "s2".to_owned()]);
    }

    #[test]
    fn discovery_is_idempotent_and_keeps_duplicates() {
        let records = vec![record("r1", "s1", "vl-1", &["minimum_bandwidth:LOW"], 2)];
        let first = removal_targets(&records).unwrap();
        let second = removal_targets(&records).unwrap();
        assert_eq!(first, vec!["s1".to_owned(), "s1".to_owned()]);
        assert_eq!(first, second);
        assert_eq!(dedup_servers(&first), vec!["s1".to_owned()]);
    }

    #[test]
    fn other_annotations_are_ignored() {
        let records = vec![record("r1", "s1", "vl-1", &["maximum_latency:10", "jitter"], 1)];
        assert!(link_qualities(&records).unwrap().is_empty());
        assert!(removal_targets(&records).unwrap().is_empty());
    }

    #[test]
    fn links_of_other_records_do_not_match() {
        let mut records = vec![
            record("r1", "s1", "vl-1", &["minimum_bandwith:MEDIUM"], 1),
            record("r2", "s2", "vl-1", &[], 1),
        ];
        records[1].virtual_link.clear();
        let targets = removal_targets(&records).unwrap();
        assert_eq!(targets, vec!["s1".to_owned()]);
    }

    #[test]
    fn malformed_annotations_are_surfaced() {
        for bad in ["minimum_bandwith", "minimum_bandwith:", "minimum_bandwith:HIGH:x"] {
            let records = vec![record("r1", "s1", "vl-1", &[bad], 1)];
            let err = link_qualities(&records).unwrap_err();
            assert!(
                matches!(err, CoreError::MalformedQosAnnotation { ref annotation, .. } if annotation == bad),
                "{bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn unknown_tag_is_surfaced() {
        let records = vec![record("r1", "s1", "vl-1", &["minimum_bandwith:GOLD"], 1)];
        assert!(matches!(
            link_qualities(&records),
            Err(CoreError::UnknownQualityTag { .. })
        ));
    }
}
