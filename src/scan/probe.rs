use crate::{
    catalog::CatalogEntry,
    device::DeviceDescriptor,
    error::AppError,
    scan::sink::DeviceSink,
    snmp::{create_snmp_session, value::FromSnmpValue, SnmpScanParams},
    utils::parse_oid_to_vec,
};
use async_trait::async_trait;
use snmp2::{AsyncSession, Oid, Value};
use std::{net::Ipv4Addr, time::Duration};
use tracing::debug;

/// The well-known sysObjectID instance, whose value names the vendor MIB.
pub const SYS_OBJECT_ID: &str = ".1.3.6.1.2.1.1.2.0";

/// A decoded, validated GET response value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeValue {
    /// An OBJECT IDENTIFIER value, as numeric components.
    ObjectId(Vec<u64>),
    /// A printable string value.
    Text(String),
    /// Any other non-null value; readable, but carries no description.
    Other,
}

impl ProbeValue {
    fn text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// The outcome of one GET against a peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// A well-formed response for the requested OID.
    Valid(ProbeValue),
    /// The peer answered, but not usefully (error status, OID mismatch,
    /// null or exception value).
    Invalid,
    /// Nothing came back within the timeout.
    NoResponse,
}

/// The single operation the probe engine needs from a session.
///
/// Splitting this out keeps the identification protocol testable without a
/// live agent.
#[async_trait]
pub trait ProbeTransport {
    async fn get(&mut self, oid: &str) -> ProbeOutcome;
}

/// A [`ProbeTransport`] backed by a real SNMP session. Owned by exactly one
/// worker; the session closes when the probe is dropped.
pub struct SnmpProbe {
    session: AsyncSession,
    timeout: Duration,
    peer: Ipv4Addr,
}

impl SnmpProbe {
    /// Opens a session to the peer described by `params`.
    pub async fn open(params: &SnmpScanParams) -> Result<Self, AppError> {
        let session = create_snmp_session(params).await?;
        Ok(Self {
            session,
            timeout: params.timeout,
            peer: params.ip,
        })
    }
}

#[async_trait]
impl ProbeTransport for SnmpProbe {
    async fn get(&mut self, oid: &str) -> ProbeOutcome {
        let Ok(requested) = parse_oid_to_vec(oid) else {
            return ProbeOutcome::Invalid;
        };
        let Ok(name) = Oid::from(requested.as_slice()) else {
            return ProbeOutcome::Invalid;
        };

        let mut response = match tokio::time::timeout(self.timeout, self.session.get(&name)).await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                debug!(peer = %self.peer, oid, "SNMP GET failed: {e:?}");
                return ProbeOutcome::Invalid;
            }
            Err(_) => return ProbeOutcome::NoResponse,
        };

        let Some((response_oid, value)) = response.varbinds.next() else {
            return ProbeOutcome::Invalid;
        };
        if response_oid != name {
            return ProbeOutcome::Invalid;
        }

        match &value {
            Value::ObjectIdentifier(_) => match Vec::<u64>::from_snmp_value(&value) {
                Ok(objid) => ProbeOutcome::Valid(ProbeValue::ObjectId(objid)),
                Err(_) => ProbeOutcome::Invalid,
            },
            Value::OctetString(_) => match String::from_snmp_value(&value) {
                Ok(text) => ProbeOutcome::Valid(ProbeValue::Text(text)),
                Err(_) => ProbeOutcome::Invalid,
            },
            Value::Null | Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView => {
                ProbeOutcome::Invalid
            }
            _ => ProbeOutcome::Valid(ProbeValue::Other),
        }
    }
}

/// Identifies the MIB(s) a peer supports and publishes a descriptor for each.
///
/// Phase 1 reads `sysObjectID` and matches it against the catalog; a match
/// publishes immediately (optionally confirmed through the entry's probe
/// OID). Only when phase 1 identified nothing does phase 2 brute-force every
/// probe OID in the catalog. A peer that stays silent on the first GET is
/// skipped entirely.
pub async fn probe_host<T: ProbeTransport + Send>(
    transport: &mut T,
    params: &SnmpScanParams,
    catalog: &[CatalogEntry],
    sink: &DeviceSink,
) {
    debug!(peer = %params.ip, "probing sysObjectID");

    let sys_outcome = transport.get(SYS_OBJECT_ID).await;
    if sys_outcome == ProbeOutcome::NoResponse {
        return;
    }

    let mut mib_found: Option<String> = None;

    if let ProbeOutcome::Valid(ProbeValue::ObjectId(sysoid)) = sys_outcome {
        for entry in catalog.iter().filter(|e| e.has_sysoid()) {
            let Ok(expected) = parse_oid_to_vec(&entry.sysoid) else {
                continue;
            };
            if expected != sysoid {
                continue;
            }

            // Relevant sysOID. Without a complementary OID the match alone
            // is enough; otherwise the probe OID must confirm it.
            if !entry.has_probe_oid() {
                debug!(peer = %params.ip, mib = entry.mib, "sysObjectID match");
                sink.publish(DeviceDescriptor::new(params, &entry.mib, None));
                mib_found = Some(entry.sysoid.clone());
            } else if let ProbeOutcome::Valid(value) = transport.get(&entry.oid).await {
                debug!(peer = %params.ip, mib = entry.mib, "sysObjectID match confirmed");
                sink.publish(DeviceDescriptor::new(params, &entry.mib, value.text()));
                mib_found = Some(entry.mib.clone());
            }
        }
    }

    if mib_found.is_none() {
        try_all_oid(transport, params, catalog, mib_found.as_deref(), sink).await;
    }
}

/// Phase 2: walk the whole catalog and report every entry whose probe OID is
/// readable, except the MIB already found.
async fn try_all_oid<T: ProbeTransport + Send>(
    transport: &mut T,
    params: &SnmpScanParams,
    catalog: &[CatalogEntry],
    mib_found: Option<&str>,
    sink: &DeviceSink,
) {
    debug!(peer = %params.ip, "trying all known probe OIDs");

    for entry in catalog.iter().filter(|e| e.has_probe_oid()) {
        let ProbeOutcome::Valid(value) = transport.get(&entry.oid).await else {
            continue;
        };

        if mib_found != Some(entry.mib.as_str()) {
            debug!(peer = %params.ip, mib = entry.mib, "probe OID answered");
            sink.publish(DeviceDescriptor::new(params, &entry.mib, value.text()));
        } else {
            debug!(peer = %params.ip, mib = entry.mib, "skipping duplicated MIB");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockTransport {
        replies: Vec<(String, ProbeOutcome)>,
        requests: Vec<String>,
    }

    impl MockTransport {
        fn new() -> Self {
            Self {
                replies: Vec::new(),
                requests: Vec::new(),
            }
        }

        fn reply(mut self, oid: &str, outcome: ProbeOutcome) -> Self {
            self.replies.push((oid.to_string(), outcome));
            self
        }
    }

    #[async_trait]
    impl ProbeTransport for MockTransport {
        async fn get(&mut self, oid: &str) -> ProbeOutcome {
            self.requests.push(oid.to_string());
            self.replies
                .iter()
                .find(|(o, _)| o == oid)
                .map(|(_, outcome)| outcome.clone())
                .unwrap_or(ProbeOutcome::Invalid)
        }
    }

    fn entry(mib: &str, sysoid: &str, oid: &str) -> CatalogEntry {
        CatalogEntry {
            mib: mib.to_string(),
            sysoid: sysoid.to_string(),
            oid: oid.to_string(),
        }
    }

    fn params() -> SnmpScanParams {
        SnmpScanParams {
            ip: Ipv4Addr::new(10, 0, 0, 1),
            port: 161,
            timeout: Duration::from_secs(1),
            community: Some("public".to_string()),
            security_level: None,
            security_name: None,
            auth_password: None,
            auth_protocol: None,
            priv_password: None,
            priv_protocol: None,
        }
    }

    fn object_id(components: &[u64]) -> ProbeOutcome {
        ProbeOutcome::Valid(ProbeValue::ObjectId(components.to_vec()))
    }

    fn text(s: &str) -> ProbeOutcome {
        ProbeOutcome::Valid(ProbeValue::Text(s.to_string()))
    }

    #[tokio::test]
    async fn test_sysoid_match_without_probe_oid() {
        let catalog = vec![entry("ietf", ".1.3.6.1.4.1.1.1", "")];
        let mut transport =
            MockTransport::new().reply(SYS_OBJECT_ID, object_id(&[1, 3, 6, 1, 4, 1, 1, 1]));
        let sink = DeviceSink::new();

        probe_host(&mut transport, &params(), &catalog, &sink).await;

        let devices = sink.drain();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].port, "10.0.0.1");
        assert_eq!(devices[0].mib(), "ietf");
        assert_eq!(devices[0].option("community"), Some("public"));
        assert_eq!(devices[0].option("desc"), None);

        // The sysObjectID GET was the only request.
        assert_eq!(transport.requests, vec![SYS_OBJECT_ID.to_string()]);
    }

    #[tokio::test]
    async fn test_sysoid_match_confirmed_by_probe_oid() {
        let catalog = vec![entry("apcc", ".1.3.6.1.4.1.318", ".1.3.6.1.4.1.318.1.1.1.1.1.1.0")];
        let mut transport = MockTransport::new()
            .reply(SYS_OBJECT_ID, object_id(&[1, 3, 6, 1, 4, 1, 318]))
            .reply(".1.3.6.1.4.1.318.1.1.1.1.1.1.0", text("Smart-UPS 1500"));
        let sink = DeviceSink::new();

        probe_host(&mut transport, &params(), &catalog, &sink).await;

        let devices = sink.drain();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].option("desc"), Some("Smart-UPS 1500"));
    }

    #[tokio::test]
    async fn test_fallback_publishes_with_description() {
        let catalog = vec![entry("acme", ".1.3.6.1.4.1.9.9", ".1.3.6.1.2.1.1.5.0")];
        let mut transport = MockTransport::new()
            .reply(SYS_OBJECT_ID, object_id(&[1, 3, 6, 1, 4, 1, 999]))
            .reply(".1.3.6.1.2.1.1.5.0", text("ACME UPS"));
        let sink = DeviceSink::new();

        probe_host(&mut transport, &params(), &catalog, &sink).await;

        let devices = sink.drain();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].mib(), "acme");
        assert_eq!(devices[0].option("desc"), Some("ACME UPS"));
    }

    #[tokio::test]
    async fn test_multi_mib_sysoid_tie_publishes_in_catalog_order() {
        let catalog = vec![
            entry("mib_a", ".1.3.6.1.4.1.7.7", ""),
            entry("mib_b", ".1.3.6.1.4.1.7.7", ""),
        ];
        let mut transport =
            MockTransport::new().reply(SYS_OBJECT_ID, object_id(&[1, 3, 6, 1, 4, 1, 7, 7]));
        let sink = DeviceSink::new();

        probe_host(&mut transport, &params(), &catalog, &sink).await;

        let devices = sink.drain();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].mib(), "mib_a");
        assert_eq!(devices[1].mib(), "mib_b");
    }

    #[tokio::test]
    async fn test_phase_one_success_skips_brute_force() {
        let catalog = vec![
            entry("matched", ".1.3.6.1.4.1.5.5", ""),
            entry("lurking", "", ".1.3.6.1.4.1.6.6.1.0"),
        ];
        let mut transport = MockTransport::new()
            .reply(SYS_OBJECT_ID, object_id(&[1, 3, 6, 1, 4, 1, 5, 5]))
            .reply(".1.3.6.1.4.1.6.6.1.0", text("should never be asked"));
        let sink = DeviceSink::new();

        probe_host(&mut transport, &params(), &catalog, &sink).await;

        let devices = sink.drain();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].mib(), "matched");
        assert_eq!(transport.requests, vec![SYS_OBJECT_ID.to_string()]);
    }

    #[tokio::test]
    async fn test_brute_force_can_publish_multiple_mibs() {
        let catalog = vec![
            entry("first", "", ".1.3.6.1.4.1.10.1.0"),
            entry("second", "", ".1.3.6.1.4.1.20.1.0"),
        ];
        let mut transport = MockTransport::new()
            .reply(SYS_OBJECT_ID, ProbeOutcome::Invalid)
            .reply(".1.3.6.1.4.1.10.1.0", text("dev one"))
            .reply(".1.3.6.1.4.1.20.1.0", text("dev two"));
        let sink = DeviceSink::new();

        probe_host(&mut transport, &params(), &catalog, &sink).await;

        let devices = sink.drain();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].mib(), "first");
        assert_eq!(devices[1].mib(), "second");
    }

    #[tokio::test]
    async fn test_brute_force_duplicate_mib_collapses() {
        let catalog = vec![
            entry("twin", "", ".1.3.6.1.4.1.10.1.0"),
            entry("twin", "", ".1.3.6.1.4.1.10.2.0"),
        ];
        let mut transport = MockTransport::new()
            .reply(SYS_OBJECT_ID, ProbeOutcome::Invalid)
            .reply(".1.3.6.1.4.1.10.1.0", text("a"))
            .reply(".1.3.6.1.4.1.10.2.0", text("b"));
        let sink = DeviceSink::new();

        probe_host(&mut transport, &params(), &catalog, &sink).await;

        assert_eq!(sink.drain().len(), 1);
    }

    #[tokio::test]
    async fn test_silent_peer_is_skipped() {
        let catalog = vec![entry("ietf", "", ".1.3.6.1.2.1.33.1.1.1.0")];
        let mut transport =
            MockTransport::new().reply(SYS_OBJECT_ID, ProbeOutcome::NoResponse);
        let sink = DeviceSink::new();

        probe_host(&mut transport, &params(), &catalog, &sink).await;

        assert!(sink.drain().is_empty());
        assert_eq!(transport.requests.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_confirmation_falls_through_to_brute_force() {
        // The probe OID refuses in phase 1, so phase 2 retries the whole
        // catalog, asking the same OID once more.
        let catalog = vec![entry("apcc", ".1.3.6.1.4.1.318", ".1.3.6.1.4.1.318.1.1.1.1.1.1.0")];
        let mut transport = MockTransport::new()
            .reply(SYS_OBJECT_ID, object_id(&[1, 3, 6, 1, 4, 1, 318]))
            .reply(".1.3.6.1.4.1.318.1.1.1.1.1.1.0", ProbeOutcome::Invalid);
        let sink = DeviceSink::new();

        probe_host(&mut transport, &params(), &catalog, &sink).await;

        assert!(sink.drain().is_empty());
        assert_eq!(
            transport.requests,
            vec![
                SYS_OBJECT_ID.to_string(),
                ".1.3.6.1.4.1.318.1.1.1.1.1.1.0".to_string(),
                ".1.3.6.1.4.1.318.1.1.1.1.1.1.0".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_malformed_catalog_sysoid_is_skipped() {
        let catalog = vec![
            entry("broken", "not-an-oid", ""),
            entry("good", ".1.3.6.1.4.1.3.3", ""),
        ];
        let mut transport =
            MockTransport::new().reply(SYS_OBJECT_ID, object_id(&[1, 3, 6, 1, 4, 1, 3, 3]));
        let sink = DeviceSink::new();

        probe_host(&mut transport, &params(), &catalog, &sink).await;

        let devices = sink.drain();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].mib(), "good");
    }
}
