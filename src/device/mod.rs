use crate::snmp::{version::SnmpVersion, SnmpScanParams};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt::Write as _;

/// The NUT driver every SNMP UPS descriptor points at.
pub const DRIVER_NAME: &str = "snmp-ups";

/// A discovered device, ready to be rendered as a driver configuration stanza.
///
/// `options` is insertion-ordered; the order is part of the output contract
/// (`desc` first when present, then `mibs`, then the credentials).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub driver: &'static str,
    pub port: String,
    options: Vec<(String, String)>,
}

impl DeviceDescriptor {
    /// Builds a descriptor for `mib` found on the peer in `params`.
    ///
    /// Credential options mirror what was supplied: the v1/v2c path records
    /// the community string, the v3 path records `snmp_version = v3` plus
    /// only the security fields the user actually provided. Protocols left
    /// to their defaults are not echoed back.
    pub fn new(params: &SnmpScanParams, mib: &str, desc: Option<&str>) -> Self {
        let mut device = Self {
            driver: DRIVER_NAME,
            port: params.ip.to_string(),
            options: Vec::new(),
        };

        if let Some(desc) = desc {
            device.push_option("desc", desc);
        }
        device.push_option("mibs", mib);

        match params.version() {
            SnmpVersion::V1 => {
                device.push_option("community", params.community_or_default());
            }
            SnmpVersion::V3 => {
                device.push_option("snmp_version", "v3");

                if let Some(level) = params.security_level {
                    device.push_option("secLevel", &level.to_string());
                }
                if let Some(name) = &params.security_name {
                    device.push_option("secName", name);
                }
                if let Some(pass) = &params.auth_password {
                    device.push_option("authPassword", pass);
                }
                if let Some(pass) = &params.priv_password {
                    device.push_option("privPassword", pass);
                }
                if let Some(proto) = params.auth_protocol {
                    device.push_option("authProtocol", &proto.to_string());
                }
                if let Some(proto) = params.priv_protocol {
                    device.push_option("privProtocol", &proto.to_string());
                }
            }
        }

        device
    }

    fn push_option(&mut self, key: &str, value: &str) {
        self.options.push((key.to_string(), value.to_string()));
    }

    /// Looks up a single option by key.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The MIB this descriptor was published for.
    pub fn mib(&self) -> &str {
        self.option("mibs").unwrap_or_default()
    }

    pub fn options(&self) -> &[(String, String)] {
        &self.options
    }

    /// Renders the descriptor as a `ups.conf` section.
    pub fn to_ups_conf(&self, index: usize) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "[nutdev-snmp{index}]");
        let _ = writeln!(out, "\tdriver = \"{}\"", self.driver);
        let _ = writeln!(out, "\tport = \"{}\"", self.port);
        for (key, value) in &self.options {
            let _ = writeln!(out, "\t{key} = \"{value}\"");
        }
        out
    }
}

impl Serialize for DeviceDescriptor {
    /// Serializes as a flat object, keeping the option insertion order.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2 + self.options.len()))?;
        map.serialize_entry("driver", self.driver)?;
        map.serialize_entry("port", &self.port)?;
        for (key, value) in &self.options {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snmp::security::{AuthProtocol, PrivacyProtocol, SecurityLevel};
    use std::{net::Ipv4Addr, time::Duration};

    fn community_params() -> SnmpScanParams {
        SnmpScanParams {
            ip: Ipv4Addr::new(10, 0, 0, 1),
            port: 161,
            timeout: Duration::from_secs(5),
            community: Some("public".to_string()),
            security_level: None,
            security_name: None,
            auth_password: None,
            auth_protocol: None,
            priv_password: None,
            priv_protocol: None,
        }
    }

    fn v3_params() -> SnmpScanParams {
        SnmpScanParams {
            ip: Ipv4Addr::new(10, 0, 0, 2),
            port: 161,
            timeout: Duration::from_secs(5),
            community: None,
            security_level: Some(SecurityLevel::AuthPriv),
            security_name: Some("upsadmin".to_string()),
            auth_password: Some("password1".to_string()),
            auth_protocol: Some(AuthProtocol::Sha1),
            priv_password: Some("password2".to_string()),
            priv_protocol: Some(PrivacyProtocol::Aes128),
        }
    }

    #[test]
    fn test_community_descriptor_shape() {
        let device = DeviceDescriptor::new(&community_params(), "ietf", None);

        assert_eq!(device.driver, "snmp-ups");
        assert_eq!(device.port, "10.0.0.1");
        assert_eq!(device.mib(), "ietf");
        assert_eq!(device.option("community"), Some("public"));
        assert_eq!(device.option("snmp_version"), None);
        assert_eq!(device.option("desc"), None);
    }

    #[test]
    fn test_v3_descriptor_carries_all_supplied_fields() {
        let device = DeviceDescriptor::new(&v3_params(), "mge", Some("ACME UPS 3000"));

        assert_eq!(device.option("snmp_version"), Some("v3"));
        assert_eq!(device.option("secLevel"), Some("authPriv"));
        assert_eq!(device.option("secName"), Some("upsadmin"));
        assert_eq!(device.option("authPassword"), Some("password1"));
        assert_eq!(device.option("privPassword"), Some("password2"));
        assert_eq!(device.option("authProtocol"), Some("SHA"));
        assert_eq!(device.option("privProtocol"), Some("AES"));
        assert_eq!(device.option("community"), None);
    }

    #[test]
    fn test_defaulted_protocols_are_not_echoed() {
        let mut params = v3_params();
        params.auth_protocol = None;
        params.priv_protocol = None;

        let device = DeviceDescriptor::new(&params, "mge", None);
        assert_eq!(device.option("authProtocol"), None);
        assert_eq!(device.option("privProtocol"), None);
        assert_eq!(device.option("snmp_version"), Some("v3"));
    }

    #[test]
    fn test_option_order() {
        let device = DeviceDescriptor::new(&community_params(), "apcc", Some("Smart-UPS 1500"));
        let keys: Vec<&str> = device.options().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["desc", "mibs", "community"]);
    }

    #[test]
    fn test_ups_conf_rendering() {
        let device = DeviceDescriptor::new(&community_params(), "apcc", Some("Smart-UPS 1500"));

        let expected = "[nutdev-snmp1]\n\
                        \tdriver = \"snmp-ups\"\n\
                        \tport = \"10.0.0.1\"\n\
                        \tdesc = \"Smart-UPS 1500\"\n\
                        \tmibs = \"apcc\"\n\
                        \tcommunity = \"public\"\n";
        assert_eq!(device.to_ups_conf(1), expected);
    }

    #[test]
    fn test_json_preserves_option_order() {
        let device = DeviceDescriptor::new(&v3_params(), "mge", None);
        let json = serde_json::to_string(&device).unwrap();

        let mibs = json.find("\"mibs\"").unwrap();
        let version = json.find("\"snmp_version\"").unwrap();
        let level = json.find("\"secLevel\"").unwrap();
        assert!(mibs < version && version < level);
    }
}
