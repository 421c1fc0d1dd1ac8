use std::fmt::Display;

/// The SNMP protocol version used for a probe.
///
/// The scanner never asks the user for a version directly: it is derived
/// from the credential bundle. A community string (or no credentials at all)
/// selects v1, a security level selects v3.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SnmpVersion {
    V1,
    V3,
}

impl Display for SnmpVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V1 => write!(f, "v1"),
            Self::V3 => write!(f, "v3"),
        }
    }
}
