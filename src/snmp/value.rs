use crate::error::{AppError, ErrorKind};
use snmp2::Value;

/// A trait for converting SNMP `Value` types into Rust types.
///
/// The probe engine only ever inspects two shapes of response: the device's
/// `sysObjectID` (an OID) and printable description strings, so only those
/// conversions are provided.
pub trait FromSnmpValue<'a>: Sized {
    fn from_snmp_value(value: &'a Value<'a>) -> Result<Self, AppError>;
}

impl<'a> FromSnmpValue<'a> for String {
    fn from_snmp_value(value: &'a Value<'a>) -> Result<Self, AppError> {
        if let Value::OctetString(v) = value {
            Ok(String::from_utf8_lossy(v).to_string())
        } else {
            Err(AppError::new(ErrorKind::SnmpRequest(
                "Expected OctetString, but received a different type".to_string(),
            )))
        }
    }
}

impl<'a> FromSnmpValue<'a> for Vec<u64> {
    fn from_snmp_value(value: &'a Value<'a>) -> Result<Self, AppError> {
        if let Value::ObjectIdentifier(v) = value {
            let oid_string = v.to_string();
            oid_string
                .split('.')
                .map(|s| {
                    s.parse::<u64>().map_err(|_| {
                        AppError::new(ErrorKind::Parse(format!("Failed to parse '{s}' as u64")))
                    })
                })
                .collect()
        } else {
            Err(AppError::new(ErrorKind::SnmpRequest(
                "Expected ObjectIdentifier, but received a different type".to_string(),
            )))
        }
    }
}
