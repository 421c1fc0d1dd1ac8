use crate::error::{AppError, ErrorKind};
use clap::ValueEnum;
use snmp2::v3;
use std::fmt::Display;
use std::str::FromStr;

/// Specifies the hashing algorithms supported for SNMPv3 authentication.
///
/// Determines how the message digest is calculated to verify sender identity
/// and data integrity. Devices that predate the SHA-2 RFCs usually only
/// accept `MD5` or `SHA`.
#[derive(Copy, Clone, ValueEnum, Debug, Default, PartialEq, Eq)]
pub enum AuthProtocol {
    #[default]
    #[value(name = "MD5")]
    Md5,
    #[value(name = "SHA", alias = "SHA1")]
    Sha1,
    #[value(name = "SHA256")]
    Sha256,
    #[value(name = "SHA384")]
    Sha384,
    #[value(name = "SHA512")]
    Sha512,
}

impl Display for AuthProtocol {
    /// Formats the protocol name using its CLI-compatible string representation (e.g., "SHA").
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_possible_value()
            .expect("variant not skipped")
            .get_name()
            .fmt(f)
    }
}

impl FromStr for AuthProtocol {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
            .map_err(|_| AppError::new(ErrorKind::BadAuthProtocol(s.to_string())))
    }
}

impl From<AuthProtocol> for v3::AuthProtocol {
    /// Maps the CLI [`AuthProtocol`] enum to the underlying library's [`v3::AuthProtocol`] type.
    fn from(proto: AuthProtocol) -> Self {
        match proto {
            AuthProtocol::Md5 => v3::AuthProtocol::Md5,
            AuthProtocol::Sha1 => v3::AuthProtocol::Sha1,
            AuthProtocol::Sha256 => v3::AuthProtocol::Sha256,
            AuthProtocol::Sha384 => v3::AuthProtocol::Sha384,
            AuthProtocol::Sha512 => v3::AuthProtocol::Sha512,
        }
    }
}

/// Specifies the encryption algorithms supported for SNMPv3 privacy.
///
/// Determines how the payload is encrypted when [`SecurityLevel::AuthPriv`] is used.
#[derive(Copy, Clone, ValueEnum, Debug, Default, PartialEq, Eq)]
pub enum PrivacyProtocol {
    #[default]
    #[value(name = "DES")]
    Des,
    #[value(name = "AES", alias = "AES128")]
    Aes128,
    #[value(name = "AES192")]
    Aes192,
    #[value(name = "AES256")]
    Aes256,
}

impl Display for PrivacyProtocol {
    /// Formats the cipher name using its CLI-compatible string representation (e.g., "AES").
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_possible_value()
            .expect("variant not skipped")
            .get_name()
            .fmt(f)
    }
}

impl FromStr for PrivacyProtocol {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
            .map_err(|_| AppError::new(ErrorKind::BadPrivProtocol(s.to_string())))
    }
}

impl From<PrivacyProtocol> for v3::Cipher {
    /// Maps the CLI [`PrivacyProtocol`] enum to the underlying library's [`v3::Cipher`] type.
    fn from(proto: PrivacyProtocol) -> Self {
        match proto {
            PrivacyProtocol::Des => v3::Cipher::Des,
            PrivacyProtocol::Aes128 => v3::Cipher::Aes128,
            PrivacyProtocol::Aes192 => v3::Cipher::Aes192,
            PrivacyProtocol::Aes256 => v3::Cipher::Aes256,
        }
    }
}

/// The SNMPv3 user-based security levels.
#[allow(clippy::enum_variant_names)]
#[derive(Copy, Clone, ValueEnum, Debug, PartialEq, Eq)]
pub enum SecurityLevel {
    #[value(name = "noAuthNoPriv")]
    NoAuthNoPriv,
    #[value(name = "authNoPriv")]
    AuthNoPriv,
    #[value(name = "authPriv")]
    AuthPriv,
}

impl Display for SecurityLevel {
    /// Formats the level using its CLI-compatible string representation.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_possible_value()
            .expect("variant not skipped")
            .get_name()
            .fmt(f)
    }
}

impl FromStr for SecurityLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
            .map_err(|_| AppError::new(ErrorKind::BadSecurityLevel(s.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_security_level_spellings() {
        assert_eq!("authPriv".parse::<SecurityLevel>().unwrap(), SecurityLevel::AuthPriv);
        assert_eq!("noauthnopriv".parse::<SecurityLevel>().unwrap(), SecurityLevel::NoAuthNoPriv);
        assert_eq!(SecurityLevel::AuthNoPriv.to_string(), "authNoPriv");
    }

    #[test]
    fn test_unknown_security_level_is_rejected() {
        let err = "authOnly".parse::<SecurityLevel>().unwrap_err();
        assert_eq!(
            *err.kind(),
            ErrorKind::BadSecurityLevel("authOnly".to_string())
        );
    }

    #[test]
    fn test_auth_protocol_aliases() {
        assert_eq!("SHA".parse::<AuthProtocol>().unwrap(), AuthProtocol::Sha1);
        assert_eq!("sha1".parse::<AuthProtocol>().unwrap(), AuthProtocol::Sha1);
        assert_eq!("md5".parse::<AuthProtocol>().unwrap(), AuthProtocol::Md5);
        assert!("SHA224".parse::<AuthProtocol>().is_err());
    }

    #[test]
    fn test_privacy_protocol_aliases() {
        assert_eq!("AES".parse::<PrivacyProtocol>().unwrap(), PrivacyProtocol::Aes128);
        assert_eq!("aes128".parse::<PrivacyProtocol>().unwrap(), PrivacyProtocol::Aes128);
        assert_eq!("DES".parse::<PrivacyProtocol>().unwrap(), PrivacyProtocol::Des);
        assert!("3DES".parse::<PrivacyProtocol>().is_err());
    }
}
