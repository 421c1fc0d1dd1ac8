/// An error that can occur in this application.
#[derive(Debug, Clone)]
pub struct AppError {
    kind: ErrorKind,
}

impl AppError {
    /// Creates a new error from an `ErrorKind`.
    pub(crate) fn new(kind: ErrorKind) -> AppError {
        AppError { kind }
    }

    /// Returns the kind of this error.
    #[allow(dead_code)]
    pub(crate) fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

/// The kind of an error that can occur.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An error that occurred as a result of parsing CLI arguments.
    Cli(String),
    /// An I/O error that occurred.
    Io(String),
    /// An DNS resolution error that occurred.
    DnsResolution(String),
    /// An error for when an IP range cannot be parsed or is reversed.
    InvalidRange(String),
    /// An error for when an OID string has an invalid format.
    InvalidOidFormat,
    /// An error for when an unknown SNMPv3 security level is given.
    BadSecurityLevel(String),
    /// An error for when SNMPv3 is requested without a security name.
    MissingSecurityName,
    /// An error for when the chosen security level lacks a passphrase.
    MissingSecret(String),
    /// An error for when an unknown SNMPv3 authentication protocol is given.
    BadAuthProtocol(String),
    /// An error for when an unknown SNMPv3 privacy protocol is given.
    BadPrivProtocol(String),
    /// An error for when a peer did not permit an SNMP session.
    SessionOpen(String),
    /// An error that occurred during an SNMP request.
    SnmpRequest(String),
    /// An error that occurred during a parsing operation.
    Parse(String),
    /// An error for when a specified directory is invalid or does not exist.
    InvalidDirectory,
    /// An error for when the contents of a directory cannot be read.
    DirectoryRead,
    /// An error for when the probe catalog is empty or malformed.
    Catalog(String),
}

impl std::error::Error for AppError {}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.kind {
            ErrorKind::Cli(s) => write!(f, "CLI error: {s}. Please check the provided arguments."),
            ErrorKind::Io(s) => write!(f, "I/O error: {s}."),
            ErrorKind::DnsResolution(s) => write!(f, "DNS resolution failed for '{s}'."),
            ErrorKind::InvalidRange(s) => write!(f, "Invalid IP range '{s}'. Use a single address, 'start-end' or CIDR notation."),
            ErrorKind::InvalidOidFormat => write!(f, "Invalid OID format. Segments must be numeric and separated by dots."),
            ErrorKind::BadSecurityLevel(s) => write!(f, "Bad SNMPv3 security level '{s}'. Expected noAuthNoPriv, authNoPriv or authPriv."),
            ErrorKind::MissingSecurityName => write!(f, "A security name is required for SNMPv3."),
            ErrorKind::MissingSecret(s) => write!(f, "{s} is required for the chosen SNMPv3 security level."),
            ErrorKind::BadAuthProtocol(s) => write!(f, "Bad SNMPv3 authentication protocol '{s}'. Expected MD5, SHA, SHA256, SHA384 or SHA512."),
            ErrorKind::BadPrivProtocol(s) => write!(f, "Bad SNMPv3 privacy protocol '{s}'. Expected DES, AES, AES192 or AES256."),
            ErrorKind::SessionOpen(s) => write!(f, "Failed to open SNMP session: {s}."),
            ErrorKind::SnmpRequest(s) => write!(f, "SNMP request failed: {s}. Please verify the network connection and SNMP agent availability."),
            ErrorKind::Parse(s) => write!(f, "Parsing error: {s}. Please check the input format."),
            ErrorKind::InvalidDirectory => write!(f, "The specified directory is invalid or does not exist."),
            ErrorKind::DirectoryRead => write!(f, "Failed to read the contents of the specified directory."),
            ErrorKind::Catalog(s) => write!(f, "Probe catalog error: {s}."),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::new(ErrorKind::Io(err.to_string()))
    }
}

impl From<clap::Error> for AppError {
    fn from(err: clap::Error) -> Self {
        AppError::new(ErrorKind::Cli(err.to_string()))
    }
}

impl From<snmp2::Error> for AppError {
    fn from(err: snmp2::Error) -> Self {
        AppError::new(ErrorKind::SnmpRequest(format!("{err:?}")))
    }
}
