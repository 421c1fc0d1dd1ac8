use crate::{
    cli::args::Args,
    error::{AppError, ErrorKind},
    snmp::security::{AuthProtocol, PrivacyProtocol, SecurityLevel},
};
use snmp2::{
    v3::{self},
    AsyncSession,
};
use std::{net::Ipv4Addr, time::Duration};
use tracing::warn;

use self::version::SnmpVersion;

pub mod security;
pub mod value;
pub mod version;

/// Encapsulates all necessary parameters to establish an SNMP session with one peer.
///
/// The range driver clones this bundle once per host and binds the peer address
/// into the copy before handing it to a worker.
#[derive(Clone, Debug)]
pub struct SnmpScanParams {
    pub ip: Ipv4Addr,
    pub port: u16,
    pub timeout: Duration,
    pub community: Option<String>,
    pub security_level: Option<SecurityLevel>,
    pub security_name: Option<String>,
    pub auth_password: Option<String>,
    pub auth_protocol: Option<AuthProtocol>,
    pub priv_password: Option<String>,
    pub priv_protocol: Option<PrivacyProtocol>,
}

impl SnmpScanParams {
    /// Constructs scan parameters from parsed CLI arguments.
    ///
    /// The peer address is left unspecified; the range driver fills it in
    /// per host.
    pub fn from_args(args: &Args) -> Self {
        Self {
            ip: Ipv4Addr::UNSPECIFIED,
            port: args.port,
            timeout: Duration::from_secs(args.timeout),
            community: args.community.clone(),
            security_level: args.security_level,
            security_name: args.security_name.clone(),
            auth_password: args.auth_password.clone(),
            auth_protocol: args.auth_protocol,
            priv_password: args.priv_password.clone(),
            priv_protocol: args.priv_protocol,
        }
    }

    /// The SNMP version implied by the credential bundle.
    ///
    /// A community string always selects v1; a security level without a
    /// community selects v3. With neither, v1 with the `public` community
    /// is assumed.
    pub fn version(&self) -> SnmpVersion {
        if self.community.is_some() || self.security_level.is_none() {
            SnmpVersion::V1
        } else {
            SnmpVersion::V3
        }
    }

    /// The community string to present on the v1 path.
    pub fn community_or_default(&self) -> &str {
        self.community.as_deref().unwrap_or("public")
    }
}

/// Establishes an asynchronous SNMP session based on the credential bundle.
pub async fn create_snmp_session(ctx: &SnmpScanParams) -> Result<AsyncSession, AppError> {
    let agent_address = format!("{}:{}", ctx.ip, ctx.port);

    match ctx.version() {
        SnmpVersion::V1 => {
            AsyncSession::new_v1(agent_address, ctx.community_or_default().as_bytes(), 0)
                .await
                .map_err(|e| AppError::new(ErrorKind::SessionOpen(format!("{e:?}"))))
        }
        SnmpVersion::V3 => build_v3_session(ctx, agent_address).await,
    }
}

/// Helper function to construct and initialize an SNMPv3 session.
async fn build_v3_session(
    ctx: &SnmpScanParams,
    address: String,
) -> Result<AsyncSession, AppError> {
    let security = build_v3_security(ctx)?;

    let mut session = AsyncSession::new_v3(address, 0, security)
        .await
        .map_err(|e| AppError::new(ErrorKind::SessionOpen(format!("{e:?}"))))?;

    // Engine ID discovery; key localization happens here, bounded by the
    // same timeout as every later request.
    tokio::time::timeout(ctx.timeout, session.init())
        .await
        .map_err(|_| {
            AppError::new(ErrorKind::SessionOpen(format!(
                "SNMPv3 discovery timed out for {}",
                ctx.ip
            )))
        })?
        .map_err(|e| {
            AppError::new(ErrorKind::SessionOpen(format!(
                "SNMPv3 discovery failed: {e:?}"
            )))
        })?;

    Ok(session)
}

/// Validates the v3 credential bundle and assembles the USM security settings.
///
/// Mandatory fields depend on the security level: `authNoPriv` needs an
/// authentication passphrase, `authPriv` additionally a privacy passphrase.
/// Protocols default to MD5 and DES when omitted, matching what legacy UPS
/// management cards ship with.
pub(crate) fn build_v3_security(ctx: &SnmpScanParams) -> Result<v3::Security, AppError> {
    let level = match ctx.security_level {
        Some(level) => level,
        None => {
            return Err(AppError::new(ErrorKind::BadSecurityLevel(
                "<unset>".to_string(),
            )))
        }
    };

    let username = match ctx.security_name.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => return Err(AppError::new(ErrorKind::MissingSecurityName)),
    };

    match level {
        SecurityLevel::NoAuthNoPriv => {
            return Ok(v3::Security::new(username.as_bytes(), &[])
                .with_auth(v3::Auth::NoAuthNoPriv));
        }
        SecurityLevel::AuthNoPriv => {
            if ctx.auth_password.is_none() {
                return Err(AppError::new(ErrorKind::MissingSecret(
                    "An authentication passphrase".to_string(),
                )));
            }
        }
        SecurityLevel::AuthPriv => {
            if ctx.auth_password.is_none() || ctx.priv_password.is_none() {
                return Err(AppError::new(ErrorKind::MissingSecret(
                    "An authentication and a privacy passphrase".to_string(),
                )));
            }
        }
    }

    let auth_pass = ctx.auth_password.as_deref().unwrap_or_default();
    if auth_pass.len() < 8 {
        // The USM key derivation wants >= 8 characters; the agent will
        // reject shorter ones, so surface it early.
        warn!(peer = %ctx.ip, "SNMPv3 authentication passphrase is shorter than 8 characters");
    }
    let auth_protocol = ctx.auth_protocol.unwrap_or_default();

    let security = v3::Security::new(username.as_bytes(), auth_pass.as_bytes())
        .with_auth_protocol(auth_protocol.into());

    if level == SecurityLevel::AuthPriv {
        let priv_pass = ctx.priv_password.as_deref().unwrap_or_default();
        if priv_pass.len() < 8 {
            warn!(peer = %ctx.ip, "SNMPv3 privacy passphrase is shorter than 8 characters");
        }
        let priv_protocol = ctx.priv_protocol.unwrap_or_default();

        Ok(security.with_auth(v3::Auth::AuthPriv {
            cipher: priv_protocol.into(),
            privacy_password: priv_pass.as_bytes().to_vec(),
        }))
    } else {
        Ok(security.with_auth(v3::Auth::AuthNoPriv))
    }
}
