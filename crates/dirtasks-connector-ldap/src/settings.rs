//! ldap3 connection settings

use dirtasks_connector::config::{ConnectionConfig, TlsMode};
use ldap3::LdapConnSettings;

/// Build ldap3 settings for a connection config.
///
/// LDAPS is selected by the URL scheme; StartTLS and certificate
/// verification are settings.
pub fn conn_settings(config: &ConnectionConfig) -> LdapConnSettings {
    let settings = LdapConnSettings::new()
        .set_conn_timeout(config.connection_timeout())
        .set_starttls(config.tls_mode == TlsMode::StartTls);

    if config.ignore_certificate_errors {
        settings.set_no_tls_verify(true)
    } else {
        settings
    }
}
