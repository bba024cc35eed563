//! Scope and dereference translation to ldap3 types

use dirtasks_connector::types::{DerefPolicy, Scope};
use ldap3::{DerefAliases, Scope as LdapScope};

/// ldap3 search scope for a [`Scope`].
pub fn ldap_scope(scope: Scope) -> LdapScope {
    match scope {
        Scope::Base => LdapScope::Base,
        Scope::OneLevel => LdapScope::OneLevel,
        Scope::Subtree => LdapScope::Subtree,
    }
}

/// ldap3 alias dereferencing for a [`DerefPolicy`].
pub fn deref_aliases(policy: DerefPolicy) -> DerefAliases {
    match policy {
        DerefPolicy::Never => DerefAliases::Never,
        DerefPolicy::Searching => DerefAliases::Searching,
        DerefPolicy::Finding => DerefAliases::Finding,
        DerefPolicy::Always => DerefAliases::Always,
    }
}
