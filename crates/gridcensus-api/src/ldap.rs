// LDAP directory client
//
// Wraps an `ldap3::Ldap` handle with per-schema search bases, an optional
// simple bind, and a fixed per-operation timeout. The connection driver
// runs on its own tokio task for the lifetime of the handle.

use std::time::Duration;

use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, Scope, SearchEntry};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace, warn};
use url::Url;

use crate::directory::Directory;
use crate::error::Error;
use crate::record::{Query, Record, Schema};

/// Default GLUE 2.0 search base published by top-level BDIIs.
pub const DEFAULT_GLUE2_BASE: &str = "GLUE2GroupID=grid,o=glue";

/// Default GLUE 1.3 search base published by top-level BDIIs.
pub const DEFAULT_GLUE1_BASE: &str = "Mds-Vo-name=local,o=grid";

/// Credentials for an LDAP simple bind. BDIIs are normally anonymous.
#[derive(Debug, Clone)]
pub struct SimpleBind {
    pub dn: String,
    pub password: SecretString,
}

/// Everything needed to open a directory connection.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    /// `ldap://host:port` or `ldaps://host:port`.
    pub url: Url,
    pub glue2_base: String,
    pub glue1_base: String,
    pub bind: Option<SimpleBind>,
    /// Applied both to connection setup and to every search.
    pub timeout: Duration,
}

impl ConnectionSettings {
    /// Anonymous settings with the standard BDII search bases.
    pub fn anonymous(url: Url, timeout: Duration) -> Self {
        Self {
            url,
            glue2_base: DEFAULT_GLUE2_BASE.into(),
            glue1_base: DEFAULT_GLUE1_BASE.into(),
            bind: None,
            timeout,
        }
    }
}

/// Live LDAP connection to a BDII.
pub struct LdapDirectory {
    ldap: Ldap,
    url: Url,
    glue2_base: String,
    glue1_base: String,
    timeout: Duration,
}

impl LdapDirectory {
    /// Connect (and bind, if configured).
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self, Error> {
        match settings.url.scheme() {
            "ldap" | "ldaps" => {}
            other => return Err(Error::UnsupportedScheme(other.to_owned())),
        }

        debug!(url = %settings.url, "connecting to directory");
        let conn_settings = LdapConnSettings::new().set_conn_timeout(settings.timeout);
        let (conn, mut ldap) =
            LdapConnAsync::with_settings(conn_settings, settings.url.as_str()).await?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "directory connection terminated");
            }
        });

        if let Some(ref bind) = settings.bind {
            debug!(bind_dn = %bind.dn, "binding to directory");
            ldap.with_timeout(settings.timeout)
                .simple_bind(&bind.dn, bind.password.expose_secret())
                .await?
                .success()
                .map_err(|e| Error::Bind {
                    bind_dn: bind.dn.clone(),
                    message: e.to_string(),
                })?;
        }

        Ok(Self {
            ldap,
            url: settings.url.clone(),
            glue2_base: settings.glue2_base.clone(),
            glue1_base: settings.glue1_base.clone(),
            timeout: settings.timeout,
        })
    }

    /// The search base used for `schema`.
    pub fn base_for(&self, schema: Schema) -> &str {
        match schema {
            Schema::Glue1 => &self.glue1_base,
            Schema::Glue2 => &self.glue2_base,
        }
    }

    /// Unbind and drop the connection.
    pub async fn close(mut self) -> Result<(), Error> {
        self.ldap.unbind().await?;
        Ok(())
    }
}

impl Directory for LdapDirectory {
    async fn search(&mut self, query: &Query) -> Result<Vec<Record>, Error> {
        let base = self.base_for(query.schema).to_owned();
        debug!(
            base = %base,
            filter = %query.filter,
            attributes = ?query.attributes,
            "searching directory"
        );

        let (entries, result) = self
            .ldap
            .with_timeout(self.timeout)
            .search(
                &base,
                Scope::Subtree,
                &query.filter,
                query.attributes.clone(),
            )
            .await?
            .success()?;
        trace!(rc = result.rc, entries = entries.len(), "search complete");

        Ok(entries
            .into_iter()
            .map(SearchEntry::construct)
            .map(Record::from)
            .collect())
    }

    fn source(&self) -> String {
        self.url.to_string()
    }
}
