// gridcensus-api: async directory client for grid information systems.
//
// Speaks LDAP to a BDII (GLUE 2.0 and the legacy GLUE 1.3 tree) and can
// record or replay query results through JSON snapshots.

pub mod directory;
pub mod error;
pub mod ldap;
pub mod record;
pub mod snapshot;

pub use directory::Directory;
pub use error::Error;
pub use ldap::{ConnectionSettings, LdapDirectory, SimpleBind};
pub use record::{Query, Record, Schema};
pub use snapshot::{RecordedQuery, RecordingDirectory, Snapshot, SnapshotDirectory};
