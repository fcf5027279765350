// ── Directory abstraction ──
//
// The one seam the core depends on. LDAP, snapshot replay, and the
// recording wrapper all sit behind it; tests plug in in-memory fakes.

use crate::error::Error;
use crate::record::{Query, Record};

/// Anything that can answer a subtree search.
///
/// Queries are issued one at a time and awaited before the next one, so
/// implementations take `&mut self` and need not be `Sync`.
#[allow(async_fn_in_trait)]
pub trait Directory {
    /// Run `query` and return every matching entry.
    async fn search(&mut self, query: &Query) -> Result<Vec<Record>, Error>;

    /// Human-readable origin of the data (URL or snapshot path).
    fn source(&self) -> String;
}
