// ── Domain model ──
//
// Sites own hosts, hosts own at most one endpoint per protocol. `Stats`
// is tallied alongside by the merge engine.

pub mod endpoint;
pub mod host;
pub mod site;
pub mod stats;

pub use endpoint::{Endpoint, Protocol};
pub use host::{Host, UNKNOWN_VERSION};
pub use site::Site;
pub use stats::Stats;
