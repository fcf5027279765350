// ── Directory passes ──
//
// Five (query, handler) pairs, always run in `Pass::ORDER`. GLUE 2.0
// goes first so the legacy pass can recognise hosts it already knows.

use gridcensus_api::{Query, Schema};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::glue;
use crate::identity::IdentityRule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Pass {
    /// GLUE 2.0 storage services: creates sites and hosts.
    Discovery,
    /// GLUE 2.0 managers: product version per host.
    Version,
    /// GLUE 2.0 WebDAV (HTTPS) endpoints.
    Webdav,
    /// GLUE 2.0 SRM endpoints.
    Srm,
    /// GLUE 1.3 SRM services: discovery and version in one record.
    Legacy,
}

impl Pass {
    pub const ORDER: [Pass; 5] = [
        Pass::Discovery,
        Pass::Version,
        Pass::Webdav,
        Pass::Srm,
        Pass::Legacy,
    ];

    pub fn schema(self) -> Schema {
        match self {
            Self::Legacy => Schema::Glue1,
            _ => Schema::Glue2,
        }
    }

    pub fn identity_rule(self) -> IdentityRule {
        match self {
            Self::Discovery => IdentityRule::Glue2Service,
            Self::Version => IdentityRule::Glue2Manager,
            Self::Webdav | Self::Srm => IdentityRule::Glue2Endpoint,
            Self::Legacy => IdentityRule::Glue1Service,
        }
    }

    /// The directory search this pass consumes.
    pub fn query(self) -> Query {
        match self {
            Self::Discovery => Query::new(
                self.schema(),
                glue::STORAGE_SERVICE_FILTER,
                &[glue::GLUE2_SERVICE_TYPE],
            ),
            Self::Version => Query::new(
                self.schema(),
                glue::MANAGER_FILTER,
                &[glue::GLUE2_MANAGER_PRODUCT_VERSION],
            ),
            Self::Webdav => Query::new(
                self.schema(),
                glue::WEBDAV_ENDPOINT_FILTER,
                &[
                    glue::GLUE2_ENDPOINT_URL,
                    glue::GLUE2_ENDPOINT_IMPLEMENTATION_VERSION,
                ],
            ),
            Self::Srm => Query::new(
                self.schema(),
                glue::SRM_ENDPOINT_FILTER,
                &[
                    glue::GLUE2_ENDPOINT_URL,
                    glue::GLUE2_ENDPOINT_IMPLEMENTATION_VERSION,
                ],
            ),
            Self::Legacy => Query::new(
                self.schema(),
                glue::LEGACY_SRM_SERVICE_FILTER,
                &[glue::GLUE1_SERVICE_ENDPOINT, glue::GLUE1_SERVICE_VERSION],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn order_covers_every_pass_once() {
        let all: Vec<Pass> = Pass::iter().collect();
        assert_eq!(all, Pass::ORDER);
    }

    #[test]
    fn only_legacy_reads_glue1() {
        for pass in Pass::ORDER {
            let expected = if pass == Pass::Legacy {
                Schema::Glue1
            } else {
                Schema::Glue2
            };
            assert_eq!(pass.query().schema, expected, "{pass}");
        }
    }

    #[test]
    fn queries_are_distinct() {
        let filters: std::collections::HashSet<_> =
            Pass::ORDER.iter().map(|p| p.query().filter).collect();
        assert_eq!(filters.len(), Pass::ORDER.len());
    }

    #[test]
    fn display_is_kebab_case() {
        assert_eq!(Pass::Discovery.to_string(), "discovery");
        assert_eq!(Pass::Webdav.to_string(), "webdav");
    }
}
