// ── GLUE vocabulary ──
//
// Attribute names and LDAP filters for the StoRM census. GLUE 2.0 names
// are matched case-insensitively by `Record::first`, so the casing here
// only matters for what is requested.

/// Suffix on every StoRM `GLUE2ServiceID` (`<host>/storage`).
pub const STORAGE_SUFFIX: &str = "/storage";

// ── GLUE 2.0 ────────────────────────────────────────────────────────

pub const GLUE2_SERVICE_TYPE: &str = "GLUE2ServiceType";
pub const GLUE2_MANAGER_PRODUCT_VERSION: &str = "GLUE2ManagerProductVersion";
pub const GLUE2_ENDPOINT_URL: &str = "GLUE2EndpointURL";
pub const GLUE2_ENDPOINT_IMPLEMENTATION_VERSION: &str = "GLUE2EndpointImplementationVersion";

pub const STORAGE_SERVICE_FILTER: &str =
    "(&(objectClass=GLUE2StorageService)(GLUE2ServiceType=storm))";
pub const MANAGER_FILTER: &str = "(&(objectClass=GLUE2Manager)(GLUE2ManagerProductName=StoRM))";
pub const WEBDAV_ENDPOINT_FILTER: &str =
    "(&(objectClass=GLUE2Endpoint)(GLUE2EndpointInterfaceName=webdav)(GLUE2EndpointID=*HTTPS))";
pub const SRM_ENDPOINT_FILTER: &str = "(&(objectClass=GLUE2Endpoint)(GLUE2EndpointInterfaceName=SRM)\
     (GLUE2EndpointID=*/storage/endpoint/SRM))";

// ── GLUE 1.3 ────────────────────────────────────────────────────────

pub const GLUE1_SERVICE_ENDPOINT: &str = "GlueServiceEndpoint";
pub const GLUE1_SERVICE_VERSION: &str = "GlueServiceVersion";

/// StoRM frontends listen on 8444; that is what tells them apart from
/// other SRM implementations in the legacy tree.
pub const LEGACY_SRM_SERVICE_FILTER: &str =
    "(&(objectClass=GlueService)(GlueServiceType=SRM)(GlueServiceEndpoint=*:8444/srm/managerv2))";
