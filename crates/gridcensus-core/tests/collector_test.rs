#![allow(clippy::unwrap_used)]
// End-to-end census runs against a scripted in-memory directory.

use std::collections::HashMap;

use pretty_assertions::assert_eq;

use gridcensus_core::{
    Collector, CoreError, Diagnostic, Directory, Pass, Protocol, Query, Record, RecordingDirectory,
    Schema, SnapshotDirectory, UNKNOWN_VERSION, glue,
};

// ── Helpers ─────────────────────────────────────────────────────────

/// Answers each pass query from a table; unknown queries fail.
#[derive(Default)]
struct ScriptedDirectory {
    answers: HashMap<Pass, Vec<Record>>,
    failing: Vec<Pass>,
    asked: Vec<Schema>,
}

impl ScriptedDirectory {
    fn answer(mut self, pass: Pass, records: Vec<Record>) -> Self {
        self.answers.insert(pass, records);
        self
    }

    fn fail(mut self, pass: Pass) -> Self {
        self.failing.push(pass);
        self
    }
}

impl Directory for ScriptedDirectory {
    async fn search(&mut self, query: &Query) -> Result<Vec<Record>, gridcensus_api::Error> {
        self.asked.push(query.schema);
        let pass = Pass::ORDER
            .into_iter()
            .find(|p| p.query().filter == query.filter)
            .unwrap();
        if self.failing.contains(&pass) {
            return Err(gridcensus_api::Error::NotRecorded {
                schema: query.schema,
                filter: query.filter.clone(),
            });
        }
        Ok(self.answers.get(&pass).cloned().unwrap_or_default())
    }

    fn source(&self) -> String {
        "ldap://bdii.example.org:2170".into()
    }
}

fn service(site: &str, host: &str) -> Record {
    Record::new(format!(
        "GLUE2ServiceID={host}/storage,GLUE2GroupID=resource,GLUE2DomainID={site},\
         GLUE2GroupID=grid,o=glue"
    ))
}

fn manager(site: &str, host: &str, version: &str) -> Record {
    Record::new(format!(
        "GLUE2ManagerID={host}/storage/manager,GLUE2ServiceID={host}/storage,\
         GLUE2GroupID=resource,GLUE2DomainID={site},GLUE2GroupID=grid,o=glue"
    ))
    .with_attr(glue::GLUE2_MANAGER_PRODUCT_VERSION, [version])
}

fn endpoint(site: &str, host: &str, id: &str, url: &str) -> Record {
    Record::new(format!(
        "GLUE2EndpointID={host}/storage/endpoint/{id},GLUE2ServiceID={host}/storage,\
         GLUE2GroupID=resource,GLUE2DomainID={site},GLUE2GroupID=grid,o=glue"
    ))
    .with_attr(glue::GLUE2_ENDPOINT_URL, [url])
    .with_attr(glue::GLUE2_ENDPOINT_IMPLEMENTATION_VERSION, ["2.0.1"])
}

fn legacy(site: &str, host: &str, version: &str) -> Record {
    let url = format!("httpg://{host}:8444/srm/managerv2");
    Record::new(format!(
        "GlueServiceUniqueID={url},Mds-Vo-name={site},Mds-Vo-name=local,o=grid"
    ))
    .with_attr(glue::GLUE1_SERVICE_ENDPOINT, [url.as_str()])
    .with_attr(glue::GLUE1_SERVICE_VERSION, [version])
}

fn full_directory() -> ScriptedDirectory {
    ScriptedDirectory::default()
        .answer(
            Pass::Discovery,
            vec![
                service("SiteX", "storageA.example.org"),
                service("SiteY", "storageB.example.org"),
            ],
        )
        .answer(
            Pass::Version,
            vec![
                manager("SiteX", "storageA.example.org", "1.11.8"),
                manager("SiteY", "storageB.example.org", "1.11.8"),
            ],
        )
        .answer(
            Pass::Webdav,
            vec![endpoint(
                "SiteX",
                "storageA.example.org",
                "HTTPS",
                "https://storageA.example.org:8443/",
            )],
        )
        .answer(
            Pass::Srm,
            vec![endpoint(
                "SiteX",
                "storageA.example.org",
                "SRM",
                "httpg://storageA.example.org:8444/srm/managerv2",
            )],
        )
        .answer(
            Pass::Legacy,
            vec![
                legacy("SiteX", "storageA.example.org", "1.9.0"),
                legacy("SiteX", "old.example.org", "1.9.0"),
                legacy("SiteZ", "legacy.example.org", "1.8.2"),
            ],
        )
}

// ── Full runs ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_full_run_merges_both_schemas() {
    let mut collector = Collector::new(full_directory());
    let report = collector.run().await.unwrap();
    let census = &report.census;

    let ids: Vec<_> = census.sites().iter().map(|s| s.id().to_owned()).collect();
    assert_eq!(ids, ["SITEX", "SITEY", "SITEZ"]);

    // Present in both schemas: GLUE 2.0 version wins.
    let a = census.find_host("SITEX", "storageA.example.org").unwrap();
    assert_eq!(a.version, "1.11.8");
    assert_eq!(a.schemas(), "glue2+glue1");
    assert_eq!(
        a.endpoint(Protocol::Webdav).unwrap().url(),
        "https://storageA.example.org:8443/"
    );
    assert!(a.endpoint(Protocol::Srm).is_some());

    let old = census.find_host("SITEX", "old.example.org").unwrap();
    assert_eq!(old.version, "1.9.0");
    assert_eq!(old.schemas(), "glue1");

    let z = census.find_host("SITEZ", "legacy.example.org").unwrap();
    assert_eq!(z.version, "1.8.2");

    let stats = census.stats();
    assert_eq!(stats.num_sites(), 3);
    // storageA, storageB, old; the SITEZ host is not counted.
    assert_eq!(stats.num_hosts(), 3);
    assert_eq!(census.host_count(), 4);
    assert_eq!(stats.version_count("1.11.8"), 2);
    assert_eq!(stats.version_count("1.9.0"), 1);
    assert_eq!(stats.version_count("1.8.2"), 1);

    assert_eq!(report.diagnostics().count(), 0);
    assert_eq!(report.source, "ldap://bdii.example.org:2170");
}

#[tokio::test]
async fn test_passes_run_in_order() {
    let mut collector = Collector::new(full_directory());
    let report = collector.run().await.unwrap();

    let order: Vec<Pass> = report.passes.iter().map(|p| p.pass).collect();
    assert_eq!(order, Pass::ORDER);

    let dir = collector.into_directory();
    assert_eq!(
        dir.asked,
        [
            Schema::Glue2,
            Schema::Glue2,
            Schema::Glue2,
            Schema::Glue2,
            Schema::Glue1
        ]
    );
}

#[tokio::test]
async fn test_host_without_version_stays_unknown() {
    let dir = ScriptedDirectory::default().answer(
        Pass::Discovery,
        vec![service("SiteX", "quiet.example.org")],
    );
    let report = Collector::new(dir).run().await.unwrap();

    let host = report
        .census
        .find_host("SITEX", "quiet.example.org")
        .unwrap();
    assert_eq!(host.version, UNKNOWN_VERSION);
    assert!(report.census.stats().versions().is_empty());
}

// ── Failures ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_failed_query_continues_with_next_pass() {
    let dir = full_directory().fail(Pass::Version);
    let report = Collector::new(dir).run().await.unwrap();

    let version = &report.passes[1];
    assert_eq!(version.pass, Pass::Version);
    assert_eq!(version.received, 0);
    assert!(matches!(
        version.diagnostics[0],
        Diagnostic::QueryFailure {
            pass: Pass::Version,
            ..
        }
    ));

    // Later passes still applied.
    let a = report
        .census
        .find_host("SITEX", "storageA.example.org")
        .unwrap();
    assert_eq!(a.version, UNKNOWN_VERSION);
    assert!(a.endpoint(Protocol::Webdav).is_some());
    assert!(a.discovered_via_glue1);
}

#[tokio::test]
async fn test_failed_discovery_leaves_endpoints_dangling() {
    let dir = full_directory().fail(Pass::Discovery);
    let report = Collector::new(dir).run().await.unwrap();

    let dangling = report
        .diagnostics()
        .filter(|d| matches!(d, Diagnostic::DanglingReference { .. }))
        .count();
    // Two managers, one WebDAV, one SRM.
    assert_eq!(dangling, 4);
    // Only the legacy pass populated anything: SITEX is created by its
    // first record, so only old.example.org counts as a host.
    assert_eq!(report.census.stats().num_sites(), 2);
    assert_eq!(report.census.stats().num_hosts(), 1);
    assert_eq!(report.census.sites().len(), 2);
    assert_eq!(report.census.host_count(), 3);
}

#[tokio::test]
async fn test_all_malformed_pass_aborts() {
    let dir = ScriptedDirectory::default().answer(
        Pass::Discovery,
        vec![Record::new("o=glue"), Record::new("GLUE2GroupID=grid,o=glue")],
    );
    let err = Collector::new(dir).run().await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::PassRejected {
            pass: Pass::Discovery,
            malformed: 2
        }
    ));
}

// ── Snapshot replay ─────────────────────────────────────────────────

#[tokio::test]
async fn test_recorded_run_replays_identically() {
    let mut live = Collector::new(RecordingDirectory::new(full_directory()));
    let first = live.run().await.unwrap();
    let (_, snapshot) = live.into_directory().into_parts();
    assert_eq!(snapshot.queries.len(), 5);

    let replay = SnapshotDirectory::from_snapshot(snapshot, "capture.json");
    let second = Collector::new(replay).run().await.unwrap();

    assert_eq!(first.census.sites(), second.census.sites());
    assert_eq!(first.census.stats(), second.census.stats());
    assert_eq!(
        first.census.hosts().map(|(_, h)| h.clone()).collect::<Vec<_>>(),
        second.census.hosts().map(|(_, h)| h.clone()).collect::<Vec<_>>()
    );
    assert!(second.source.contains("capture.json"));
}
