// ── Aggregation model ──
//
// The one owned aggregate every pass reconciles into: sites (kept sorted
// by identifier) plus the running statistics. Passes live in `merge`.

use serde::Serialize;

use crate::model::{Host, Site, Stats};

/// Sites, hosts and statistics built up over a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Census {
    pub(crate) sites: Vec<Site>,
    pub(crate) stats: Stats,
}

impl Census {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sites in identifier order.
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn find_site(&self, id: &str) -> Option<&Site> {
        self.sites.iter().find(|s| s.id() == id)
    }

    pub fn find_host(&self, site: &str, hostname: &str) -> Option<&Host> {
        self.find_site(site)?.find_host(hostname)
    }

    /// Hosts actually held by the model (independent of `Stats`).
    pub fn host_count(&self) -> usize {
        self.sites.iter().map(|s| s.hosts().len()).sum()
    }

    /// Every host with its owning site, in report order.
    pub fn hosts(&self) -> impl Iterator<Item = (&Site, &Host)> {
        self.sites
            .iter()
            .flat_map(|site| site.hosts().iter().map(move |host| (site, host)))
    }

    /// Hand-off to renderers.
    pub fn into_parts(self) -> (Stats, Vec<Site>) {
        (self.stats, self.sites)
    }
}

/// Find the site `id`, creating it in sorted position if absent.
/// The flag is `true` when the site was created.
pub(crate) fn site_entry<'a>(sites: &'a mut Vec<Site>, id: &str) -> (&'a mut Site, bool) {
    if let Some(pos) = sites.iter().position(|s| s.id() == id) {
        return (&mut sites[pos], false);
    }
    let pos = insert_site(sites, Site::new(id));
    (&mut sites[pos], true)
}

/// Insert a site keeping identifier order; returns its index.
pub(crate) fn insert_site(sites: &mut Vec<Site>, site: Site) -> usize {
    let pos = sites.partition_point(|s| s.id() < site.id());
    sites.insert(pos, site);
    pos
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::UNKNOWN_VERSION;

    #[test]
    fn site_entry_creates_once() {
        let mut sites = Vec::new();
        let (_, created) = site_entry(&mut sites, "SITEB");
        assert!(created);
        let (_, created) = site_entry(&mut sites, "SITEB");
        assert!(!created);
        assert_eq!(sites.len(), 1);
    }

    #[test]
    fn sites_stay_sorted() {
        let mut sites = Vec::new();
        for id in ["SITEC", "SITEA", "SITEB"] {
            site_entry(&mut sites, id);
        }
        let ids: Vec<_> = sites.iter().map(Site::id).collect();
        assert_eq!(ids, ["SITEA", "SITEB", "SITEC"]);
    }

    #[test]
    fn lookups_and_counts() {
        let mut census = Census::new();
        let (site, _) = site_entry(&mut census.sites, "SITEX");
        site.add_host(Host::new("b.example.org", UNKNOWN_VERSION))
            .unwrap();
        site.add_host(Host::new("a.example.org", "1.11.8")).unwrap();

        assert!(census.find_site("SITEX").is_some());
        assert!(census.find_site("SITEY").is_none());
        assert_eq!(
            census.find_host("SITEX", "a.example.org").unwrap().version,
            "1.11.8"
        );
        assert_eq!(census.host_count(), 2);

        let order: Vec<_> = census
            .hosts()
            .map(|(s, h)| format!("{}/{}", s.id(), h.hostname))
            .collect();
        assert_eq!(order, ["SITEX/a.example.org", "SITEX/b.example.org"]);
    }
}
