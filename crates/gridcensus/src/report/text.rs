//! `sites.txt`: one site identifier per line.

use gridcensus_core::Site;

pub fn render(sites: &[Site]) -> String {
    let mut ids: Vec<&str> = sites.iter().map(Site::id).collect();
    ids.sort_unstable();
    let mut out = String::new();
    for id in ids {
        out.push_str(id);
        out.push('\n');
    }
    out
}
