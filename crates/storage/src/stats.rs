use netweather_models::{
    IdentificationMethod, LibraryUsage, ReachabilityStatistics, RecentScan, ScanResult,
    ScanStatistics, UrlReachability, UNKNOWN_LIBRARY,
};
use std::collections::{HashMap, HashSet};

/// Number of pages listed under recent scans
pub const RECENT_SCANS_LIMIT: usize = 10;

/// Aggregates stored records into totals, library usage and recent scans
pub fn summarize(
    scans: &[ScanResult],
    reachability: &[UrlReachability],
    recent_limit: usize,
) -> ScanStatistics {
    let mut last_seen: HashMap<&str, RecentScan> = HashMap::new();
    let mut usage: HashMap<(&str, &str, &str), (usize, IdentificationMethod)> = HashMap::new();
    let mut libraries = HashSet::new();

    for scan in scans {
        last_seen
            .entry(scan.base_url.as_str())
            .and_modify(|seen| seen.scanned_at = seen.scanned_at.max(scan.scanned_at))
            .or_insert_with(|| RecentScan {
                url: scan.base_url.clone(),
                scanned_at: scan.scanned_at,
            });

        if scan.library_name.is_empty() {
            continue;
        }
        if !scan.library_name.eq_ignore_ascii_case(UNKNOWN_LIBRARY) {
            libraries.insert(scan.library_name.as_str());
        }

        let entry = usage
            .entry((scan.library_name.as_str(), scan.library_version.as_str(), scan.checksum.as_str()))
            .or_insert((0, scan.identified_by));
        entry.0 += 1;
        entry.1 = entry.1.max(scan.identified_by);
    }

    let mut usage: Vec<LibraryUsage> = usage
        .into_iter()
        .map(|((name, version, checksum), (count, identified_by))| LibraryUsage {
            name: name.to_string(),
            version: version.to_string(),
            checksum: checksum.to_string(),
            count,
            identified_by,
        })
        .collect();
    usage.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.version.cmp(&b.version))
    });

    let total_urls = last_seen.len();
    let mut recent: Vec<RecentScan> = last_seen.into_values().collect();
    recent.sort_by(|a, b| b.scanned_at.cmp(&a.scanned_at).then_with(|| a.url.cmp(&b.url)));
    recent.truncate(recent_limit);

    ScanStatistics {
        total_urls,
        total_scripts: scans.len(),
        unique_libraries: libraries.len(),
        first_scan: scans.iter().map(|s| s.scanned_at).min(),
        last_scan: scans.iter().map(|s| s.scanned_at).max(),
        libraries: usage,
        recent_scans: recent,
        reachability: summarize_reachability(reachability),
    }
}

fn summarize_reachability(records: &[UrlReachability]) -> ReachabilityStatistics {
    let mut latest: HashMap<&str, &UrlReachability> = HashMap::new();
    for record in records {
        latest
            .entry(record.original_url.as_str())
            .and_modify(|current| {
                if record.scanned_at >= current.scanned_at {
                    *current = record;
                }
            })
            .or_insert(record);
    }

    let mut stats = ReachabilityStatistics {
        total_checked: latest.len(),
        ..ReachabilityStatistics::default()
    };
    for record in latest.values() {
        match (record.http_available, record.https_available) {
            (true, true) => stats.both_protocols += 1,
            (true, false) => stats.http_only += 1,
            (false, true) => stats.https_only += 1,
            (false, false) => stats.unreachable += 1,
        }
        if record.has_redirect() {
            stats.with_redirects += 1;
        }
    }
    stats
}
