//! Persisted meeting cache: load, prune, upsert, sort, save, and the
//! incremental refresh pass.
//!
//! The cache file is the only persisted state. A missing or corrupt file
//! degrades to a fresh empty collection; a missing meetings directory is a
//! harmless no-op. Per-document parse failures are logged and skipped so a
//! single bad file never aborts a pass.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::Path;

use chrono::{Duration, Utc};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::IndexError;
use crate::record::parse_meeting_file;
use crate::types::{MeetingCache, MeetingRecord, RefreshStats};
use crate::util;

/// Read the persisted cache, or synthesize an empty one.
///
/// Corrupt JSON is deliberately not an error; the cache is derived data
/// and is rebuilt on the next pass.
pub fn load_cache(path: &Path) -> MeetingCache {
    match std::fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(cache) => cache,
            Err(e) => {
                log::warn!(
                    "Cache file {} is not valid JSON, starting fresh: {}",
                    path.display(),
                    e
                );
                MeetingCache::default()
            }
        },
        Err(_) => MeetingCache::default(),
    }
}

/// Stamp `last_updated` and write the cache atomically, creating parent
/// directories as needed.
pub fn save_cache(path: &Path, cache: &mut MeetingCache) -> Result<(), IndexError> {
    cache.last_updated = Some(util::now_rfc3339());

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| IndexError::Io(format!("create {}: {}", parent.display(), e)))?;
    }

    let json = serde_json::to_string_pretty(cache)
        .map_err(|e| IndexError::Serialize(e.to_string()))?;
    util::atomic_write_str(path, &format!("{}\n", json))
        .map_err(|e| IndexError::Io(format!("write {}: {}", path.display(), e)))?;
    Ok(())
}

/// Remove records older than the retention window, then drop mtime entries
/// whose record is gone. Dateless records are kept unconditionally.
///
/// Returns the number of records removed.
pub fn prune_old_entries(cache: &mut MeetingCache, retention_days: i64) -> usize {
    let cutoff = (Utc::now().date_naive() - Duration::days(retention_days))
        .format("%Y-%m-%d")
        .to_string();

    let before = cache.meetings.len();
    cache
        .meetings
        .retain(|m| m.date.as_deref().map_or(true, |d| d >= cutoff.as_str()));
    let pruned = before - cache.meetings.len();

    // Stale mtime entries must not outlive their record
    let live: HashSet<String> = cache
        .meetings
        .iter()
        .map(|m| m.source_file.clone())
        .collect();
    cache.file_mtimes.retain(|source, _| live.contains(source));

    if pruned > 0 {
        log::info!("Pruned {} entries older than {} days", pruned, retention_days);
    }
    pruned
}

/// Replace the record with a matching `source_file`, or append.
pub fn upsert_meeting(cache: &mut MeetingCache, record: MeetingRecord) {
    match cache
        .meetings
        .iter()
        .position(|m| m.source_file == record.source_file)
    {
        Some(idx) => cache.meetings[idx] = record,
        None => cache.meetings.push(record),
    }
}

/// Sort by date descending; records without a date sort last.
pub fn sort_meetings(cache: &mut MeetingCache) {
    cache.meetings.sort_by(|a, b| match (&a.date, &b.date) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => y.cmp(x),
    });
}

/// One full refresh pass over the meetings directory.
///
/// Safe to invoke repeatedly; with unchanged inputs the second pass
/// processes nothing. `rebuild` forces every file through the parser
/// regardless of recorded mtimes.
pub fn refresh(config: &Config, rebuild: bool) -> Result<RefreshStats, IndexError> {
    let meetings_dir = config.meetings_path();
    let cache_path = config.cache_path();

    if !meetings_dir.is_dir() {
        log::info!("No meetings directory at {}, skipping", meetings_dir.display());
        return Ok(RefreshStats::default());
    }

    let mut files: Vec<_> = WalkDir::new(&meetings_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            name.ends_with(".md") && name != "README.md"
        })
        .map(|e| e.into_path())
        .collect();
    files.sort();

    if files.is_empty() {
        log::info!("No meeting files found in {}", meetings_dir.display());
        return Ok(RefreshStats::default());
    }

    let mut cache = load_cache(&cache_path);

    // Prune up front so files already known stale by filename are never
    // parsed at all
    let mut pruned = prune_old_entries(&mut cache, config.retention_days);
    let cutoff = (Utc::now().date_naive() - Duration::days(config.retention_days))
        .format("%Y-%m-%d")
        .to_string();

    let mut processed = 0usize;
    let mut skipped = 0usize;

    for path in &files {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();
        let source_file = path
            .strip_prefix(&config.vault_root)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned();

        let mtime = match util::mtime_millis(path) {
            Ok(m) => m,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };

        // Cheap pre-check: a filename date beyond the retention cutoff
        // means the record would be pruned right back out
        if !rebuild {
            if let Some(date) = util::filename_date(&file_name) {
                if date.as_str() < cutoff.as_str() {
                    skipped += 1;
                    continue;
                }
            }

            if cache.file_mtimes.get(&source_file) == Some(&mtime) {
                skipped += 1;
                continue;
            }
        }

        match parse_meeting_file(path, &config.vault_root) {
            Ok(record) => {
                upsert_meeting(&mut cache, record);
                cache.file_mtimes.insert(source_file, mtime);
                processed += 1;
            }
            Err(e) => {
                log::warn!("Error parsing {}: {}", file_name, e);
                skipped += 1;
            }
        }
    }

    sort_meetings(&mut cache);

    // Prune again: a forced rebuild can reintroduce records the first
    // prune already removed
    pruned += prune_old_entries(&mut cache, config.retention_days);

    save_cache(&cache_path, &mut cache)?;

    let stats = RefreshStats {
        processed,
        skipped,
        pruned,
        total: cache.meetings.len(),
    };
    log::info!(
        "Processed {}, skipped {}, pruned {}, total cached: {}",
        stats.processed,
        stats.skipped,
        stats.pruned,
        stats.total
    );
    Ok(stats)
}
