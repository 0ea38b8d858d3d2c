//! Detect files that carry warehouse-specific SQL syntax.

use std::path::Path;

use indexmap::IndexSet;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::dialect::catalog::{DialectPattern, PatternCatalog};
use crate::errors::DialectResult;
use crate::models::{ScanReport, TranslationCandidate, Warehouse};
use crate::project::filesystem::{iter_project_sources, FileArtifact};

fn scan_file(file: &FileArtifact, pattern: &DialectPattern) -> Option<TranslationCandidate> {
    let content = match file.read_content() {
        Ok(c) => c,
        Err(e) => {
            warn!("Could not read {}: {e}", file.absolute_path.display());
            return None;
        }
    };
    let detected: IndexSet<String> = pattern
        .matching_labels(&content)
        .map(str::to_string)
        .collect();
    if detected.is_empty() {
        return None;
    }
    Some(TranslationCandidate {
        file: file.relative_path.clone(),
        full_path: file.absolute_path.clone(),
        detected_syntax: detected,
    })
}

/// Scan the project's source directories with one warehouse's rules.
///
/// Files are checked in parallel; results come back in traversal order and
/// are then stable-sorted by match count, most matches first. Unreadable
/// files are skipped.
pub fn scan_with(
    project_root: &Path,
    pattern: &DialectPattern,
) -> Vec<TranslationCandidate> {
    let files = iter_project_sources(project_root);
    let mut candidates: Vec<TranslationCandidate> = files
        .par_iter()
        .filter_map(|file| scan_file(file, pattern))
        .collect();
    candidates.sort_by(|a, b| b.pattern_count().cmp(&a.pattern_count()));
    candidates
}

/// Scan with the built-in rules for `warehouse`.
///
/// An unknown tag fails before the tree is touched.
pub fn scan(project_root: &Path, warehouse: &str) -> DialectResult<Vec<TranslationCandidate>> {
    let pattern = PatternCatalog::global().patterns_for(warehouse)?;
    Ok(scan_with(project_root, pattern))
}

/// Build the full scan report for `source`, noting the planned `target`.
///
/// Both tags are validated; an unknown target fails just like an unknown
/// source.
pub fn identify_candidates(
    project_root: &Path,
    source: &str,
    target: Option<&str>,
) -> DialectResult<ScanReport> {
    let source = Warehouse::parse(source)?;
    let target = target.map(Warehouse::parse).transpose()?;
    info!(
        "Scanning dbt project for {source} syntax: {}",
        project_root.display()
    );
    if let Some(t) = target {
        info!("Planning translation to: {t}");
    }
    let candidates = scan_with(project_root, PatternCatalog::global().pattern(source));
    Ok(ScanReport {
        source,
        target,
        candidates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DialectError;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn snowflake_functions_detected() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "models/flat.sql", "SELECT IFF(a,b,c), FLATTEN(x) FROM t");
        let candidates = scan(tmp.path(), "snowflake").unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].file, "models/flat.sql");
        assert!(candidates[0].pattern_count() >= 2);
        assert!(candidates[0].detected_syntax.contains("IFF function"));
        assert!(candidates[0].detected_syntax.contains("FLATTEN function"));
    }

    #[test]
    fn unknown_warehouse_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            scan(tmp.path(), "oracle"),
            Err(DialectError::UnknownWarehouse(_))
        ));
    }

    #[test]
    fn clean_project_yields_empty_result() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "models/plain.sql", "select id, name from users");
        assert!(scan(tmp.path(), "redshift").unwrap().is_empty());
        assert!(scan(&tmp.path().join("missing"), "redshift").unwrap().is_empty());
    }

    #[test]
    fn match_count_uses_distinct_labels() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "models/repeated.sql",
            "select iff(a,1,0), iff(b,1,0), iff(c,1,0) from t",
        );
        let candidates = scan(tmp.path(), "snowflake").unwrap();
        assert_eq!(candidates[0].pattern_count(), 1);
        assert_eq!(candidates[0].detected_syntax.len(), 1);
    }

    #[test]
    fn sorted_by_count_with_stable_ties() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "models/a_one.sql", "select getdate()");
        write(tmp.path(), "models/b_three.sql", "select getdate(), dateadd(day,1,x), listagg(y)");
        write(tmp.path(), "macros/c_one.sql", "select listagg(z)");
        write(tmp.path(), "tests/d_one.sql", "unload ('select 1')");

        let first: Vec<String> = scan(tmp.path(), "redshift")
            .unwrap()
            .into_iter()
            .map(|c| c.file)
            .collect();
        assert_eq!(
            first,
            vec![
                "models/b_three.sql",
                "models/a_one.sql",
                "macros/c_one.sql",
                "tests/d_one.sql",
            ]
        );
        for _ in 0..5 {
            let again: Vec<String> = scan(tmp.path(), "redshift")
                .unwrap()
                .into_iter()
                .map(|c| c.file)
                .collect();
            assert_eq!(again, first);
        }
    }

    #[test]
    fn non_sql_and_non_source_files_ignored() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "models/schema.yml", "iff(");
        write(tmp.path(), "target/compiled/x.sql", "select iff(a,b,c)");
        assert!(scan(tmp.path(), "snowflake").unwrap().is_empty());
    }

    #[test]
    fn unreadable_file_is_skipped() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "models/good.sql", "select iff(a,b,c)");
        let bad = tmp.path().join("models/bad.sql");
        std::fs::write(&bad, [0xff, 0xfe, 0x00, 0x49, 0x46, 0x46]).unwrap();
        let candidates = scan(tmp.path(), "snowflake").unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].file, "models/good.sql");
    }

    #[test]
    fn report_carries_warehouses() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "models/a.sql", "select x::jsonb");
        let report = identify_candidates(tmp.path(), "Postgres", Some("snowflake")).unwrap();
        assert_eq!(report.source, Warehouse::Postgres);
        assert_eq!(report.target, Some(Warehouse::Snowflake));
        assert_eq!(report.candidates.len(), 1);
    }

    #[test]
    fn unknown_target_fails_before_scanning() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "models/a.sql", "select x::jsonb");
        match identify_candidates(tmp.path(), "postgres", Some("db2")) {
            Err(DialectError::UnknownWarehouse(tag)) => assert_eq!(tag, "db2"),
            other => panic!("expected UnknownWarehouse, got {other:?}"),
        }
        let report = identify_candidates(tmp.path(), "postgres", None).unwrap();
        assert_eq!(report.target, None);
    }
}
