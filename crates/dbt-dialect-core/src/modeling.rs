//! Heuristic data-modeling classification over compiled SQL.

use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::models::{SchemaGuess, SchemaPattern};
use crate::project::filesystem::iter_sql_files;

const VAULT_TAGS: &[&str] = &["hub_", "link_", "sat_"];
const STAR_TAGS: &[&str] = &["dim_", "fact_"];
const SNOWFLAKE_TAGS: &[&str] = &["bridge_", "snowflake_"];

fn contains_any(sql: &str, tags: &[&str]) -> bool {
    tags.iter().any(|tag| sql.contains(tag))
}

/// Add one file's signals to `scores`. `sql` must already be lower-cased.
///
/// The join rule and the dim_/fact_ rule both credit `star_schema`, so one
/// file can add 2 to it.
fn score_sql(sql: &str, scores: &mut IndexMap<SchemaPattern, u32>) {
    let mut bump = |pattern: SchemaPattern| *scores.entry(pattern).or_insert(0) += 1;

    if sql.contains("join") && sql.contains(" on ") {
        bump(SchemaPattern::StarSchema);
    }
    if contains_any(sql, VAULT_TAGS) {
        bump(SchemaPattern::DataVault);
    }
    if contains_any(sql, STAR_TAGS) {
        bump(SchemaPattern::StarSchema);
    }
    if contains_any(sql, SNOWFLAKE_TAGS) {
        bump(SchemaPattern::SnowflakeSchema);
    }
}

/// Score every `.sql` file under `compiled_dir` and pick the likeliest
/// modeling pattern.
///
/// A missing or empty directory gives all-zero scores and `star_schema`.
pub fn classify(compiled_dir: &Path) -> SchemaGuess {
    let mut scores: IndexMap<SchemaPattern, u32> =
        SchemaPattern::ALL.iter().map(|p| (*p, 0)).collect();

    for file in iter_sql_files(compiled_dir, compiled_dir) {
        let sql = match file.read_content() {
            Ok(s) => s.to_lowercase(),
            Err(e) => {
                warn!("Could not read {}: {e}", file.absolute_path.display());
                continue;
            }
        };
        score_sql(&sql, &mut scores);
    }

    let guess = SchemaGuess::from_scores(scores);
    debug!(
        "Schema scores for {}: {:?} -> {}",
        compiled_dir.display(),
        guess.scores,
        guess.guess
    );
    guess
}
