//! Per-warehouse dialect fingerprint rules.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::errors::DialectResult;
use crate::models::Warehouse;

const SNOWFLAKE_RULES: &[(&str, &str)] = &[
    (r"\bIFF\s*\(", "IFF function"),
    (r"\bFLATTEN\s*\(", "FLATTEN function"),
    (r"\bLATERAL\s+FLATTEN", "LATERAL FLATTEN"),
    (r"\bVARIANT\b", "VARIANT data type"),
    (r"\bQUALIFY\b", "QUALIFY clause"),
    (r"\$\d+", "positional column reference ($1, $2)"),
    (r"::\s*VARIANT", "::VARIANT cast"),
    (r"ARRAY_AGG\s*\([^)]*\)\s+WITHIN\s+GROUP", "ARRAY_AGG ... WITHIN GROUP"),
];

const BIGQUERY_RULES: &[(&str, &str)] = &[
    (r"\bSTRUCT\s*\(", "STRUCT type"),
    (r"\bARRAY\s*\[", "ARRAY literal syntax"),
    (r"\bUNNEST\s*\(", "UNNEST function"),
    (r"\bSAFE_CAST\s*\(", "SAFE_CAST"),
    (r"\bFORMAT_DATE\s*\(", "FORMAT_DATE"),
    (r"\bPARSE_DATE\s*\(", "PARSE_DATE"),
    (r"`[^`]+\.[^`]+\.[^`]+`", "backtick project.dataset.table reference"),
    (r"\bGENERATE_UUID\s*\(", "GENERATE_UUID"),
];

const REDSHIFT_RULES: &[(&str, &str)] = &[
    (r"\bDISTKEY\b", "DISTKEY"),
    (r"\bSORTKEY\b", "SORTKEY"),
    (r"\bCOPY\s+", "COPY command"),
    (r"\bUNLOAD\s+", "UNLOAD command"),
    (r"\bLISTAGG\s*\(", "LISTAGG function"),
    (r"\bDATEADD\s*\(", "DATEADD function"),
    (r"\bDATEDIFF\s*\(", "DATEDIFF function"),
    (r"\bGETDATE\s*\(", "GETDATE function"),
];

const POSTGRES_RULES: &[(&str, &str)] = &[
    (r"::\s*\w+", ":: casting"),
    (r"\bGENERATE_SERIES\s*\(", "GENERATE_SERIES"),
    (r"\bARRAY_AGG\s*\(", "ARRAY_AGG"),
    (r"\bSTRING_AGG\s*\(", "STRING_AGG"),
    (r"\bREGEXP_MATCHES\s*\(", "REGEXP_MATCHES"),
    (r"\bJSONB\b", "JSONB data type"),
    (r"\bCROSSTAB\s*\(", "CROSSTAB"),
];

static BUILTIN: LazyLock<PatternCatalog> = LazyLock::new(PatternCatalog::builtin);

/// One fingerprint: a case-insensitive regex and the label reported when it
/// matches.
#[derive(Clone, Debug)]
pub struct DialectRule {
    pub regex: Regex,
    pub label: &'static str,
}

impl DialectRule {
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Fingerprint rules for one warehouse, in declaration order.
#[derive(Clone, Debug)]
pub struct DialectPattern {
    pub warehouse: Warehouse,
    pub rules: Vec<DialectRule>,
}

impl DialectPattern {
    /// Labels of every rule that matches somewhere in `text`, in rule order.
    pub fn matching_labels<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'static str> + 'a {
        self.rules
            .iter()
            .filter(move |rule| rule.is_match(text))
            .map(|rule| rule.label)
    }
}

/// Immutable warehouse → rules table.
#[derive(Clone, Debug)]
pub struct PatternCatalog {
    patterns: Vec<DialectPattern>,
}

impl PatternCatalog {
    /// The process-wide built-in catalog, compiled on first use.
    pub fn global() -> &'static PatternCatalog {
        &BUILTIN
    }

    fn builtin() -> Self {
        let patterns = Warehouse::ALL
            .iter()
            .map(|&warehouse| DialectPattern {
                warehouse,
                rules: builtin_rules(warehouse)
                    .iter()
                    .map(|&(pattern, label)| DialectRule {
                        regex: RegexBuilder::new(pattern)
                            .case_insensitive(true)
                            .build()
                            .expect("built-in dialect rule must compile"),
                        label,
                    })
                    .collect(),
            })
            .collect();
        Self { patterns }
    }

    pub fn pattern(&self, warehouse: Warehouse) -> &DialectPattern {
        // built in `Warehouse::ALL` order
        &self.patterns[warehouse as usize]
    }

    /// Rules for a warehouse tag; unknown tags fail with `UnknownWarehouse`.
    pub fn patterns_for(&self, tag: &str) -> DialectResult<&DialectPattern> {
        let warehouse = Warehouse::parse(tag)?;
        Ok(self.pattern(warehouse))
    }
}

fn builtin_rules(warehouse: Warehouse) -> &'static [(&'static str, &'static str)] {
    match warehouse {
        Warehouse::Snowflake => SNOWFLAKE_RULES,
        Warehouse::Bigquery => BIGQUERY_RULES,
        Warehouse::Redshift => REDSHIFT_RULES,
        Warehouse::Postgres => POSTGRES_RULES,
    }
}
