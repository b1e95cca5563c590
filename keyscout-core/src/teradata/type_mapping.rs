//! Teradata to unified data type conversion.
//!
//! Drivers report column types by name, with optional parameters
//! (`VARCHAR(30)`, `DECIMAL(18,2)`, `TIMESTAMP(6) WITH TIME ZONE`) and
//! trailing attributes (`CHARACTER SET UNICODE`). The mapping is a static
//! table keyed by the parameter-free base name; anything it does not know
//! resolves to [`UnifiedDataType::Unknown`] instead of failing.

use crate::models::UnifiedDataType;

/// Types that have no closer unified equivalent but are known Teradata
/// types, reported as [`UnifiedDataType::Custom`].
const CUSTOM_TYPES: &[&str] = &[
    "ST_GEOMETRY",
    "MBR",
    "MBB",
    "ARRAY",
    "VARRAY",
    "DATASET",
    "TD_ANYTYPE",
    "XMLTYPE",
];

/// Maps a Teradata type name to the unified data type system.
///
/// # Arguments
/// * `type_name` - Type name as reported by the driver (case-insensitive)
///
/// # Example
/// ```rust
/// use keyscout_core::models::UnifiedDataType;
/// use keyscout_core::teradata::type_mapping::map_teradata_type;
///
/// assert_eq!(
///     map_teradata_type("INTEGER"),
///     UnifiedDataType::Integer { bits: 32, signed: true }
/// );
/// assert_eq!(map_teradata_type("SOMETHING ODD"), UnifiedDataType::Unknown);
/// ```
pub fn map_teradata_type(type_name: &str) -> UnifiedDataType {
    let normalized = type_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();
    if normalized.is_empty() {
        return UnifiedDataType::Unknown;
    }

    // PERIOD nests a full type name, including its own parentheses.
    if let Some(element) = period_element(&normalized) {
        return UnifiedDataType::Period {
            element: element.to_string(),
        };
    }

    let (base, params) = split_parameters(&normalized);
    let first = params.first().copied().flatten();
    let second = params.get(1).copied().flatten();

    if let Some(qualifier) = base.strip_prefix("INTERVAL ") {
        return UnifiedDataType::Interval {
            qualifier: qualifier.to_string(),
        };
    }

    // Character attributes such as CHARACTER SET or CASESPECIFIC trail the
    // type; only the leading words decide the mapping.
    let base = strip_character_attributes(&base);

    match base {
        "BYTEINT" => UnifiedDataType::Integer {
            bits: 8,
            signed: true,
        },
        "SMALLINT" => UnifiedDataType::Integer {
            bits: 16,
            signed: true,
        },
        "INTEGER" | "INT" => UnifiedDataType::Integer {
            bits: 32,
            signed: true,
        },
        "BIGINT" => UnifiedDataType::Integer {
            bits: 64,
            signed: true,
        },
        "DECIMAL" | "DEC" | "NUMERIC" | "NUMBER" => UnifiedDataType::Decimal {
            precision: first.and_then(|p| u8::try_from(p).ok()),
            scale: second.and_then(|s| u8::try_from(s).ok()),
        },
        "FLOAT" | "REAL" | "DOUBLE PRECISION" => UnifiedDataType::Float {
            precision: Some(53),
        },

        "CHAR" | "CHARACTER" | "VARCHAR" | "CHARACTER VARYING" | "CHAR VARYING" | "GRAPHIC"
        | "VARGRAPHIC" | "CLOB" | "CHARACTER LARGE OBJECT" => {
            UnifiedDataType::String { max_length: first }
        }
        "LONG VARCHAR" => UnifiedDataType::String {
            max_length: Some(64_000),
        },
        "LONG VARGRAPHIC" => UnifiedDataType::String {
            max_length: Some(32_000),
        },

        "BYTE" | "VARBYTE" | "BLOB" | "BINARY LARGE OBJECT" => {
            UnifiedDataType::Binary { max_length: first }
        }

        "DATE" => UnifiedDataType::Date,
        "TIME" => UnifiedDataType::Time {
            with_timezone: false,
        },
        "TIME WITH TIME ZONE" => UnifiedDataType::Time {
            with_timezone: true,
        },
        "TIMESTAMP" => UnifiedDataType::DateTime {
            with_timezone: false,
        },
        "TIMESTAMP WITH TIME ZONE" => UnifiedDataType::DateTime {
            with_timezone: true,
        },

        "BOOLEAN" => UnifiedDataType::Boolean,
        "JSON" => UnifiedDataType::Json,
        "XML" => UnifiedDataType::Xml,

        other if CUSTOM_TYPES.contains(&other) => UnifiedDataType::Custom {
            type_name: other.to_string(),
        },

        _ => UnifiedDataType::Unknown,
    }
}

/// Maps an optional reported type name; a missing name is unresolvable.
pub fn map_reported_type(type_name: Option<&str>) -> UnifiedDataType {
    type_name.map_or(UnifiedDataType::Unknown, map_teradata_type)
}

fn period_element(normalized: &str) -> Option<&str> {
    let rest = normalized.strip_prefix("PERIOD")?.trim_start();
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;
    let inner = inner.trim();
    (!inner.is_empty()).then_some(inner)
}

/// Removes every parenthesized group, returning the remaining words and the
/// numeric parameters of the first group (`None` for a non-numeric one).
fn split_parameters(normalized: &str) -> (String, Vec<Option<u32>>) {
    let mut base = String::with_capacity(normalized.len());
    let mut params = Vec::new();
    let mut rest = normalized;
    let mut first_group = true;

    while let Some(open) = rest.find('(') {
        base.push_str(&rest[..open]);
        let after = &rest[open..];
        let Some(close) = after.find(')') else {
            rest = "";
            break;
        };
        if first_group {
            params = after[1..close].split(',').map(parse_size).collect();
            first_group = false;
        }
        rest = &after[close..];
        rest = rest.strip_prefix(')').unwrap_or(rest);
    }
    base.push_str(rest);

    let base = base.split_whitespace().collect::<Vec<_>>().join(" ");
    (base, params)
}

/// Parses a length parameter, honouring the `K`/`M`/`G` multipliers used by
/// LOB declarations.
fn parse_size(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    let (digits, multiplier) = match raw.chars().last()? {
        'K' => (&raw[..raw.len().saturating_sub(1)], 1024_u32),
        'M' => (&raw[..raw.len().saturating_sub(1)], 1024 * 1024),
        'G' => (&raw[..raw.len().saturating_sub(1)], 1024 * 1024 * 1024),
        _ => (raw, 1),
    };
    digits.trim().parse::<u32>().ok()?.checked_mul(multiplier)
}

fn strip_character_attributes(base: &str) -> &str {
    const ATTRIBUTES: &[&str] = &[
        " CHARACTER SET",
        " CHARSET",
        " CASESPECIFIC",
        " NOT CASESPECIFIC",
        " UPPERCASE",
        " NOT NULL",
    ];
    ATTRIBUTES
        .iter()
        .filter_map(|attr| base.find(attr))
        .min()
        .map_or(base, |cut| &base[..cut])
}
