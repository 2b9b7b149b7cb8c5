//! Header Declaration Extraction
//!
//! Recognizes the three declaration shapes the platform intrinsics headers
//! use and nothing else:
//!
//! - `extern <ret> [<cc>] _mm<width>_<op>(<params>);` prototypes
//! - `#define <alias>(...) <target>(...)` macro aliases
//! - `__MACHINE<kind>(<ret> <name>(<params>))` wrapper-macro declarations
//!
//! Anything outside these shapes is ignored. This is not a C parser.

use regex::Regex;
use std::sync::LazyLock;

/// `extern` prototype restricted to the `_mm`, `_mm256`, `_mm512` name family.
static PROTOTYPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"extern\s+(?P<ret>[\w\s*]+?)\s+(?:(?P<cc>__cdecl|__vectorcall|__stdcall|__fastcall)\s+)?(?P<name>_mm\d*_\w+)\s*\([\w\s,*]*\)\s*;",
    )
    .expect("prototype pattern compiles")
});

/// Macro alias. The body must start on the `#define` line or after a
/// backslash continuation.
static ALIAS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#define[ \t]+(?P<alias>\w+)(?:\([\w,\s]*\))?(?:[ \t]|\\\r?\n)+(?P<target>\w+)")
        .expect("alias pattern compiles")
});

/// Declaration wrapped in one of the `__MACHINE*` helper macros.
static WRAPPER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"__MACHINE\w*\(\s*(?P<ret>[\w\s*]+?)\s+(?P<name>_\w+)\s*\([\w\s,*]*\)\s*\)")
        .expect("wrapper pattern compiles")
});

/// A directly declared entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prototype {
    pub name: String,
    pub return_type: String,
    /// Only captured for `extern` prototypes
    pub calling_convention: Option<String>,
}

/// `name` is a macro that expands to a use of `target`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub name: String,
    pub target: String,
}

/// Everything recognized in one header source, grouped by shape.
///
/// The groups are folded into the catalog in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderFacts {
    pub prototypes: Vec<Prototype>,
    pub aliases: Vec<Alias>,
    pub wrapped: Vec<Prototype>,
}

impl HeaderFacts {
    /// Total number of recognized declarations
    pub fn len(&self) -> usize {
        self.prototypes.len() + self.aliases.len() + self.wrapped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Collapse runs of whitespace so `unsigned   int` and `unsigned\nint` agree
fn normalize_type(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Scan one header source for declarations
pub fn extract(text: &str) -> HeaderFacts {
    let prototypes = PROTOTYPE_PATTERN
        .captures_iter(text)
        .map(|caps| Prototype {
            name: caps["name"].to_string(),
            return_type: normalize_type(&caps["ret"]),
            calling_convention: caps.name("cc").map(|m| m.as_str().to_string()),
        })
        .collect();

    let aliases = ALIAS_PATTERN
        .captures_iter(text)
        .map(|caps| Alias {
            name: caps["alias"].to_string(),
            target: caps["target"].to_string(),
        })
        .collect();

    let wrapped = WRAPPER_PATTERN
        .captures_iter(text)
        .map(|caps| Prototype {
            name: caps["name"].to_string(),
            return_type: normalize_type(&caps["ret"]),
            calling_convention: None,
        })
        .collect();

    HeaderFacts {
        prototypes,
        aliases,
        wrapped,
    }
}
