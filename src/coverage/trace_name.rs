//! Trace-variable name synthesis (spec §3 `VarNameMap`, §4.6).

use indexmap::IndexMap;
use regex_lite::Regex;

use super::emitter::PagePrefix;

/// Maps a synthesized base name to how many times it has already been
/// handed out in the current module, so repeats get a disambiguating
/// suffix (spec §3 `VarNameMap`, §4.6 "if the name is a repeat… append
/// `"_" + collisionCount`"). Backed by `IndexMap` rather than `HashMap` so
/// that a future debug dump of "every name handed out this module, in the
/// order it was requested" is possible without resorting to a side `Vec` —
/// compiler passes care about reproducible, order-stable output.
#[derive(Debug, Default)]
pub struct VarNameMap(IndexMap<String, u32>);

impl VarNameMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.0.clear();
    }

    /// Returns a name guaranteed unique within this module: `base` the
    /// first time it's asked for, `"{base}_{n}"` on every subsequent ask.
    pub fn unique(&mut self, base: &str) -> String {
        let count = self.0.entry(base.to_string()).or_insert(0);
        let name = if *count == 0 {
            base.to_string()
        } else {
            format!("{}_{}", base, count)
        };
        *count += 1;
        name
    }
}

/// Strips a file path down to its basename with no extension, e.g.
/// `"rtl/design.sv"` → `"design"`.
pub fn basename_no_ext(file: &str) -> String {
    let base = file.rsplit(['/', '\\']).next().unwrap_or(file);
    match base.rfind('.') {
        Some(0) | None => base.to_string(),
        Some(idx) => base[..idx].to_string(),
    }
}

/// Sanitizes a signal name for embedding in a synthesized identifier,
/// replacing anything that isn't `[A-Za-z0-9_]` with `_`.
pub fn sanitize(name: &str) -> String {
    let re = Regex::new(r"[^A-Za-z0-9_]").expect("static pattern is valid");
    re.replace_all(name, "_").into_owned()
}

/// Synthesizes a trace-coverage variable name (spec §4.6), with the
/// coverage-family word swapped in for the page prefix (`"Line"` for the
/// line/branch/toggle families, `"User"` for user-cover points — see
/// scenario 6, whose trace name begins with `"g1.g2_vlCoverageUserTrace"`),
/// prefixed by the begin-hierarchy when it is non-empty.
pub fn synthesize(
    var_names: &mut VarNameMap,
    hier: &str,
    page_prefix: PagePrefix,
    file: &str,
    line: u32,
    type_tag: &str,
) -> String {
    let family_word = match page_prefix {
        PagePrefix::User => "User",
        PagePrefix::Line | PagePrefix::Branch | PagePrefix::Toggle => "Line",
    };
    let base = format!(
        "vlCoverage{}Trace_{}__{}_{}",
        family_word,
        basename_no_ext(file),
        line,
        type_tag
    );
    let base = if hier.is_empty() {
        base
    } else {
        format!("{}_{}", hier, base)
    };
    var_names.unique(&base)
}
