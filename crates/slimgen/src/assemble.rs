//! Output assembly: banner, platform includes, then every unit in order.

use crate::error::GenError;
use crate::render::render_unit;
use crate::unit::Unit;
use std::fmt::Write as _;

/// Concatenate the artifact. Units are separated by one blank line.
pub fn assemble(banner: &str, includes: &[String], units: &[Unit]) -> Result<String, GenError> {
    let mut out = String::new();

    if !banner.is_empty() {
        out.push_str(banner);
        if !banner.ends_with('\n') {
            out.push('\n');
        }
        out.push('\n');
    }

    if !includes.is_empty() {
        for include in includes {
            writeln!(out, "#include <{}>", include)?;
        }
        out.push('\n');
    }

    for (i, unit) in units.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_unit(&mut out, unit)?;
    }

    Ok(out)
}
