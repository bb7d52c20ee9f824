//! Implementation of write mode.

use super::Outcome;
use crate::error::Result;
use crate::generate::Generator;

/// Regenerate every artifact in place.
pub fn cmd_write(generator: &Generator) -> Result<Outcome> {
    let written = generator.write()?;

    for path in &written {
        let shown = path.strip_prefix(generator.root()).unwrap_or(path);
        println!("wrote {}", shown.display());
    }

    Ok(Outcome::Success)
}
