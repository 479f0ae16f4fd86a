use std::path::Path;

use anyhow::anyhow;
use config::{Config, File};
use serde::Deserialize;

/// Validation toggles for one document pass.
#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// Directive block validation (fences, registry, parameters).
    pub directive_diagnostics: bool,
    /// applies_to lifecycle/version analysis.
    pub applies_to_diagnostics: bool,
    /// Hint-severity suggestions for implicit version syntax.
    pub implicit_syntax_hints: bool,
    /// Warnings for directives missing from the registry.
    pub unknown_directive_warnings: bool,
    /// Warnings for substitution references with no definition. Off by
    /// default: the full substitution set lives with the host's docset
    /// configuration, which this core cannot see.
    pub substitution_diagnostics: bool,
}

impl Settings {
    pub fn new(root_dir: &Path) -> anyhow::Result<Settings> {
        let expanded = shellexpand::tilde("~/.config/docslint/settings");
        let settings = Config::builder()
            .add_source(File::with_name(&expanded).required(false))
            .add_source(
                File::with_name(&format!(
                    "{}/.docslint",
                    root_dir
                        .to_str()
                        .ok_or(anyhow!("Can't convert root_dir to str"))?
                ))
                .required(false),
            )
            .set_default("directive_diagnostics", true)?
            .set_default("applies_to_diagnostics", true)?
            .set_default("implicit_syntax_hints", true)?
            .set_default("unknown_directive_warnings", true)?
            .set_default("substitution_diagnostics", false)?
            .build()
            .map_err(|err| anyhow!("Build err: {err}"))?;

        let settings = settings.try_deserialize::<Settings>()?;

        anyhow::Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            directive_diagnostics: true,
            applies_to_diagnostics: true,
            implicit_syntax_hints: true,
            unknown_directive_warnings: true,
            substitution_diagnostics: false,
        }
    }
}
