//! Config command handler. Prints what every other command would use.

use oc_config::Loaded;

use crate::cli::ConfigArgs;
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, loaded: &Loaded) -> Result<(), CliError> {
    if args.occonfig {
        let body = loaded.settings.to_toml()?;
        output::print_output(body.trim_end())
    } else {
        let lines = loaded.settings.describe(loaded.source.as_deref());
        output::print_output(&lines.join("\n"))
    }
}
