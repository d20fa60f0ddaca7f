use anyhow::Result;
use groundwork::cli::{build_app, root_command, CliContext};
use groundwork::config::load_settings;
use groundwork::errors::CliError;
use groundwork::logging::init_logging;
use std::path::PathBuf;

fn main() -> Result<()> {
    let app = build_app()?;
    let matches = root_command(&app).get_matches();

    let settings = load_settings(matches.get_one::<PathBuf>("config").map(PathBuf::as_path));
    init_logging(&settings, matches.get_count("verbose"));

    let ctx = CliContext::new().with_client(settings);
    match app.dispatch(&ctx, &matches) {
        Ok(()) => Ok(()),
        // Already reported to the user by the helper that raised it
        Err(e) => match e.downcast_ref::<CliError>() {
            Some(cli_error) => std::process::exit(cli_error.exit_code()),
            None => Err(e),
        },
    }
}
