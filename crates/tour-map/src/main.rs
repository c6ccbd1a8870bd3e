use std::process::ExitCode;
use tour_map::{Settings, logging};

fn main() -> ExitCode {
    logging::setup_logging();
    logging::log_version_info();

    let settings = Settings::from_cli();
    match tour_map::run(&settings.map_config(), settings.max_failures) {
        Ok(report) => {
            println!("Map saved successfully as {}", report.output.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
