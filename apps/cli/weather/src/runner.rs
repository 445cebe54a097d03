//! Glue between the command line and the pipeline.

use crate::cli::Cli;

use weather_core::config::Settings;
use weather_core::endpoint::ApiEndpoint;
use weather_core::{RequestConfig, WeatherError, WeatherPipeline};

use std::fmt::Display;
use std::io::Write;
use std::process::ExitCode;

use log::debug;

/// Build the pipeline and request config.
///
/// Precedence, lowest first: built-in defaults, settings file, flags and
/// `WEATHER_*` variables. Credentials come from the environment only.
pub fn resolve(cli: &Cli) -> Result<(WeatherPipeline, RequestConfig), WeatherError> {
    let settings = match cli.config {
        Some(ref path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let mut config = RequestConfig::from_env()?;
    settings.apply_to(&mut config);

    let overrides = [
        (&cli.datetime, &mut config.datetime),
        (&cli.parameters, &mut config.parameters),
        (&cli.location, &mut config.location),
        (&cli.format, &mut config.format),
    ];
    for (value, target) in overrides {
        if let Some(value) = value {
            target.clone_from(value);
        }
    }

    let endpoint = match cli.base_url.as_deref().or(settings.api.base_url.as_deref()) {
        Some(base_url) => ApiEndpoint::parse(base_url)?,
        None => ApiEndpoint::default(),
    };
    debug!("API endpoint: {}", endpoint.as_str());

    Ok((WeatherPipeline::new(endpoint), config))
}

/// Run once: the document goes to `out`, failures go to `err` as
/// `Error: <message> at <location>`.
pub async fn run<W, E>(cli: &Cli, out: &mut W, err: &mut E) -> ExitCode
where
    W: Write,
    E: Write,
{
    let result = match resolve(cli) {
        Ok((pipeline, config)) => pipeline.run(&config, out).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("Run failed ({})", e.kind());
            report_failure(&e, err);
            ExitCode::FAILURE
        }
    }
}

/// Write one `Error: ...` line. A failing stderr is ignored: there is nowhere left to report it.
pub fn report_failure<E>(failure: &dyn Display, err: &mut E)
where
    E: Write,
{
    let _ = writeln!(err, "Error: {failure}");
    let _ = err.flush();
}
