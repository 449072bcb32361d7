//! Subcommand handlers
//!
//! Handlers return the text to print so they can be exercised without a
//! terminal.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::ArgMatches;
use std::path::PathBuf;
use swxsoc_annotations::{
    AnnotationClient, AnnotationQuery, AnnotationTarget, AnnotationTransport, GrafanaConfig,
    NewAnnotation,
};
use swxsoc_config::{ConfigHandle, ConfigLoader, MissionProvider};
use swxsoc_filename::{FileNameRequest, FilenameCodec, TimeInput};

/// Loader honoring `--config-dir` and `--mission`
///
/// Both flags fall back to their environment variables through clap, so
/// the loader does not read the environment again.
#[must_use]
pub fn loader_from(matches: &ArgMatches) -> ConfigLoader {
    let mut loader = ConfigLoader::new();
    if let Some(dir) = matches.get_one::<PathBuf>("config-dir") {
        loader = loader.with_config_dir(dir);
    }
    if let Some(mission) = matches.get_one::<String>("mission").filter(|m| !m.is_empty()) {
        loader = loader.with_mission(mission);
    }
    loader
}

/// Dispatch a parsed command line
///
/// # Errors
/// Configuration, file name, annotation and serialization errors, with
/// context naming the failed command.
pub async fn run(matches: &ArgMatches, handle: &ConfigHandle) -> Result<String> {
    match matches.subcommand() {
        Some(("filename", sub)) => filename(sub, handle),
        Some(("config", sub)) => config(sub, handle, &loader_from(matches)),
        Some(("annotations", sub)) => {
            let client = AnnotationClient::connect(&grafana_config(sub)?)
                .context("cannot create Grafana client")?;
            annotations(sub, &client).await
        }
        Some((other, _)) => bail!("unknown command '{other}'"),
        None => bail!("no command given"),
    }
}

fn filename(matches: &ArgMatches, handle: &ConfigHandle) -> Result<String> {
    let codec = FilenameCodec::new(handle);
    match matches.subcommand() {
        Some(("build", args)) => {
            let request = build_request(args)?;
            codec.build(&request).context("cannot build file name")
        }
        Some(("parse", args)) => {
            let name = required::<String>(args, "name")?;
            let record = codec
                .parse(name)
                .with_context(|| format!("cannot parse '{name}'"))?;
            Ok(serde_json::to_string_pretty(&record)?)
        }
        _ => bail!("expected 'build' or 'parse'"),
    }
}

/// Assemble a build request from `filename build` arguments
///
/// # Errors
/// Fails if a required argument is missing.
pub fn build_request(args: &ArgMatches) -> Result<FileNameRequest> {
    let time = match args.get_one::<f64>("julian-date") {
        Some(jd) => TimeInput::JulianDate(*jd),
        None => TimeInput::from(required::<String>(args, "time")?.as_str()),
    };
    let mut request = FileNameRequest::new(
        required::<String>(args, "instrument")?.as_str(),
        time,
        required::<String>(args, "level")?.as_str(),
        required::<String>(args, "version")?.as_str(),
    )
    .with_test(args.get_flag("test"));
    if let Some(mode) = args.get_one::<String>("mode") {
        request = request.with_mode(mode);
    }
    if let Some(descriptor) = args.get_one::<String>("descriptor") {
        request = request.with_descriptor(descriptor);
    }
    Ok(request)
}

fn config(matches: &ArgMatches, handle: &ConfigHandle, loader: &ConfigLoader) -> Result<String> {
    match matches.subcommand() {
        Some(("show", _)) => Ok(serde_json::to_string_pretty(&*handle.mission())?),
        Some(("missions", _)) => {
            let settings = loader.load().context("cannot load configuration")?;
            let active = handle.mission();
            let lines: Vec<String> = settings
                .mission_names()
                .map(|name| {
                    let marker = if name == active.mission_prefix() { "*" } else { " " };
                    format!("{marker} {name}")
                })
                .collect();
            Ok(lines.join("\n"))
        }
        _ => bail!("expected 'show' or 'missions'"),
    }
}

fn grafana_config(matches: &ArgMatches) -> Result<GrafanaConfig> {
    let url = matches
        .get_one::<String>("grafana-url")
        .context("Grafana URL not set; use --grafana-url or SWXSOC_GRAFANA_URL")?;
    let key = matches
        .get_one::<String>("api-key")
        .context("Grafana API key not set; use --api-key or SWXSOC_GRAFANA_API_KEY")?;
    Ok(GrafanaConfig::new(url, key))
}

/// Run an `annotations` subcommand against a client
///
/// # Errors
/// Argument, time and annotation errors.
pub async fn annotations<T: AnnotationTransport>(
    matches: &ArgMatches,
    client: &AnnotationClient<T>,
) -> Result<String> {
    match matches.subcommand() {
        Some(("query", args)) => {
            let (start, end) = time_range(args)?;
            let mut query = AnnotationQuery::new(start, end).with_tags(tags(args));
            if let Some(target) = target(args) {
                query = query.with_target(target);
            }
            if let Some(limit) = args.get_one::<u32>("limit") {
                query = query.with_limit(*limit);
            }
            let found = client
                .query_annotations(&query)
                .await
                .context("annotation query failed")?;
            Ok(serde_json::to_string_pretty(&found)?)
        }
        Some(("create", args)) => {
            let (start, end) = time_range(args)?;
            let mut annotation =
                NewAnnotation::new(start, end, required::<String>(args, "text")?.as_str())
                    .with_tags(tags(args));
            if let Some(target) = target(args) {
                annotation = annotation.with_target(target);
            }
            let id = client
                .create_annotation(&annotation, args.get_flag("overwrite"))
                .await
                .context("cannot create annotation")?;
            Ok(id.to_string())
        }
        Some(("remove", args)) => {
            let id = *required::<i64>(args, "id")?;
            let removed = client
                .remove_annotation(id)
                .await
                .context("cannot remove annotation")?;
            if removed {
                Ok(format!("removed annotation {id}"))
            } else {
                bail!("annotation {id} was not removed")
            }
        }
        _ => bail!("expected 'query', 'create' or 'remove'"),
    }
}

fn required<'a, T: Clone + Send + Sync + 'static>(args: &'a ArgMatches, id: &str) -> Result<&'a T> {
    args.get_one::<T>(id)
        .with_context(|| format!("missing required argument '--{id}'"))
}

fn tags(args: &ArgMatches) -> Vec<String> {
    args.get_many::<String>("tag")
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn target(args: &ArgMatches) -> Option<AnnotationTarget> {
    let mut target = match (
        args.get_one::<String>("dashboard-uid"),
        args.get_one::<String>("dashboard"),
    ) {
        (Some(uid), _) => AnnotationTarget::dashboard_uid(uid),
        (None, Some(title)) => AnnotationTarget::dashboard_title(title),
        (None, None) => return None,
    };
    if let Some(id) = args.get_one::<i64>("panel-id") {
        target = target.with_panel_id(*id);
    } else if let Some(title) = args.get_one::<String>("panel") {
        target = target.with_panel_title(title);
    }
    Some(target)
}

fn time_range(args: &ArgMatches) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    Ok((
        parse_utc(required::<String>(args, "start")?)?,
        parse_utc(required::<String>(args, "end")?)?,
    ))
}

/// Parse `YYYY-MM-DDThh:mm:ss` as UTC, or RFC 3339 with an offset
///
/// # Errors
/// Fails if the text is neither form.
pub fn parse_utc(text: &str) -> Result<DateTime<Utc>> {
    if let Ok(naive) = swxsoc_filename::time::parse_iso(text) {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .with_context(|| format!("invalid time '{text}', expected ISO 8601"))
}
