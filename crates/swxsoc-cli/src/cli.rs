//! Command line definition

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;
use swxsoc_annotations::{GRAFANA_API_KEY_ENV, GRAFANA_URL_ENV};
use swxsoc_config::{CONFIG_DIR_ENV, MISSION_ENV};

/// The `swxsoc` command tree
#[must_use]
pub fn command() -> Command {
    Command::new("swxsoc")
        .version(crate::VERSION)
        .about("SWxSOC science file names, mission configuration and dashboard annotations")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("mission")
                .long("mission")
                .global(true)
                .env(MISSION_ENV)
                .help("Mission to use instead of the configured selected_mission"),
        )
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .global(true)
                .env(CONFIG_DIR_ENV)
                .value_parser(value_parser!(PathBuf))
                .help("Directory containing config.yml"),
        )
        .subcommand(filename_command())
        .subcommand(
            Command::new("config")
                .about("Inspect the mission configuration")
                .subcommand_required(true)
                .subcommand(Command::new("show").about("Print the active mission as JSON"))
                .subcommand(Command::new("missions").about("List configured missions")),
        )
        .subcommand(annotations_command())
}

fn filename_command() -> Command {
    Command::new("filename")
        .about("Build or parse science file names")
        .subcommand_required(true)
        .subcommand(
            Command::new("build")
                .about("Build a file name from its fields")
                .arg(
                    Arg::new("instrument")
                        .long("instrument")
                        .required(true)
                        .help("Instrument name, e.g. eea"),
                )
                .arg(
                    Arg::new("time")
                        .long("time")
                        .required_unless_present("julian-date")
                        .conflicts_with("julian-date")
                        .help("Observation start, ISO 8601 (2024-04-06T12:06:21)"),
                )
                .arg(
                    Arg::new("julian-date")
                        .long("julian-date")
                        .value_parser(value_parser!(f64))
                        .help("Observation start as a Julian date"),
                )
                .arg(
                    Arg::new("level")
                        .long("level")
                        .required(true)
                        .help("Data level, l0 selects the level 0 convention"),
                )
                .arg(
                    Arg::new("version")
                        .long("version")
                        .required(true)
                        .help("X.Y.Z, or NN for level 0"),
                )
                .arg(Arg::new("mode").long("mode").help("Instrument mode"))
                .arg(
                    Arg::new("descriptor")
                        .long("descriptor")
                        .help("Free-form descriptor"),
                )
                .arg(
                    Arg::new("test")
                        .long("test")
                        .action(ArgAction::SetTrue)
                        .help("Mark as test data"),
                ),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a file name and print its fields as JSON")
                .arg(Arg::new("name").required(true).help("File name to parse")),
        )
}

fn annotations_command() -> Command {
    let target_args = [
        Arg::new("dashboard")
            .long("dashboard")
            .conflicts_with("dashboard-uid")
            .help("Dashboard title"),
        Arg::new("dashboard-uid")
            .long("dashboard-uid")
            .help("Dashboard UID"),
        Arg::new("panel")
            .long("panel")
            .conflicts_with("panel-id")
            .help("Panel title"),
        Arg::new("panel-id")
            .long("panel-id")
            .value_parser(value_parser!(i64))
            .help("Panel id"),
    ];
    let range_args = [
        Arg::new("start")
            .long("start")
            .required(true)
            .help("Range start, ISO 8601 UTC"),
        Arg::new("end")
            .long("end")
            .required(true)
            .help("Range end, ISO 8601 UTC"),
        Arg::new("tag")
            .long("tag")
            .action(ArgAction::Append)
            .help("Tag; repeat for several"),
    ];

    Command::new("annotations")
        .about("Manage Grafana annotations")
        .subcommand_required(true)
        .arg(
            Arg::new("grafana-url")
                .long("grafana-url")
                .global(true)
                .env(GRAFANA_URL_ENV)
                .help("Grafana base URL"),
        )
        .arg(
            Arg::new("api-key")
                .long("api-key")
                .global(true)
                .env(GRAFANA_API_KEY_ENV)
                .hide_env_values(true)
                .help("Grafana API key"),
        )
        .subcommand(
            Command::new("query")
                .about("List annotations in a time range")
                .args(range_args.clone())
                .args(target_args.clone())
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(u32))
                        .help("Maximum number of annotations"),
                ),
        )
        .subcommand(
            Command::new("create")
                .about("Create an annotation and print its id")
                .args(range_args)
                .args(target_args)
                .arg(
                    Arg::new("text")
                        .long("text")
                        .required(true)
                        .help("Annotation text"),
                )
                .arg(
                    Arg::new("overwrite")
                        .long("overwrite")
                        .action(ArgAction::SetTrue)
                        .help("Remove matching annotations first"),
                ),
        )
        .subcommand(
            Command::new("remove")
                .about("Delete an annotation by id")
                .arg(
                    Arg::new("id")
                        .required(true)
                        .value_parser(value_parser!(i64))
                        .help("Annotation id"),
                ),
        )
}
