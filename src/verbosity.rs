use std::io::Write;

use clap::Parser;
use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter};

pub const LOGGING_LEVEL_ENV: &str = "LOGGING_LEVEL";

#[derive(Debug, Clone, Parser)]
pub struct VerbosityArgs {
    #[clap(
        long,
        env = LOGGING_LEVEL_ENV,
        default_value = "INFO",
        help = "Log level (DEBUG, INFO, WARNING, ERROR, CRITICAL)"
    )]
    logging_level: String,
    #[clap(long, help = "Log raw request/response traffic of the HTTP client")]
    log_traffic: bool,
    #[clap(long, help = "Use if a logger is already initialized")]
    persist_logger: bool,
}

impl VerbosityArgs {
    pub fn setup_logging(&self) {
        if !self.persist_logger {
            let level = match parse_level_filter(&self.logging_level) {
                Some(level) => level,
                None => {
                    eprintln!(
                        "{}",
                        format!(
                            "WARNING: unknown {} \"{}\", falling back to INFO",
                            LOGGING_LEVEL_ENV, self.logging_level
                        )
                        .bright_magenta()
                    );
                    LevelFilter::Info
                }
            };

            let mut builder = Builder::new();
            builder.filter_level(level);
            if self.log_traffic {
                builder.filter_module("reqwest", LevelFilter::Trace);
                builder.filter_module("hyper", LevelFilter::Trace);
            }
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{} | {} | {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                    level_name(record.level()),
                    record.args()
                )
            });

            builder.init();
        }
    }
}

/// Accepts Python `logging` level names alongside the `log` crate ones.
pub fn parse_level_filter(name: &str) -> Option<LevelFilter> {
    match name.trim().to_ascii_uppercase().as_str() {
        "NOTSET" | "TRACE" => Some(LevelFilter::Trace),
        "DEBUG" => Some(LevelFilter::Debug),
        "INFO" => Some(LevelFilter::Info),
        "WARNING" | "WARN" => Some(LevelFilter::Warn),
        "ERROR" | "CRITICAL" | "FATAL" => Some(LevelFilter::Error),
        "OFF" => Some(LevelFilter::Off),
        _ => None,
    }
}

fn level_name(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}
