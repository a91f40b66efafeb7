//! Command-line front-end. A thin layer: parse, validate, hand back a
//! plain `Args` value. All exits on bad input go through clap's own
//! usage-to-stderr-then-exit-nonzero behavior, which is exactly the
//! configuration-error handling this tool needs, without extra
//! plumbing. `Config::validate` adds the handful of defensive checks
//! clap's flag-level parsing can't express on its own.

use std::path::PathBuf;

use clap::Parser;

use crate::error::ConfigError;
use crate::flow::SortBy;

const USAGE_MESSAGE: &str = "\
Usage: flowtop -i <interface> [-s <b|p>] [-l <logfile>]

Options:
  -h            Display this help message and exit
  -i <arg>      The network interface for flowtop to listen on
  -s <arg>      Sort the output by bytes or packets, <arg> is b or p accordingly
  -l, --log <path>   Turn on logging, writing each sample to <path>
";

#[derive(Parser, Debug)]
#[command(name = "flowtop")]
#[command(author, version)]
#[command(about = "Interactive per-connection network bandwidth monitor", long_about = None)]
#[command(override_help = USAGE_MESSAGE)]
pub struct Args {
    /// Network interface to capture on
    #[arg(short = 'i', long = "interface")]
    pub interface: String,

    /// Sort the top-N table by bytes ('b') or packets ('p')
    #[arg(short = 's', long = "sort", default_value = "b", value_parser = parse_sort_by)]
    pub sort_by: SortBy,

    /// Enable CSV logging to the given path
    #[arg(short = 'l', long = "log")]
    pub log_path: Option<PathBuf>,
}

fn parse_sort_by(raw: &str) -> Result<SortBy, String> {
    match raw {
        "b" => Ok(SortBy::Bytes),
        "p" => Ok(SortBy::Packets),
        other => Err(format!("unknown sort criterion '{other}', expected 'b' or 'p'")),
    }
}

impl Args {
    pub fn parse_from_env() -> Self {
        Self::parse()
    }
}

/// Validated configuration derived from `Args`. There is no config file
/// in this tool's surface (unlike the teacher crate, which loads one);
/// every field here comes straight from a CLI flag, already checked by
/// `Config::validate` before either thread starts.
#[derive(Debug, Clone)]
pub struct Config {
    pub interface: String,
    pub sort_by: SortBy,
    pub log_path: Option<PathBuf>,
}

impl Config {
    /// Validate `args` and turn it into a `Config`. Interface-existence
    /// and link-type checks happen later, when the capture source is
    /// actually opened (`PnetSource::open`) — those need the OS, not just
    /// the argument strings.
    pub fn validate(args: Args) -> Result<Self, ConfigError> {
        if args.interface.trim().is_empty() {
            return Err(ConfigError::EmptyInterface);
        }

        if let Some(path) = &args.log_path {
            match path.parent() {
                None => return Err(ConfigError::LogPathHasNoParent(path.display().to_string())),
                Some(parent) => {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        return Err(ConfigError::LogParentMissing(parent.display().to_string()));
                    }
                }
            }
        }

        Ok(Self {
            interface: args.interface,
            sort_by: args.sort_by,
            log_path: args.log_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(interface: &str, log_path: Option<PathBuf>) -> Args {
        Args {
            interface: interface.to_string(),
            sort_by: SortBy::Bytes,
            log_path,
        }
    }

    #[test]
    fn rejects_blank_interface() {
        let err = Config::validate(args("   ", None)).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyInterface));
    }

    #[test]
    fn accepts_plain_interface_with_no_log() {
        let cfg = Config::validate(args("eth0", None)).unwrap();
        assert_eq!(cfg.interface, "eth0");
        assert!(cfg.log_path.is_none());
    }

    #[test]
    fn rejects_log_path_whose_parent_is_missing() {
        let path = PathBuf::from("/definitely/not/a/real/directory/out.csv");
        let err = Config::validate(args("eth0", Some(path))).unwrap_err();
        assert!(matches!(err, ConfigError::LogParentMissing(_)));
    }

    #[test]
    fn missing_value_for_interface_flag_exits_nonzero() {
        let err = Args::try_parse_from(["flowtop", "-i"]).unwrap_err();
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn unknown_flag_exits_nonzero() {
        let err = Args::try_parse_from(["flowtop", "-i", "eth0", "--bogus"]).unwrap_err();
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn missing_required_interface_exits_nonzero() {
        let err = Args::try_parse_from(["flowtop"]).unwrap_err();
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn accepts_log_path_in_existing_directory() {
        let dir = std::env::temp_dir();
        let path = dir.join("flowtop-config-test.csv");
        let cfg = Config::validate(args("eth0", Some(path.clone()))).unwrap();
        assert_eq!(cfg.log_path, Some(path));
    }
}
