use std::{error::Error, path::PathBuf, process};

use iced::Size;
use tracing_subscriber::filter::LevelFilter;

use velox::{config::Config, dir::VeloxDirectory};
use velox_gui::{
    gui::{Context, GUI},
    logger::{parse_log_level, setup_logger},
    VERSION,
};

#[derive(Debug, PartialEq)]
enum Arg {
    DatadirPath(VeloxDirectory),
}

fn parse_args(args: Vec<String>) -> Result<Vec<Arg>, Box<dyn Error>> {
    let mut res = Vec::new();

    if args.len() > 1 && (args[1] == "--version" || args[1] == "-v") {
        eprintln!("{}", VERSION);
        process::exit(1);
    }

    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        eprintln!(
            r#"
Usage: velox-gui [OPTIONS]

Options:
    --datadir <PATH>    Path of velox datadir
    -v, --version       Display velox-gui version
    -h, --help          Print help
        "#
        );
        process::exit(1);
    }

    for (i, arg) in args.iter().enumerate() {
        if arg == "--datadir" {
            if let Some(a) = args.get(i + 1) {
                res.push(Arg::DatadirPath(VeloxDirectory::new(PathBuf::from(a))));
            } else {
                return Err("missing arg to --datadir".into());
            }
        } else if arg.starts_with("--") {
            return Err(format!("unknown argument {}", arg).into());
        }
    }

    Ok(res)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = parse_args(std::env::args().collect())?;
    let datadir = match args.as_slice() {
        [] => VeloxDirectory::new_default()?,
        [Arg::DatadirPath(datadir)] => datadir.clone(),
        _ => {
            return Err("Unknown args combination".into());
        }
    };
    datadir.init()?;

    let log_level = parse_log_level()?.unwrap_or(LevelFilter::INFO);
    if let Err(e) = setup_logger(log_level, &datadir) {
        eprintln!("Error while setting up the logger: {}", e);
    }

    let config = Config::load(&datadir)?;
    let context = Context::new(&config, &datadir)?;

    if let Err(e) = iced::application(GUI::title, GUI::update, GUI::view)
        .theme(|_| iced::Theme::Dark)
        .window_size(Size::new(800.0, 650.0))
        .run_with(move || GUI::new(context.clone()))
    {
        tracing::error!("{}", e);
        Err(format!("Failed to launch UI: {}", e).into())
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(a: &[&str]) -> Vec<String> {
        a.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        assert!(parse_args(args(&["velox-gui"])).unwrap().is_empty());
        assert_eq!(
            parse_args(args(&["velox-gui", "--datadir", "/tmp/velox"])).unwrap(),
            vec![Arg::DatadirPath(VeloxDirectory::new(PathBuf::from(
                "/tmp/velox"
            )))]
        );
        assert!(parse_args(args(&["velox-gui", "--datadir"])).is_err());
        assert!(parse_args(args(&["velox-gui", "--signet"])).is_err());
    }
}
