/**
 * TypeScript Transform - ts-transform
 *
 * Runs one build pass of the transform stage over files on disk
 */
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;
use typescript_transform::{HostError, Options, Plugin, TransformOutput, TypeScriptTransform};

fn main() {
    let matches = Command::new("ts-transform")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile TypeScript modules with the tsconfig.json that governs each of them")
        .arg(
            Arg::new("files")
                .value_name("FILE")
                .num_args(1..)
                .required(true)
                .help("Modules to transform"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("JSON file with plugin options"),
        )
        .arg(
            Arg::new("project")
                .short('p')
                .long("project")
                .value_name("PATH")
                .help("Use this tsconfig.json for every module"),
        )
        .arg(
            Arg::new("include")
                .long("include")
                .value_name("GLOB")
                .action(ArgAction::Append)
                .help("Only transform modules matching this pattern"),
        )
        .arg(
            Arg::new("exclude")
                .long("exclude")
                .value_name("GLOB")
                .action(ArgAction::Append)
                .help("Never transform modules matching this pattern"),
        )
        .arg(
            Arg::new("out-dir")
                .short('o')
                .long("out-dir")
                .value_name("DIR")
                .help("Write <name>.js (and .js.map) here instead of printing"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log configuration resolution and cache activity"),
        )
        .get_matches();

    init_logging(matches.get_flag("verbose"));

    let files: Vec<PathBuf> = matches
        .get_many::<String>("files")
        .into_iter()
        .flatten()
        .map(PathBuf::from)
        .collect();
    let out_dir = matches.get_one::<String>("out-dir").map(PathBuf::from);

    let options = match load_options(&matches) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    };

    let plugin = match TypeScriptTransform::new(options) {
        Ok(plugin) => plugin,
        Err(error) => {
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    };

    plugin.build_start();

    let outcomes: Vec<(PathBuf, Result<Option<TransformOutput>, HostError>)> = files
        .par_iter()
        .map(|file| (file.clone(), transform_file(&plugin, file)))
        .collect();

    let mut failed = false;
    for (file, outcome) in outcomes {
        match outcome {
            Ok(Some(output)) => {
                if let Err(error) = emit(&file, &output, out_dir.as_deref()) {
                    eprintln!("{}: {:#}", file.display(), error);
                    failed = true;
                }
            }
            Ok(None) => tracing::debug!(file = %file.display(), "skipped"),
            Err(error) => {
                eprintln!("{}: {}", error.id, error.message);
                failed = true;
            }
        }
    }

    if failed {
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "typescript_transform=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_options(matches: &clap::ArgMatches) -> Result<Options> {
    let mut options = match matches.get_one::<String>("config") {
        Some(path) => Options::load(Path::new(path))?,
        None => Options::default(),
    };

    if let Some(project) = matches.get_one::<String>("project") {
        options.tsconfig.location = Some(project.clone());
    }
    if let Some(include) = matches.get_many::<String>("include") {
        options.filter.files.include = include.cloned().collect();
    }
    if let Some(exclude) = matches.get_many::<String>("exclude") {
        options.filter.files.exclude = exclude.cloned().collect();
    }

    Ok(options)
}

fn transform_file(plugin: &TypeScriptTransform, file: &Path) -> Result<Option<TransformOutput>, HostError> {
    let absolute = fs::canonicalize(file).unwrap_or_else(|_| file.to_path_buf());
    let id = absolute.to_string_lossy().into_owned();
    let code = fs::read_to_string(&absolute).map_err(|error| HostError {
        message: format!("Cannot read file '{}': {}", id, error),
        stack: None,
        plugin: plugin.name(),
        id: id.clone(),
    })?;
    plugin.transform(&code, &id)
}

fn emit(file: &Path, output: &TransformOutput, out_dir: Option<&Path>) -> Result<()> {
    let Some(out_dir) = out_dir else {
        println!("// {}", file.display());
        println!("{}", output.code);
        return Ok(());
    };

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let stem = file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".to_string());

    let js_path = out_dir.join(format!("{}.js", stem));
    let mut code = output.code.clone();
    if let Some(map) = &output.map {
        let map_name = format!("{}.js.map", stem);
        fs::write(out_dir.join(&map_name), map)
            .with_context(|| format!("failed to write {}", map_name))?;
        code.push_str(&format!("\n//# sourceMappingURL={}\n", map_name));
    }
    fs::write(&js_path, code).with_context(|| format!("failed to write {}", js_path.display()))?;
    Ok(())
}
