use std::{
    fs,
    io::{IsTerminal, Read},
    path::{Path, PathBuf},
};

use clap::Parser;
use log::{debug, info};
use memchr::memmem;

use mathml_polyfill::{Document, Passes, Polyfill, PolyfillError};

mod config_file;
mod logger;

use config_file::{Config, ConfigError, load_config_file};

/// Rewrites deprecated MathML shorthand into MathML Core
#[derive(Parser, Debug)]
#[command(version, about = "Rewrites deprecated MathML shorthand into MathML Core", long_about = None)]
struct Args {
    /// The XHTML or MathML file to process; reads from stdin if absent or "-"
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Look recursively for .xhtml, .xml, .mml and .html files in the given directory
    #[arg(short, long, requires = "file")]
    recursive: bool,

    /// Dry run: rewrite but don't write anything
    #[arg(long)]
    dry_run: bool,

    /// If true, the program continues with the next file when a file cannot be parsed
    #[arg(long)]
    continue_on_error: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print more about what is done; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    logger::init(args.verbose);

    let config = match &args.config {
        Some(path) => load_config_file(path).unwrap_or_else(|e| exit_config_error(e, path)),
        None => Config::default(),
    };
    let mut runner = Runner {
        polyfill: Polyfill::new(config.polyfill),
        dry_run: args.dry_run,
        continue_on_error: args.continue_on_error,
        failures: 0,
    };

    match args.file {
        Some(ref path) if path != Path::new("-") => {
            if args.recursive {
                runner.process_recursive(path);
            } else {
                runner.process_file(path);
            }
        }
        _ => runner.process_stdin(),
    }

    if runner.failures > 0 {
        std::process::exit(2);
    }
}

struct Runner {
    polyfill: Polyfill,
    dry_run: bool,
    continue_on_error: bool,
    failures: usize,
}

impl Runner {
    fn process_stdin(&mut self) {
        let mut input = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut input) {
            exit_io_error(e);
        }
        match self.polyfill.normalize_str(&input) {
            Ok(output) => print!("{output}"),
            Err(e) => {
                print_error(&e, "<stdin>", &input);
                std::process::exit(2);
            }
        }
    }

    fn process_recursive(&mut self, path: &Path) {
        if path.is_dir() {
            let dir = fs::read_dir(path).unwrap_or_else(|e| exit_io_error(e));
            for entry in dir.filter_map(Result::ok) {
                self.process_recursive(&entry.path());
            }
        } else if path.is_file() && has_markup_extension(path) {
            self.process_file(path);
        }
    }

    /// Rewrite a single file in place. The file is only written if something changed.
    fn process_file(&mut self, path: &Path) {
        let original = fs::read_to_string(path).unwrap_or_else(|e| exit_io_error(e));
        if !may_contain_shorthand(&original, self.polyfill.passes()) {
            debug!("skipping '{}': nothing to rewrite", path.display());
            return;
        }
        let result = Document::parse(&original)
            .map_err(PolyfillError::from)
            .and_then(|mut doc| {
                let report = self.polyfill.run(&mut doc)?;
                Ok((doc, report))
            });
        let (doc, report) = match result {
            Ok(converted) => converted,
            Err(e) => {
                print_error(&e, &path.display().to_string(), &original);
                if !self.continue_on_error {
                    std::process::exit(2);
                }
                self.failures += 1;
                return;
            }
        };
        if !report.changed() {
            debug!("'{}' is unchanged", path.display());
            return;
        }
        if self.dry_run {
            info!("would rewrite '{}': {report:?}", path.display());
            return;
        }
        fs::write(path, doc.to_xml_string()).unwrap_or_else(|e| exit_io_error(e));
        info!("rewrote '{}': {report:?}", path.display());
    }
}

fn has_markup_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext, "xhtml" | "xml" | "mml" | "html"))
}

/// Cheap check for the element names that the enabled passes rewrite, so that files without
/// any of them are never parsed or re-serialized.
fn may_contain_shorthand(input: &str, passes: Passes) -> bool {
    let haystack = input.as_bytes();
    (passes.contains(Passes::FENCED) && memmem::find(haystack, b"mfenced").is_some())
        || (passes.contains(Passes::LABELED_ROWS)
            && memmem::find(haystack, b"mlabeledtr").is_some())
}

fn print_error(e: &PolyfillError, source_name: &str, source: &str) {
    match e {
        PolyfillError::Parse(err) => {
            let report = err.to_report(source_name, std::io::stderr().is_terminal());
            if report
                .eprint((source_name, ariadne::Source::from(source)))
                .is_err()
            {
                eprintln!("Parse error in '{source_name}': {err}");
            }
        }
        PolyfillError::Dom(err) => eprintln!("Error in '{source_name}': {err}"),
    }
}

fn exit_config_error(e: ConfigError, path: &Path) -> ! {
    eprintln!("Error loading config file '{}': {e}", path.display());
    std::process::exit(1);
}

fn exit_io_error(e: std::io::Error) -> ! {
    eprintln!("IO Error: {e}");
    std::process::exit(1);
}
