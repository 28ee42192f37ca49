//! The `inkdown` command line: render Markdown to the terminal, to HTML,
//! back to canonical Markdown, or to style ranges.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};

#[cfg(feature = "image")]
use inkdown::plugins::image::ImageRsDecoder;
#[cfg(feature = "syntect")]
use inkdown::plugins::syntect::SyntectAdapter;
use inkdown::{console, format, html, range, Options, Plugins};

const OPTS_ENV: &str = "INKDOWN_OPTS";

#[derive(Parser)]
#[command(name = "inkdown", version, about = "A terminal-first Markdown renderer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render ANSI-styled output for the terminal.
    Console(RenderArgs),
    /// Render HTML.
    Html(HtmlArgs),
    /// Re-emit canonical Markdown.
    Format(FormatArgs),
    /// Print the style ranges console output would paint.
    Range(RenderArgs),
}

#[derive(Args)]
struct RenderArgs {
    /// The input file. Omit when reading from --stdin.
    file: Option<PathBuf>,

    /// Read the document from standard input.
    #[arg(long)]
    stdin: bool,

    /// Target width in columns. Defaults to the terminal width for
    /// console output, 80 otherwise.
    #[arg(long, short = 'w')]
    width: Option<usize>,

    /// Write output to PATH instead of standard output.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Report parse and render wall times on standard error.
    #[arg(long)]
    timeit: bool,

    /// Verbose logging.
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Args)]
struct HtmlArgs {
    #[command(flatten)]
    common: RenderArgs,

    /// Omit the <html><head> wrapper and embedded stylesheet.
    #[arg(long)]
    body_only: bool,
}

#[derive(Args)]
struct FormatArgs {
    #[command(flatten)]
    common: RenderArgs,

    /// Rewrite the input file in place.
    #[arg(long)]
    inplace: bool,
}

fn main() {
    let mut args: Vec<String> = std::env::args().collect();
    // Default arguments from the environment come right after the
    // program name, so explicit flags win.
    if let Ok(opts) = std::env::var(OPTS_ENV) {
        match shell_words::split(&opts) {
            Ok(extra) => {
                args.splice(1..1, extra);
            }
            Err(err) => {
                eprintln!("inkdown: bad {}: {}", OPTS_ENV, err);
                process::exit(1);
            }
        }
    }

    let cli = Cli::parse_from(args);
    if let Err(err) = run(cli) {
        eprintln!("inkdown: {}", err);
        process::exit(1);
    }
}

fn run(cli: Cli) -> io::Result<()> {
    let common = match &cli.command {
        Command::Console(args) | Command::Range(args) => args,
        Command::Html(args) => &args.common,
        Command::Format(args) => &args.common,
    };

    init_logging(common.verbose);

    let input = read_input(common)?;

    let mut options = Options::default();
    options.render.width = common.width.unwrap_or_else(|| default_width(&cli.command));
    if let Command::Html(ref args) = cli.command {
        options.render.body_only = args.body_only;
    }

    let parse_start = Instant::now();
    let doc = inkdown::parse_document(&input, &options);
    let parse_elapsed = parse_start.elapsed();

    let render_start = Instant::now();
    let mut out: Vec<u8> = Vec::new();
    match cli.command {
        Command::Console(_) => {
            options.render.terminal_size = terminal_size();
            let plugins = console_plugins();
            console::format_document_with_plugins(&doc, &options, &mut out, &plugins.plugins())?;
        }
        Command::Html(_) => {
            html::format_document(&doc, &options, &mut out)?;
        }
        Command::Format(ref args) => {
            format::format_document(&doc, &options, &mut out)?;
            if args.inplace {
                let path = args
                    .common
                    .file
                    .as_ref()
                    .ok_or_else(|| other_error("--inplace requires a file argument"))?;
                fs::write(path, &out)?;
                out.clear();
            }
        }
        Command::Range(_) => {
            for r in range::render_document(&doc, &options) {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}",
                    r.line,
                    r.start_col,
                    r.end_col,
                    style_summary(&r.style)
                )?;
            }
        }
    }
    let render_elapsed = render_start.elapsed();

    if common.timeit {
        eprintln!(
            "parse: {:.3}ms, render: {:.3}ms",
            parse_elapsed.as_secs_f64() * 1000.0,
            render_elapsed.as_secs_f64() * 1000.0
        );
    }

    match common.output {
        Some(ref path) => fs::write(path, &out)?,
        None => io::stdout().write_all(&out)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    let _ = builder.try_init();
}

fn read_input(args: &RenderArgs) -> io::Result<String> {
    match (&args.file, args.stdin) {
        (Some(_), true) => Err(other_error("pass a file or --stdin, not both")),
        (Some(path), false) => fs::read_to_string(path),
        (None, true) => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        (None, false) => Err(other_error("no input; pass a file or --stdin")),
    }
}

fn other_error(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Other, msg)
}

fn default_width(command: &Command) -> usize {
    match command {
        Command::Console(_) | Command::Range(_) => terminal_size().0 as usize,
        _ => 80,
    }
}

/// The terminal size in `(columns, rows)`, from the environment when the
/// terminal reports it, with an 80x24 fallback.
fn terminal_size() -> (u16, u16) {
    let var = |name: &str, fallback: u16| {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(fallback)
    };
    (var("COLUMNS", 80), var("LINES", 24))
}

/// Owner of the plugin instances the console renderer borrows.
struct ConsolePlugins {
    #[cfg(feature = "syntect")]
    highlighter: SyntectAdapter,
    #[cfg(feature = "image")]
    decoder: ImageRsDecoder,
}

fn console_plugins() -> ConsolePlugins {
    ConsolePlugins {
        #[cfg(feature = "syntect")]
        highlighter: SyntectAdapter::new("base16-ocean.dark"),
        #[cfg(feature = "image")]
        decoder: ImageRsDecoder::new(),
    }
}

impl ConsolePlugins {
    fn plugins(&self) -> Plugins<'_> {
        let mut plugins = Plugins::default();
        #[cfg(feature = "syntect")]
        {
            plugins.render.codefence_syntax_highlighter = Some(&self.highlighter);
        }
        #[cfg(feature = "image")]
        {
            plugins.render.image_decoder = Some(&self.decoder);
        }
        plugins
    }
}

fn style_summary(style: &inkdown::nodes::TextStyle) -> String {
    let mut flags = String::new();
    for (set, c) in [
        (style.bold, 'b'),
        (style.italic, 'i'),
        (style.underline, 'u'),
        (style.strike, 's'),
        (style.blink, 'k'),
        (style.reverse, 'r'),
        (style.hide, 'h'),
    ] {
        flags.push(if set { c } else { '-' });
    }
    format!("{}\t{:?}\t{:?}", flags, style.fg, style.bg)
}
