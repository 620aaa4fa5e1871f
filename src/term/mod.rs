/*!
# Terminal host

Runs a program file or an interactive prompt. Program output goes through
the same `linefeed` interface as the prompt so the two never interleave
badly. In BASIC mode numbered lines build a listing that `RUN` executes.

*/

use crate::lang::{Error, Language};
use crate::mach::{Console, Headless, Host, Runtime, Val};
use crate::error;
use ansi_term::Style;
use clap::Parser;
use linefeed::{Completer, Completion, DefaultTerminal, Interface, Prompter, ReadResult, Terminal};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, Error>;

/// Multi-language educational interpreter.
#[derive(Parser, Debug)]
#[command(name = "timewarp", version, about)]
struct Args {
    /// Program to run. Starts the interactive prompt when omitted.
    file: Option<PathBuf>,

    /// Language tag or extension; detected from the file when omitted.
    #[arg(short, long)]
    lang: Option<String>,

    /// Show interpreter diagnostics.
    #[arg(short, long)]
    debug: bool,

    /// Abort a program after this many lines.
    #[arg(long, default_value_t = 100_000)]
    max_steps: usize,

    /// Evaluate one expression, print the result and exit.
    #[arg(short, long)]
    eval: Option<String>,
}

pub fn main() {
    let args = Args::parse();
    init_tracing(args.debug);
    let code = match dispatch(args) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(error) => {
            eprintln!("{}", Style::new().bold().paint(error.to_string()));
            1
        }
    };
    std::process::exit(code);
}

fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_env("TIMEWARP_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "warn" }));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn dispatch(args: Args) -> Result<bool> {
    if let Some(expr) = &args.eval {
        let mut runtime = configured(&args, Box::new(Console));
        let value = runtime.evaluate_expression(expr)?;
        println!("{}", value);
        return Ok(true);
    }
    match &args.file {
        Some(path) => run_file(&args, path),
        None => {
            repl(&args).map_err(|e| error!(DiskIoError; &e.to_string()))?;
            Ok(true)
        }
    }
}

fn configured(args: &Args, host: Box<dyn Host>) -> Runtime {
    let mut runtime = Runtime::new(host, Box::new(Headless));
    runtime.config_mut().debug = args.debug;
    runtime.config_mut().max_steps = args.max_steps;
    let stop = runtime.stop_handle();
    let installed = ctrlc::set_handler(move || {
        stop.store(true, std::sync::atomic::Ordering::SeqCst);
    });
    if let Err(e) = installed {
        tracing::warn!("Ctrl-C handler not installed: {}", e);
    }
    runtime
}

fn parse_tag(tag: &str) -> Result<Language> {
    tag.parse()
        .map_err(|_| error!(NotSupported; &format!("UNKNOWN LANGUAGE {}", tag)))
}

fn read_source(path: &PathBuf) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        let msg = format!("{}: {}", path.display(), e);
        match e.kind() {
            ErrorKind::NotFound => error!(FileNotFound; &msg),
            _ => error!(DiskIoError; &msg),
        }
    })
}

fn run_file(args: &Args, path: &PathBuf) -> Result<bool> {
    let source = read_source(path)?;
    let language = match &args.lang {
        Some(tag) => parse_tag(tag)?,
        None => match Language::from_path(path).or_else(|| Language::detect(&source)) {
            Some(language) => language,
            None => return Err(error!(NotSupported; "CANNOT DETECT LANGUAGE; USE --lang")),
        },
    };
    let mut runtime = configured(args, Box::new(Console));
    Ok(runtime.run(&source, language))
}

/// Program output and input through the prompt's terminal.
struct Screen {
    output: Arc<Interface<DefaultTerminal>>,
    input: Interface<DefaultTerminal>,
}

impl Host for Screen {
    fn log_output(&mut self, text: &str) {
        let _ = self.output.write_fmt(format_args!("{}\n", text));
    }

    fn debug_output(&mut self, text: &str) {
        let _ = self
            .output
            .write_fmt(format_args!("{}\n", Style::new().dimmed().paint(text)));
    }

    fn get_user_input(&mut self, prompt: &str) -> String {
        if self.input.set_prompt(prompt).is_err() {
            return String::new();
        }
        match self.input.read_line() {
            Ok(ReadResult::Input(line)) => line,
            _ => String::new(),
        }
    }
}

type Listing = Arc<Mutex<BTreeMap<u32, String>>>;

fn repl(args: &Args) -> std::io::Result<()> {
    let interface = Arc::new(Interface::new("timewarp")?);
    let screen = Screen {
        output: interface.clone(),
        input: Interface::new("input")?,
    };
    let mut runtime = configured(args, Box::new(screen));
    if let Some(tag) = &args.lang {
        match parse_tag(tag) {
            Ok(language) if !language.is_external() => runtime.set_language(language),
            _ => print_error(&interface, &error!(NotSupported; tag.as_str()))?,
        }
    }
    let listing: Listing = Arc::default();
    interface.set_completer(Arc::new(LineCompleter {
        listing: listing.clone(),
    }));
    loop {
        interface.set_prompt(&format!("{}> ", runtime.language().name()))?;
        let line = match interface.read_line()? {
            ReadResult::Input(line) => line,
            ReadResult::Signal(_) | ReadResult::Eof => break,
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        interface.add_history_unique(line.clone());
        if let Some(command) = text.strip_prefix(':') {
            if !meta(&interface, &mut runtime, command)? {
                break;
            }
            continue;
        }
        if runtime.language() == Language::Basic {
            match basic_command(&mut runtime, &listing, text) {
                Ok(true) => continue,
                Ok(false) => {}
                Err(error) => {
                    print_error(&interface, &error)?;
                    continue;
                }
            }
        }
        runtime.execute_line(text);
    }
    Ok(())
}

fn print_error(interface: &Interface<DefaultTerminal>, error: &Error) -> std::io::Result<()> {
    interface.write_fmt(format_args!(
        "{}\n",
        Style::new().bold().paint(error.to_string())
    ))
}

/// `:lang`, `:debug`, `:vars` and `:quit`. False to leave the prompt.
fn meta(
    interface: &Interface<DefaultTerminal>,
    runtime: &mut Runtime,
    command: &str,
) -> std::io::Result<bool> {
    let (word, rest) = match command.trim().split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (command.trim(), ""),
    };
    match word.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => return Ok(false),
        "lang" if rest.is_empty() => {
            interface.write_fmt(format_args!("{}\n", runtime.language().name()))?
        }
        "lang" => match parse_tag(rest) {
            Ok(language) if language.is_external() => print_error(
                interface,
                &error!(NotSupported; &format!("{} NEEDS AN EXTERNAL RUNTIME", language.name())),
            )?,
            Ok(language) => runtime.set_language(language),
            Err(error) => print_error(interface, &error)?,
        },
        "debug" => {
            let debug = !runtime.config().debug;
            runtime.config_mut().debug = debug;
            let state = if debug { "on" } else { "off" };
            interface.write_fmt(format_args!("Debug {}\n", state))?;
        }
        "vars" => {
            let vars = runtime.variables();
            for name in vars.names() {
                let value = match vars.fetch(name) {
                    Some(Val::Str(s)) => format!("{:?}", s),
                    Some(other) => other.to_string(),
                    None => continue,
                };
                interface.write_fmt(format_args!("{} = {}\n", name, value))?;
            }
        }
        _ => print_error(
            interface,
            &error!(SyntaxError; &format!("UNKNOWN COMMAND :{}", word)),
        )?,
    }
    Ok(true)
}

/// Listing edits and `RUN`, `LIST`, `NEW`, `LOAD`, `SAVE`. False when the
/// line is an ordinary immediate statement.
fn basic_command(runtime: &mut Runtime, listing: &Listing, text: &str) -> Result<bool> {
    let digits = text.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let number = text[..digits]
            .parse::<u32>()
            .map_err(|_| error!(SyntaxError; "LINE NUMBER TOO LARGE"))?;
        let body = text[digits..].trim();
        let mut listing = lock(listing)?;
        if body.is_empty() {
            listing.remove(&number);
        } else {
            listing.insert(number, body.to_string());
        }
        return Ok(true);
    }
    let (word, rest) = match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim().trim_matches('"')),
        None => (text, ""),
    };
    match word.to_ascii_uppercase().as_str() {
        "RUN" => {
            let source = render(&*lock(listing)?);
            runtime.run(&source, Language::Basic);
        }
        "LIST" => {
            let source = render(&*lock(listing)?);
            for line in source.lines() {
                runtime.context_mut().log(line);
            }
        }
        "NEW" => {
            lock(listing)?.clear();
            runtime.clear();
        }
        "LOAD" => *lock(listing)? = load(rest)?,
        "SAVE" => save(&*lock(listing)?, rest)?,
        _ => return Ok(false),
    }
    Ok(true)
}

fn lock(listing: &Listing) -> Result<std::sync::MutexGuard<'_, BTreeMap<u32, String>>> {
    listing
        .lock()
        .map_err(|_| error!(InternalError; "LISTING UNAVAILABLE"))
}

fn render(listing: &BTreeMap<u32, String>) -> String {
    listing
        .iter()
        .map(|(number, text)| format!("{} {}", number, text))
        .collect::<Vec<_>>()
        .join("\n")
}

fn load(filename: &str) -> Result<BTreeMap<u32, String>> {
    let reader = match File::open(filename) {
        Ok(file) => BufReader::new(file),
        Err(error) => {
            let msg = error.to_string();
            match error.kind() {
                ErrorKind::NotFound => return Err(error!(FileNotFound; msg.as_str())),
                _ => return Err(error!(DiskIoError; msg.as_str())),
            }
        }
    };
    let mut listing = BTreeMap::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| error!(DiskIoError; e.to_string().as_str()))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
        match line[..digits].parse::<u32>() {
            Ok(number) => {
                listing.insert(number, line[digits..].trim().to_string());
            }
            Err(_) => {
                return Err(error!(SyntaxError; &format!(
                    "In line {} of the file. (Not BASIC line number)",
                    index + 1
                )))
            }
        }
    }
    Ok(listing)
}

fn save(listing: &BTreeMap<u32, String>, filename: &str) -> Result<()> {
    if listing.is_empty() {
        return Err(error!(InternalError; "NOTHING TO SAVE"));
    }
    let mut file = match File::create(filename) {
        Ok(file) => file,
        Err(error) => return Err(error!(DiskIoError; error.to_string().as_str())),
    };
    for (number, text) in listing {
        if let Err(error) = writeln!(file, "{} {}", number, text) {
            return Err(error!(DiskIoError; error.to_string().as_str()));
        }
    }
    Ok(())
}

/// Tab after a line number recalls that line for editing.
struct LineCompleter {
    listing: Listing,
}

impl<Term: Terminal> Completer<Term> for LineCompleter {
    fn complete(
        &self,
        _word: &str,
        prompter: &Prompter<Term>,
        _start: usize,
        _end: usize,
    ) -> Option<Vec<Completion>> {
        let number = prompter.buffer().trim().parse::<u32>().ok()?;
        let listing = self.listing.lock().ok()?;
        let text = listing.get(&number)?;
        let mut completion = Completion::simple(format!("{} {}", number, text));
        completion.suffix = linefeed::complete::Suffix::None;
        Some(vec![completion])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mach::{Capture, Recorder};

    fn runtime() -> (Runtime, Capture) {
        let host = Capture::new();
        let runtime = Runtime::new(Box::new(host.clone()), Box::new(Recorder::new()));
        (runtime, host)
    }

    #[test]
    fn test_listing_commands() {
        let (mut runtime, host) = runtime();
        let listing: Listing = Arc::new(Mutex::new(BTreeMap::new()));
        assert_eq!(basic_command(&mut runtime, &listing, "20 PRINT \"B\""), Ok(true));
        assert_eq!(basic_command(&mut runtime, &listing, "10 PRINT \"A\""), Ok(true));
        assert_eq!(basic_command(&mut runtime, &listing, "LIST"), Ok(true));
        assert_eq!(basic_command(&mut runtime, &listing, "RUN"), Ok(true));
        assert_eq!(
            host.output(),
            vec!["10 PRINT \"A\"", "20 PRINT \"B\"", "A", "B"]
        );
        assert_eq!(basic_command(&mut runtime, &listing, "PRINT 1"), Ok(false));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("timewarp-listing-{}.bas", std::process::id()));
        let path = path.to_string_lossy().to_string();
        let (mut runtime, _host) = runtime();
        let listing: Listing = Arc::new(Mutex::new(BTreeMap::new()));
        assert!(basic_command(&mut runtime, &listing, &format!("SAVE \"{}\"", path)).is_err());
        basic_command(&mut runtime, &listing, "10 X = 1").unwrap();
        assert_eq!(basic_command(&mut runtime, &listing, &format!("SAVE \"{}\"", path)), Ok(true));
        assert_eq!(basic_command(&mut runtime, &listing, "NEW"), Ok(true));
        assert!(lock(&listing).unwrap().is_empty());
        assert_eq!(basic_command(&mut runtime, &listing, &format!("LOAD \"{}\"", path)), Ok(true));
        assert_eq!(render(&*lock(&listing).unwrap()), "10 X = 1");
        let _ = std::fs::remove_file(&path);
    }
}
