//! `scour`: interactive, line-mode front end.
//!
//! Type a search term and press Enter; matches print as they are found.
//! Lines starting with `:` are commands (`:help` lists them). The process
//! exits on `:quit` or end of input.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;

use clap::Parser;
use crossbeam_channel::{select, unbounded, Receiver};
use directories::UserDirs;
use log::debug;

use scour::actions::{copy_to_clipboard, open_default, reveal_in_folder};
use scour::{
    Column, Completion, FilterType, ResultRecord, SearchObserver, SearchSession, DEFAULT_MAX_RESULTS,
};

#[derive(Parser, Debug)]
#[command(name = "scour", version, about = "Search file and folder names, streaming results as they are found")]
struct Args {
    /// Folder to search in [default: your home folder]
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Stop after this many matches
    #[arg(short, long, default_value_t = DEFAULT_MAX_RESULTS)]
    max: usize,

    /// All, Documents, Images, Videos, Audio, Code, Archives or Folders
    #[arg(short, long, default_value = "all")]
    filter: FilterType,

    /// Compare names case-sensitively
    #[arg(long)]
    match_case: bool,

    /// Only look at the folder's direct children
    #[arg(long)]
    no_subfolders: bool,

    /// Start with this search right away
    query: Option<String>,
}

// ---------------------------------------------------------------------------
// Form: the current search settings
// ---------------------------------------------------------------------------

struct Form {
    root:       PathBuf,
    filter:     FilterType,
    match_case: bool,
    subfolders: bool,
    max:        usize,
}

impl Form {
    fn from_args(args: &Args) -> Self {
        Self {
            root:       args.root.clone().unwrap_or_else(home_dir),
            filter:     args.filter,
            match_case: args.match_case,
            subfolders: !args.no_subfolders,
            max:        args.max,
        }
    }

    fn describe(&self) -> String {
        format!(
            "in {} | filter: {} | match case: {} | subfolders: {} | max: {}",
            self.root.display(),
            self.filter,
            on_off(self.match_case),
            on_off(self.subfolders),
            self.max,
        )
    }
}

fn home_dir() -> PathBuf {
    UserDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Resolve the quick-location shortcuts; anything else is taken as a path.
fn location(arg: &str) -> PathBuf {
    let dirs = UserDirs::new();
    let home = home_dir();
    match arg {
        "home" | "~" => home,
        "desktop" => dirs
            .as_ref()
            .and_then(|d| d.desktop_dir().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| home.join("Desktop")),
        "downloads" => dirs
            .as_ref()
            .and_then(|d| d.download_dir().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| home.join("Downloads")),
        other => PathBuf::from(other),
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

fn parse_flag(arg: &str) -> Option<bool> {
    match arg {
        "on" | "yes" | "true" | "1" => Some(true),
        "off" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

struct Printer;

impl Printer {
    fn row(index: usize, record: &ResultRecord) {
        println!(
            "{:>5}  {:<40}  {:>10}  {:<16}  {}",
            index,
            record.name,
            record.size_display,
            record.modified_display,
            record.parent_display(),
        );
    }
}

impl SearchObserver for Printer {
    fn on_batch(&mut self, batch: &[ResultRecord], total: usize) {
        let first = total - batch.len() + 1;
        for (offset, record) in batch.iter().enumerate() {
            Printer::row(first + offset, record);
        }
        println!("       Found {total} results...");
    }

    fn on_done(&mut self, completion: &Completion) {
        println!(
            "Search complete. {} ({:.2}s)",
            completion.summary(),
            completion.elapsed.as_secs_f64()
        );
    }

    fn on_error(&mut self, message: &str) {
        println!("Search error: {message}");
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

const HELP: &str = "\
<text>                 search for names containing <text>
:cancel                stop the running search
:clear                 drop the current results
:list                  print the results in display order
:sort name|path|size|modified
:open N / :reveal N    open row N, or show it in its folder
:copy N / :copyname N  copy row N's full path, or its name
:root PATH             search in PATH (also: home, desktop, downloads)
:filter TYPE           all, documents, images, videos, audio, code, archives, folders
:case on|off           match case
:sub on|off            include subfolders
:max N                 result cap
:status                show the current settings and status
:quit";

enum Flow {
    Continue,
    Quit,
}

fn handle_line(line: &str, form: &mut Form, session: &mut SearchSession) -> Flow {
    let line = line.trim();
    let Some(command) = line.strip_prefix(':') else {
        start_search(line, form, session);
        return Flow::Continue;
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "q" | "quit" | "exit" => return Flow::Quit,
        "help" | "h" => println!("{HELP}"),
        "cancel" => {
            if session.cancel() {
                println!("{}", session.status());
            }
        }
        "clear" => {
            session.clear();
            println!("{}", session.status());
        }
        "list" => {
            for (i, record) in session.results().rows().enumerate() {
                Printer::row(i + 1, record);
            }
        }
        "sort" => match arg.parse::<Column>() {
            Ok(column) => {
                session.sort_by(column);
                println!("Sorted by {column}");
                for (i, record) in session.results().rows().enumerate() {
                    Printer::row(i + 1, record);
                }
            }
            Err(e) => println!("{e}"),
        },
        "open" | "reveal" | "copy" | "copyname" => row_action(name, arg, session),
        "root" if !arg.is_empty() => {
            form.root = location(arg);
            println!("{}", form.describe());
        }
        "filter" => match arg.parse::<FilterType>() {
            Ok(filter) => {
                form.filter = filter;
                println!("{}", form.describe());
            }
            Err(e) => println!("{e}"),
        },
        "case" | "sub" => match parse_flag(arg) {
            Some(flag) => {
                if name == "case" {
                    form.match_case = flag;
                } else {
                    form.subfolders = flag;
                }
                println!("{}", form.describe());
            }
            None => println!("expected on or off"),
        },
        "max" => match arg.parse::<usize>() {
            Ok(n) if n > 0 => {
                form.max = n;
                println!("{}", form.describe());
            }
            _ => println!("expected a positive number"),
        },
        "status" => {
            println!("{}", form.describe());
            println!("{}", session.status());
        }
        _ => println!("unknown command; :help lists them"),
    }
    Flow::Continue
}

fn start_search(query: &str, form: &Form, session: &mut SearchSession) {
    let search = scour::search()
        .query(query)
        .root(&form.root)
        .filter(form.filter)
        .match_case(form.match_case)
        .include_subfolders(form.subfolders)
        .max_results(form.max)
        .build();

    match search.and_then(|search| session.start(search)) {
        Ok(generation) => {
            debug!("started search {generation}");
            println!("Searching... ({})", form.describe());
        }
        Err(e) => println!("error: {e}"),
    }
}

fn row_action(action: &str, arg: &str, session: &mut SearchSession) {
    let record = arg
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|row| session.results().row(row))
        .cloned();
    let Some(record) = record else {
        println!("no such row: {arg}");
        return;
    };

    let outcome = match action {
        "open" => open_default(&record.full_path),
        "reveal" => reveal_in_folder(&record.full_path),
        "copy" | "copyname" => {
            let text = if action == "copy" {
                record.full_path.display().to_string()
            } else {
                record.name.clone()
            };
            if copy_to_clipboard(&text) {
                session.set_status("Copied to clipboard");
                println!("{}", session.status());
            }
            Ok(())
        }
        _ => Ok(()),
    };

    if let Err(e) = outcome {
        println!("error: {e}");
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

/// Feed stdin lines into a channel so the main loop can select on them.
fn spawn_input() -> Receiver<String> {
    let (tx, rx) = unbounded();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let mut form = Form::from_args(&args);
    let mut session = SearchSession::new();
    let mut printer = Printer;

    println!("scour: {}", form.describe());
    println!("Type a search term, or :help.");

    if let Some(query) = args.query.as_deref() {
        start_search(query, &form, &mut session);
    } else {
        prompt();
    }

    let input = spawn_input();
    let ticks = scour::ticker();

    loop {
        select! {
            recv(input) -> line => {
                let Ok(line) = line else { break };
                if let Flow::Quit = handle_line(&line, &mut form, &mut session) {
                    break;
                }
                if !session.is_busy() {
                    prompt();
                }
            }
            recv(ticks) -> _ => {
                let was_busy = session.is_busy();
                session.drain(&mut printer);
                if was_busy && !session.is_busy() {
                    prompt();
                }
            }
        }
    }

    session.cancel();
}
