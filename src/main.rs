/*!
# buddy-diary

Command-line front end for the diary core. Each invocation reads the clock
once, opens the configured store, runs one command and exits.

## Usage

```
buddy-diary [-v] <COMMAND>

Commands:
  list [--sorted]              Entries in stored order, or newest first
  show <ID>                    A single entry
  new --title T --content C    A new entry (--tag, --emotion, --image, --date)
  edit <ID>                    Change an entry (--title, --content, --tag, --emotion)
  delete <ID>                  Delete an entry
  search [TEXT] [--tag X]      Find entries
  day <YYYY-MM-DD>             Entries of one day
  tags                         Every tag in use
  calendar [--month YYYY-MM]   A month with days that have entries marked
  report                       Writing statistics
  chat <MESSAGE>...            Turn messages into a conversation entry
  settings                     Show or change settings
  login <NAME>                 Sign in under a display name
  reset                        Erase all data
```

## Configuration

- `BUDDY_DIARY_DIR`: data directory (defaults to "~/.local/share/buddy-diary")
- `BUDDY_DIARY_BACKEND`: `sqlite` (default) or `files`
- `BUDDY_DIARY_LOG_FORMAT`: `text` (default) or `json`
- `RUST_LOG`: log filter, overriding the default level
*/

use buddy_diary::cli::{commands, CliArgs};
use buddy_diary::config::Config;
use buddy_diary::diary::IdGenerator;
use buddy_diary::errors::AppResult;
use buddy_diary::logging;
use buddy_diary::store::RecordStore;
use chrono::Local;
use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing::{debug, error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Text logging when the configuration itself is broken
    let config = Config::load();
    let log_format = config
        .as_ref()
        .map(|c| c.log_format)
        .unwrap_or_default();
    logging::init(log_format, args.verbose);

    let span = logging::root_span(args.command.name());
    let _enter = span.enter();

    match config.and_then(|config| run(&args, &config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs, config: &Config) -> AppResult<()> {
    // Obtain current date/time once at the beginning
    let now = Local::now();

    info!("Starting buddy-diary");
    debug!("Configuration: {:?}", config);
    config.validate()?;

    let store = RecordStore::open(config)?;
    let ids = IdGenerator::new();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    commands::run(&args.command, &store, &ids, now, &mut out)?;

    debug!("Command finished");
    Ok(())
}
