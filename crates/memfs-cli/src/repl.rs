//! Interactive shell: prompt loop over stdin.
//!
//! stdin は tokio で非同期に読み、MemFs の呼び出しは spawn_blocking に逃がす
//! （バッチはワーカーの完了を同期的に待つため、ランタイムをブロックしない）。

use std::io::Write;
use std::sync::Arc;

use memfs_core::app::status;
use memfs_core::{MemFs, MemfsError, Response};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::error::CliError;
use crate::parser::{self, Command, HELP};

const PROMPT: &str = "memfs> ";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[1;1H";

pub async fn run(fs: Arc<MemFs>) -> Result<(), CliError> {
    print!("{CLEAR_SCREEN}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt()?;
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                println!("\nuse exit command to exit or use Ctrl + d");
                continue;
            }
        };
        let Some(line) = line else {
            println!();
            break;
        };

        let command = match parser::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("Error: {e}");
                continue;
            }
        };

        match command {
            Command::Help => println!("{HELP}"),
            Command::Clear => print!("{CLEAR_SCREEN}"),
            Command::Exit => {
                println!("exiting memFS");
                break;
            }
            Command::Request(request) => {
                debug!(operation = ?request.operation, files = request.file_count, "executing");
                let fs = Arc::clone(&fs);
                let result = tokio::task::spawn_blocking(move || fs.execute(request)).await?;
                for out in render(result) {
                    println!("{out}");
                }
            }
        }
    }

    info!("shell closed; draining workers");
    tokio::task::spawn_blocking(move || fs.shutdown()).await?;
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    write!(out, "{PROMPT}")?;
    out.flush()
}

/// Lines to print for a finished request. Mutations already reported
/// through the status sink, so a batch renders nothing here.
fn render(result: Result<Response, MemfsError>) -> Vec<String> {
    match result {
        Ok(Response::Batch(_)) => Vec::new(),
        Ok(Response::Content(bytes)) => vec![String::from_utf8_lossy(&bytes).into_owned()],
        Ok(Response::Listing(listing)) => listing.render(),
        Err(err) => vec![status::failure(&err)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memfs_core::ports::MemorySink;
    use memfs_core::Request;

    fn session() -> MemFs {
        MemFs::builder()
            .workers(2)
            .sink(Arc::new(MemorySink::new()))
            .build()
            .unwrap()
    }

    #[test]
    fn read_renders_content() {
        let fs = session();
        fs.create("a.txt").unwrap();
        fs.write("a.txt", b"hi there").unwrap();
        assert_eq!(render(fs.execute(Request::read("a.txt"))), vec!["hi there"]);
    }

    #[test]
    fn errors_render_as_status_lines() {
        let fs = session();
        assert_eq!(
            render(fs.execute(Request::read("nope.txt"))),
            vec!["error: nope.txt does not exist"]
        );
    }

    #[test]
    fn batches_render_nothing_and_listing_renders_names() {
        let fs = session();
        let out = render(fs.execute(Request::create(vec!["b.txt".into(), "a.txt".into()])));
        assert!(out.is_empty());
        assert_eq!(render(fs.execute(Request::list(false))), vec!["a.txt", "b.txt"]);
    }
}
