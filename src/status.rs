//! Console output: `*` info lines on stdout, `!` warnings and errors on stderr.

#[cfg(test)]
use std::cell::RefCell;
use std::fmt::Display;
use std::io::{self, Write};

const RED: &str = "\x1b[31;1m";
const YELLOW: &str = "\x1b[33;1m";
const RESET: &str = "\x1b[m";
const CLEAR_LINE: &str = "\x1b[2K";

pub fn info<D: Display>(msg: D) {
    println!("* {msg}");
}

/// Overwrites the current line with the download progress.
pub fn progress(current: usize, total: usize) {
    print!("{CLEAR_LINE}* Downloading chapter {current}/{total}...\r");
    io::stdout().flush().ok();
}

/// Clears a pending progress line before anything else is printed.
pub fn clear_line() {
    clear(&mut io::stdout()).ok();
}

/// Stdout is buffered while stderr is not, so the clear sequence has to be
/// flushed before a warning or error goes out.
fn clear<W: Write>(out: &mut W) -> io::Result<()> {
    out.write_all(CLEAR_LINE.as_bytes())?;
    out.flush()
}

#[cfg(test)]
thread_local! {
    static WARNINGS: RefCell<Vec<String>> = RefCell::new(Vec::new());
}

/// Warnings issued on the current thread since the last call.
#[cfg(test)]
pub fn take_warnings() -> Vec<String> {
    WARNINGS.with(|warnings| warnings.take())
}

pub fn warn<D: Display>(msg: D) {
    let msg = msg.to_string();
    #[cfg(test)]
    WARNINGS.with(|warnings| warnings.borrow_mut().push(msg.clone()));
    clear_line();
    eprintln!("{YELLOW}! {msg}{RESET}");
}

pub fn error<D: Display>(msg: D) {
    clear_line();
    eprintln!("{RED}! Error: {msg}{RESET}");
}

/// Records writes and how much of them had been flushed.
#[cfg(test)]
#[derive(Default)]
struct Terminal {
    written: Vec<u8>,
    flushed: usize,
}

#[cfg(test)]
impl Write for Terminal {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushed = self.written.len();
        Ok(())
    }
}

#[test]
fn test_clear_is_flushed() {
    let mut terminal = Terminal::default();
    clear(&mut terminal).unwrap();
    assert_eq!(CLEAR_LINE.as_bytes(), &terminal.written[..]);
    assert_eq!(terminal.written.len(), terminal.flushed);
}

#[test]
fn test_warnings_are_recorded_per_thread() {
    take_warnings();
    warn("Unknown element: b");
    warn(format!("Unknown node type: {}", "comment"));
    assert_eq!(vec!["Unknown element: b", "Unknown node type: comment"], take_warnings());
    assert!(take_warnings().is_empty());
}
