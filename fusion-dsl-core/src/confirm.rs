use std::io::{self, BufRead};

use mockall::automock;

/// The literal answer that lets an eject run continue.
pub const CONFIRMATION_TOKEN: &str = "yes";

/// Source of the operator's answer to the eject prompt.
#[automock]
pub trait Confirmation {
    /// Reads one line of input. End of input yields an empty string.
    fn read_answer(&mut self) -> io::Result<String>;
}

pub fn is_confirmed(answer: &str) -> bool {
    answer.trim() == CONFIRMATION_TOKEN
}

/// Reads the answer from any line-oriented reader, usually stdin.
pub struct ReaderConfirmation<R> {
    reader: R,
}

impl<R: BufRead> ReaderConfirmation<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl ReaderConfirmation<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> Confirmation for ReaderConfirmation<R> {
    fn read_answer(&mut self) -> io::Result<String> {
        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_is_confirmed() {
        assert!(is_confirmed("yes"));
        assert!(is_confirmed("  yes \n"));
        assert!(!is_confirmed("Yes"));
        assert!(!is_confirmed("y"));
        assert!(!is_confirmed("no"));
        assert!(!is_confirmed(""));
        assert!(!is_confirmed("yes please"));
    }

    #[test]
    fn test_reader_reads_single_line() {
        let mut confirmation = ReaderConfirmation::new(Cursor::new("yes\nno\n"));
        assert_eq!(confirmation.read_answer().unwrap(), "yes\n");
        assert_eq!(confirmation.read_answer().unwrap(), "no\n");
    }

    #[test]
    fn test_reader_at_end_of_input() {
        let mut confirmation = ReaderConfirmation::new(Cursor::new(""));
        let answer = confirmation.read_answer().unwrap();
        assert_eq!(answer, "");
        assert!(!is_confirmed(&answer));
    }
}
