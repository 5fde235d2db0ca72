use std::io::BufRead;

use crate::input::domain::line_source::LineSource;

/// `LineSource` over any buffered reader, typically locked stdin.
pub struct BufReadLineSource<R: BufRead> {
    reader: R,
}

impl<R: BufRead> BufReadLineSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

pub type StdinLineSource = BufReadLineSource<std::io::StdinLock<'static>>;

impl StdinLineSource {
    pub fn stdin() -> Self {
        Self::new(std::io::stdin().lock())
    }
}

impl<R: BufRead> LineSource for BufReadLineSource<R> {
    fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_strips_line_terminators_only() {
        let mut source = BufReadLineSource::new(Cursor::new("1\r\n  gs://b/v.mp4 \nlast"));
        assert_eq!(source.read_line().unwrap().as_deref(), Some("1"));
        assert_eq!(source.read_line().unwrap().as_deref(), Some("  gs://b/v.mp4 "));
        assert_eq!(source.read_line().unwrap().as_deref(), Some("last"));
        assert_eq!(source.read_line().unwrap(), None);
    }

    #[test]
    fn test_empty_line_is_not_end_of_input() {
        let mut source = BufReadLineSource::new(Cursor::new("\n"));
        assert_eq!(source.read_line().unwrap().as_deref(), Some(""));
        assert_eq!(source.read_line().unwrap(), None);
    }
}
