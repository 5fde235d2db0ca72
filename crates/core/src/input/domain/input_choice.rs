use std::io::Write;

use super::line_source::LineSource;
use crate::shared::error::AnnotateError;

pub const MENU_PROMPT: &str = "Do you want to recognize text for a video on Cloud Storage or from a local file?\n1. Cloud Storage\n2. Local File\n";
pub const INVALID_CHOICE_MESSAGE: &str = "Invalid input. Please enter 1 or 2 based on your choice.";
pub const LOCATION_PROMPT: &str = "Please enter the path to the video file to analyze: ";

/// Where the video to analyze lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputChoice {
    CloudStorage,
    LocalFile,
}

impl InputChoice {
    /// Maps a menu number to a choice. Only `1` and `2` are valid.
    pub fn from_menu_number(n: i64) -> Option<Self> {
        match n {
            1 => Some(InputChoice::CloudStorage),
            2 => Some(InputChoice::LocalFile),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputSelection {
    pub choice: InputChoice,
    /// Cloud Storage URI or local path, exactly as typed.
    pub location: String,
}

/// Interactive menu: asks for the source kind, then for the path or URI.
pub struct InputSelector<'a> {
    source: &'a mut dyn LineSource,
    output: &'a mut dyn Write,
}

impl<'a> InputSelector<'a> {
    pub fn new(source: &'a mut dyn LineSource, output: &'a mut dyn Write) -> Self {
        Self { source, output }
    }

    pub fn select(&mut self) -> Result<InputSelection, AnnotateError> {
        let choice = self.read_choice()?;
        writeln!(self.output, "{LOCATION_PROMPT}").map_err(AnnotateError::Output)?;
        let location = self.next_line()?;
        log::debug!("Selected {choice:?} with location '{location}'");
        Ok(InputSelection { choice, location })
    }

    /// Re-prompts until the user enters `1` or `2`.
    fn read_choice(&mut self) -> Result<InputChoice, AnnotateError> {
        loop {
            write!(self.output, "{MENU_PROMPT}").map_err(AnnotateError::Output)?;
            self.output.flush().map_err(AnnotateError::Output)?;

            let line = self.next_line()?;
            let choice = line
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(InputChoice::from_menu_number);
            match choice {
                Some(choice) => return Ok(choice),
                None => {
                    log::debug!("Rejected menu input '{line}'");
                    writeln!(self.output, "{INVALID_CHOICE_MESSAGE}")
                        .map_err(AnnotateError::Output)?;
                }
            }
        }
    }

    fn next_line(&mut self) -> Result<String, AnnotateError> {
        self.source
            .read_line()
            .map_err(AnnotateError::Input)?
            .ok_or(AnnotateError::InputClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    // ─── Stubs ───

    struct ScriptedLineSource {
        lines: VecDeque<String>,
    }

    impl ScriptedLineSource {
        fn new(lines: &[&str]) -> Self {
            Self {
                lines: lines.iter().map(|l| l.to_string()).collect(),
            }
        }
    }

    impl LineSource for ScriptedLineSource {
        fn read_line(&mut self) -> std::io::Result<Option<String>> {
            Ok(self.lines.pop_front())
        }
    }

    fn run(lines: &[&str]) -> (Result<InputSelection, AnnotateError>, String) {
        let mut source = ScriptedLineSource::new(lines);
        let mut output = Vec::new();
        let result = InputSelector::new(&mut source, &mut output).select();
        (result, String::from_utf8(output).unwrap())
    }

    // ─── Tests ───

    #[test]
    fn test_rejects_until_valid_choice() {
        let (result, output) = run(&["x", "3", "1", "gs://bucket/video.mp4"]);
        let selection = result.unwrap();
        assert_eq!(selection.choice, InputChoice::CloudStorage);
        assert_eq!(selection.location, "gs://bucket/video.mp4");
        assert_eq!(output.matches(INVALID_CHOICE_MESSAGE).count(), 2);
        assert_eq!(output.matches("1. Cloud Storage").count(), 3);
    }

    #[test]
    fn test_local_file_choice() {
        let (result, output) = run(&["2", "/videos/clip.mp4"]);
        let selection = result.unwrap();
        assert_eq!(selection.choice, InputChoice::LocalFile);
        assert_eq!(selection.location, "/videos/clip.mp4");
        assert!(!output.contains(INVALID_CHOICE_MESSAGE));
        assert!(output.ends_with(&format!("{LOCATION_PROMPT}\n")));
    }

    #[test]
    fn test_choice_tolerates_surrounding_whitespace() {
        let (result, _) = run(&[" 2 ", "a.mp4"]);
        assert_eq!(result.unwrap().choice, InputChoice::LocalFile);
    }

    #[test]
    fn test_location_is_kept_verbatim() {
        let (result, _) = run(&["1", "  gs://bucket/with space.mp4 "]);
        assert_eq!(result.unwrap().location, "  gs://bucket/with space.mp4 ");
    }

    #[test]
    fn test_empty_and_negative_inputs_are_invalid() {
        let (result, output) = run(&["", "-1", "0", "1.0", "2", "p"]);
        assert_eq!(result.unwrap().choice, InputChoice::LocalFile);
        assert_eq!(output.matches(INVALID_CHOICE_MESSAGE).count(), 4);
    }

    #[test]
    fn test_closed_input_during_menu() {
        let (result, output) = run(&["x"]);
        assert!(matches!(result, Err(AnnotateError::InputClosed)));
        assert_eq!(output.matches(INVALID_CHOICE_MESSAGE).count(), 1);
    }

    #[test]
    fn test_closed_input_before_location() {
        let (result, _) = run(&["1"]);
        assert!(matches!(result, Err(AnnotateError::InputClosed)));
    }

    #[test]
    fn test_from_menu_number() {
        assert_eq!(InputChoice::from_menu_number(1), Some(InputChoice::CloudStorage));
        assert_eq!(InputChoice::from_menu_number(2), Some(InputChoice::LocalFile));
        assert_eq!(InputChoice::from_menu_number(3), None);
    }
}
