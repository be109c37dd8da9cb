//! User command parsing

/// Simple prefix command parser.
///
/// This is useful when you want to extract a command and some arguments from a users message.
///
/// # Example
///
/// ```rust
/// use yabot::command::Command;
/// let command = Command::new(".ppm");
/// assert_eq!(command.parse(".ppm"), Some(""));
/// assert_eq!(command.parse(".ppm now"), Some("now"));
/// assert_eq!(command.parse(".ppmx"), None);
/// assert!(command.is_invoked_by(".ppm"));
/// assert!(!command.is_invoked_by(".ppm now"));
/// ```
#[derive(Debug, Clone)]
pub struct Command {
    /// The prefix to match against.
    prefix: String,
}

impl Command {
    /// Creates a new prefix command parser that expects the given prefix.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    /// Checks if the supplied input starts with the command prefix, and if so, returns a string
    /// slice that makes up the arguments, if any.
    #[must_use]
    pub fn parse<'a>(&self, input: &'a str) -> Option<&'a str> {
        let suffix = input.strip_prefix(&self.prefix)?;

        match suffix.chars().next() {
            // The proceeding character is a whitespace, so we return a slice skipping it
            Some(' ') => Some(&suffix[1..]),
            // There's a proceeding character and it's not whitespace, so it's most likely part
            // of a word and thus is longer than our command prefix.
            Some(_) => None,
            // The input is identical to the command prefix, so return an empty string.
            None => Some(""),
        }
    }

    /// Returns `true` if the input is the bare command, without arguments.
    ///
    /// Trailing whitespace is ignored.
    #[must_use]
    pub fn is_invoked_by(&self, input: &str) -> bool {
        self.parse(input.trim_end()) == Some("")
    }
}
