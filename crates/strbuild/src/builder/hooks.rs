//! Pre- and post-build hooks.

use std::sync::Arc;

use crate::builder::resolver::Converter;
use crate::builder::string_builder::StringBuilder;
use crate::types::Values;

/// A transform over the whole message, run before scanning (pre) or after
/// the last substitution (post).
///
/// Receives the message, the values passed to the build call, the converter
/// in effect, and the builder running the build.
pub type Hook =
    Arc<dyn Fn(String, &Values, Option<&dyn Converter>, &StringBuilder) -> String + Send + Sync>;

/// Wraps a closure as a [`Hook`].
///
/// # Example
///
/// ```
/// use strbuild::{StringBuilder, hook, values};
///
/// let mut builder = StringBuilder::new();
/// builder.settings_mut().add_post_hook(hook(|message, _, _, _| message.trim().to_string()));
/// assert_eq!(builder.build("  {:a}  ", &values! { "a" => "x" }, None), "x");
/// ```
pub fn hook(
    f: impl Fn(String, &Values, Option<&dyn Converter>, &StringBuilder) -> String
    + Send
    + Sync
    + 'static,
) -> Hook {
    Arc::new(f)
}

/// Post hook that makes a composed command line safe to pass to a shell.
///
/// Shell metacharacters are prefixed with a backslash. Quotes are left alone
/// when they have a matching partner later in the message and escaped
/// otherwise.
pub fn shell_command_hook() -> Hook {
    hook(|message, _, _, _| escape_shell_command(&message))
}

/// Escapes shell metacharacters in a command line.
///
/// ```
/// use strbuild::escape_shell_command;
///
/// assert_eq!(escape_shell_command("ls 'my dir' && rm *"), r"ls 'my dir' \&\& rm \*");
/// assert_eq!(escape_shell_command(r#"echo "unclosed"#), r#"echo \"unclosed"#);
/// ```
pub fn escape_shell_command(command: &str) -> String {
    let mut out = String::with_capacity(command.len());
    let mut open_quote: Option<char> = None;
    for (index, c) in command.char_indices() {
        match c {
            '"' | '\'' => {
                let rest = &command[index + c.len_utf8()..];
                if open_quote.is_none() && rest.contains(c) {
                    open_quote = Some(c);
                } else if open_quote == Some(c) {
                    open_quote = None;
                } else {
                    out.push('\\');
                }
            }
            '#' | '&' | ';' | '`' | '|' | '*' | '?' | '~' | '<' | '>' | '^' | '(' | ')' | '['
            | ']' | '{' | '}' | '$' | '\\' | '\n' => out.push('\\'),
            _ => {}
        }
        out.push(c);
    }
    out
}
