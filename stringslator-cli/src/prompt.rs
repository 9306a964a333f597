use std::io::{self, BufRead, Write};

/// Asks a yes/no question until it gets an answer.
///
/// End of input counts as "no".
pub fn ask<R: BufRead, W: Write>(question: &str, mut input: R, mut output: W) -> io::Result<bool> {
    loop {
        write!(output, "{} [y/n] ", question)?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            writeln!(output)?;
            return Ok(false);
        }
        match answer.trim().to_lowercase().as_str() {
            "y" | "ye" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(output, "Please respond with 'yes' or 'no' (or 'y' or 'n').")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(input: &str) -> (bool, String) {
        let mut output = Vec::new();
        let confirmed = ask("Continue?", input.as_bytes(), &mut output).unwrap();
        (confirmed, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_yes_and_no() {
        assert!(answer("y\n").0);
        assert!(answer("YES\n").0);
        assert!(!answer("n\n").0);
        assert!(!answer("no\n").0);
    }

    #[test]
    fn test_end_of_input_declines() {
        let (confirmed, output) = answer("");
        assert!(!confirmed);
        assert!(output.starts_with("Continue? [y/n] "));
    }

    #[test]
    fn test_reprompts_until_answered() {
        let (confirmed, output) = answer("maybe\n\ny\n");
        assert!(confirmed);
        assert_eq!(output.matches("Continue? [y/n] ").count(), 3);
        assert_eq!(output.matches("Please respond").count(), 2);
    }
}
