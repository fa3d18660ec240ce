//! Interactive entry of the test fraction.
use anyhow::{bail, Result};
use std::io::{BufRead, Write};

const PROMPT: &str = "Please enter the split ratio (float between 0 & 1) you want to use \
(e.g. 0.3 for 30% testing, 70% training of classifier): ";

/// Parse a test fraction, returning the message to show the user on failure.
pub fn parse_test_fraction(raw: &str) -> std::result::Result<f64, String> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| "Error - Please enter a number!".to_string())?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err("Error - Number not between 0 and 1".to_string())
    }
}

/// Ask until a number within `[0, 1]` is entered. Fails on end of input.
pub fn prompt_test_fraction<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<f64> {
    loop {
        write!(output, "\n{}", PROMPT)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("No split ratio entered before end of input");
        }
        match parse_test_fraction(&line) {
            Ok(value) => return Ok(value),
            Err(msg) => writeln!(output, "{}", msg)?,
        }
    }
}
