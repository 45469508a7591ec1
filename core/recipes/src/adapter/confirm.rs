//! 削除前の確認（CLI 境界）

use crate::ports::outbound::Confirm;
use common::error::Error;
use std::io::{self, BufRead, Write};

/// stderr に問い、stdin の 1 行で答えを受ける。y / yes 以外はすべて「いいえ」。
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool, Error> {
        eprint!("{} [y/N]: ", prompt);
        let _ = io::stderr().flush();

        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| Error::io_msg(e.to_string()))?;
        Ok(is_yes(&line))
    }
}

/// `-y` 指定時: 問わずに続行
#[derive(Debug, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> Result<bool, Error> {
        Ok(true)
    }
}

/// 非対話: 問わずに中止
#[derive(Debug, Default)]
pub struct AssumeNo;

impl Confirm for AssumeNo {
    fn confirm(&self, _prompt: &str) -> Result<bool, Error> {
        Ok(false)
    }
}

fn is_yes(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("no"));
    }

    #[test]
    fn test_fixed_answers() {
        assert!(AssumeYes.confirm("delete?").unwrap());
        assert!(!AssumeNo.confirm("delete?").unwrap());
    }
}
