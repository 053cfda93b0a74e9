use std::collections::VecDeque;

use thiserror::Error;

use crate::board::Square;

/// Error when parsing a click script.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid square notation: '{0}'")]
pub struct ParseError(String);

/// Scripted clicks for tests and demos.
///
/// Script format:
/// - Squares are 2 characters (e.g., "e2", "a1"), each one click
/// - Spaces separate squares in the same batch
/// - Periods end a batch
///
/// Examples:
/// - `"e2e4."` - click e2 then e4 in one batch
/// - `"e2 e4. e7 e5."` - two batches of two clicks each
#[derive(Debug, Clone, Default)]
pub struct ClickScript {
    pending_batches: VecDeque<Vec<Square>>,
}

impl ClickScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a script and queue its batches.
    ///
    /// A script that fails to parse queues nothing.
    pub fn push_script(&mut self, script: &str) -> Result<(), ParseError> {
        let batches = parse_script(script)?;
        self.pending_batches.extend(batches);
        Ok(())
    }

    /// Next pending batch of clicks, if any.
    pub fn tick(&mut self) -> Option<Vec<Square>> {
        self.pending_batches.pop_front()
    }

    /// Run every pending batch: `on_click` for each square, then `on_batch`
    /// once the batch is done.
    pub fn drain<C, B>(&mut self, mut on_click: C, mut on_batch: B)
    where
        C: FnMut(Square),
        B: FnMut(),
    {
        while let Some(batch) = self.tick() {
            batch.into_iter().for_each(&mut on_click);
            on_batch();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending_batches.is_empty()
    }
}

/// Parse a script string into batches of clicked squares.
fn parse_script(script: &str) -> Result<Vec<Vec<Square>>, ParseError> {
    let mut batches: Vec<Vec<Square>> = vec![Vec::new()];
    let mut current_token = String::new();

    for ch in script.chars() {
        match ch {
            '.' => {
                flush_token(&mut current_token, &mut batches)?;
                batches.push(Vec::new());
            }
            c if c.is_whitespace() => {
                flush_token(&mut current_token, &mut batches)?;
            }
            _ => {
                current_token.push(ch);
                if current_token.chars().count() == 2 {
                    flush_token(&mut current_token, &mut batches)?;
                }
            }
        }
    }

    flush_token(&mut current_token, &mut batches)?;

    batches.retain(|b| !b.is_empty());
    Ok(batches)
}

/// Add current token to the last batch and clear it.
fn flush_token(token: &mut String, batches: &mut [Vec<Square>]) -> Result<(), ParseError> {
    if token.is_empty() {
        return Ok(());
    }
    let square: Square = token.parse().map_err(|_| ParseError(token.clone()))?;
    if let Some(batch) = batches.last_mut() {
        batch.push(square);
    }
    token.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().expect("test square is invalid")
    }

    #[test]
    fn test_batches_split_on_periods() {
        let mut script = ClickScript::new();
        script.push_script("e2e4. e7 e5.").unwrap();

        assert_eq!(script.tick(), Some(vec![sq("e2"), sq("e4")]));
        assert_eq!(script.tick(), Some(vec![sq("e7"), sq("e5")]));
        assert_eq!(script.tick(), None);
    }

    #[test]
    fn test_trailing_batch_without_period() {
        let mut script = ClickScript::new();
        script.push_script("g1 f3").unwrap();

        assert_eq!(script.tick(), Some(vec![sq("g1"), sq("f3")]));
        assert!(script.is_empty());
    }

    #[test]
    fn test_parse_error_invalid_square() {
        let mut script = ClickScript::new();
        let result = script.push_script("e2.  zz.");
        assert_eq!(result, Err(ParseError("zz".to_string())));
    }

    #[test]
    fn test_parse_error_does_not_modify_state() {
        let mut script = ClickScript::new();
        script.push_script("e2. ").unwrap();

        assert!(script.push_script("xx.").is_err());

        assert_eq!(script.tick(), Some(vec![sq("e2")]));
        assert!(script.is_empty());
    }

    #[test]
    fn test_drain_reports_clicks_and_batches() {
        let mut script = ClickScript::new();
        script.push_script("e2 e4. d7 d5.").unwrap();

        let mut clicks = Vec::new();
        let mut batches = 0;
        script.drain(|square| clicks.push(square), || batches += 1);

        assert_eq!(clicks, vec![sq("e2"), sq("e4"), sq("d7"), sq("d5")]);
        assert_eq!(batches, 2);
    }
}
