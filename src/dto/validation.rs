//! Validation helpers for DTOs.

use validator::ValidationError;

/// Most prizes a contest can announce.
pub const MAX_PRIZES: usize = 4;
/// Longest accepted prize description, in characters.
pub const MAX_PRIZE_LEN: usize = 200;

/// Validates an ordered prize list: one to four non-blank entries of bounded length.
///
/// # Examples
///
/// ```ignore
/// validate_prize_list(&["1B ISK".into()])  // Ok
/// validate_prize_list(&[])                 // Err - empty
/// validate_prize_list(&["  ".into()])      // Err - blank prize
/// ```
pub fn validate_prize_list(prizes: &[String]) -> Result<(), ValidationError> {
    if prizes.is_empty() || prizes.len() > MAX_PRIZES {
        let mut err = ValidationError::new("prize_count");
        err.message = Some(
            format!(
                "Between 1 and {MAX_PRIZES} prizes are required (got {})",
                prizes.len()
            )
            .into(),
        );
        return Err(err);
    }

    if let Some(position) = prizes.iter().position(|prize| prize.trim().is_empty()) {
        let mut err = ValidationError::new("prize_blank");
        err.message = Some(format!("Prize {} is empty", position + 1).into());
        return Err(err);
    }

    if let Some(position) = prizes
        .iter()
        .position(|prize| prize.trim().chars().count() > MAX_PRIZE_LEN)
    {
        let mut err = ValidationError::new("prize_length");
        err.message = Some(
            format!(
                "Prize {} is longer than {MAX_PRIZE_LEN} characters",
                position + 1
            )
            .into(),
        );
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prizes(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn test_validate_prize_list_valid() {
        assert!(validate_prize_list(&prizes(&["1B ISK"])).is_ok());
        assert!(validate_prize_list(&prizes(&["a", "b", "c", "d"])).is_ok());
        assert!(validate_prize_list(&[("x".repeat(MAX_PRIZE_LEN))]).is_ok());
    }

    #[test]
    fn test_validate_prize_list_invalid_count() {
        assert!(validate_prize_list(&[]).is_err());
        assert!(validate_prize_list(&prizes(&["a", "b", "c", "d", "e"])).is_err());
    }

    #[test]
    fn test_validate_prize_list_invalid_entries() {
        assert!(validate_prize_list(&prizes(&["1B ISK", "   "])).is_err());
        assert!(validate_prize_list(&[("x".repeat(MAX_PRIZE_LEN + 1))]).is_err());
    }
}
