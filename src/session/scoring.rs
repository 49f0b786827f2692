/// Placeholder the response phase records when the participant times out.
pub const NO_RESPONSE: &str = "-";

/// A response is correct when the typed digits spell the cued target count.
pub fn score_response(response: &str, expected: u32) -> bool {
    if response.is_empty() || response == NO_RESPONSE {
        return false;
    }
    response == expected.to_string()
}

/// Percentage of correct trials; zero for an empty run.
pub fn run_accuracy(outcomes: &[bool]) -> f64 {
    if outcomes.is_empty() {
        return 0.0;
    }
    outcomes.iter().filter(|&&correct| correct).count() as f64 / outcomes.len() as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_digits_are_required() {
        assert!(score_response("4", 4));
        assert!(score_response("12", 12));
        assert!(!score_response("04", 4));
        assert!(!score_response("5", 4));
        assert!(!score_response(NO_RESPONSE, 4));
        assert!(!score_response("", 0));
    }

    #[test]
    fn accuracy_is_a_percentage() {
        assert_eq!(run_accuracy(&[true, false, true, true]), 75.0);
        assert_eq!(run_accuracy(&[]), 0.0);
    }
}
