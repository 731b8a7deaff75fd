/// Points awarded per correct answer at the end of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringRules {
    pass_points: u32,
    fail_points: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            pass_points: 20,
            fail_points: 15,
        }
    }
}

impl ScoringRules {
    #[must_use]
    pub fn new(pass_points: u32, fail_points: u32) -> Self {
        Self {
            pass_points,
            fail_points,
        }
    }

    #[must_use]
    pub fn pass_points(&self) -> u32 {
        self.pass_points
    }

    #[must_use]
    pub fn fail_points(&self) -> u32 {
        self.fail_points
    }

    /// Score earned for `correct` answers given the pass/fail result.
    #[must_use]
    pub fn score(&self, correct: u32, passed: bool) -> u32 {
        let per_answer = if passed {
            self.pass_points
        } else {
            self.fail_points
        };
        correct.saturating_mul(per_answer)
    }
}

/// Minimum correct answers needed to pass: `ceil(total / 2)`.
///
/// ```
/// # use quiz_core::scoring::pass_threshold;
/// assert_eq!(pass_threshold(6), 3);
/// assert_eq!(pass_threshold(5), 3);
/// assert_eq!(pass_threshold(1), 1);
/// ```
#[must_use]
pub fn pass_threshold(total: u32) -> u32 {
    total.div_ceil(2)
}

#[must_use]
pub fn is_pass(correct: u32, total: u32) -> bool {
    correct >= pass_threshold(total)
}
