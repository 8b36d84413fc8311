/// First step at which a review checkpoint is offered.
pub const FIRST_REVIEW_STEP: usize = 10;
/// Steps between consecutive review checkpoints.
pub const REVIEW_INTERVAL: usize = 5;

/// Whether advancing from `step` offers the review checkpoint.
#[must_use]
pub fn is_review_step(step: usize) -> bool {
    step >= FIRST_REVIEW_STEP && (step - FIRST_REVIEW_STEP) % REVIEW_INTERVAL == 0
}
