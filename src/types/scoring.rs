/// Rounds half away from zero to two decimals.
///
/// The value is first snapped to a millionth of a hundredth so that binary
/// noise such as `2.675 -> 2.67499999...` does not decide the rounding.
pub fn round2(value: f64) -> f64 {
    let hundredths = (value * 100.0 * 1e6).round() / 1e6;
    hundredths.round() / 100.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionScore {
    pub score: f64,
    pub explanation: String,
    pub warning: Option<String>,
}
