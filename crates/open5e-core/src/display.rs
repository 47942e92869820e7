//! Presentation helpers for stat blocks.

/// `floor((score - 10) / 2)`.
pub fn ability_modifier(score: i64) -> i64 {
    (score - 10).div_euclid(2)
}

/// Modifier with a leading sign: `+0`, `+3`, `-1`.
pub fn format_modifier(score: i64) -> String {
    format!("{:+}", ability_modifier(score))
}

/// Challenge rating as shown in stat blocks: `1/8`, `1/4`, `1/2`, or an integer.
pub fn format_challenge_rating(cr: f64) -> String {
    const FRACTIONS: [(f64, &str); 3] = [(0.125, "1/8"), (0.25, "1/4"), (0.5, "1/2")];

    if let Some((_, text)) = FRACTIONS.iter().find(|(v, _)| (cr - v).abs() < f64::EPSILON) {
        return (*text).to_string();
    }
    if cr.fract() == 0.0 {
        format!("{cr:.0}")
    } else {
        cr.to_string()
    }
}
