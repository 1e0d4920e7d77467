use crate::models::ParsedAnalysis;

pub const RADAR_MARKER: &str = "||RADAR:";
pub const PENDING_TEXT: &str = "analyzing";
pub const DEFAULT_PROFILE: [f64; 5] = [50.0; 5];

/// Splits a stored analysis payload into display text and a five-axis profile.
///
/// Never fails: an absent payload, a missing marker or an unusable numeric
/// suffix all degrade to [`PENDING_TEXT`] / [`DEFAULT_PROFILE`] as appropriate.
pub fn parse(raw: Option<&str>) -> ParsedAnalysis {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return pending(),
    };

    match raw.split_once(RADAR_MARKER) {
        Some((text, radar)) => ParsedAnalysis {
            display_text: text.to_string(),
            profile: parse_profile(radar).unwrap_or(DEFAULT_PROFILE),
        },
        None => ParsedAnalysis {
            display_text: raw.to_string(),
            profile: DEFAULT_PROFILE,
        },
    }
}

pub fn pending() -> ParsedAnalysis {
    ParsedAnalysis {
        display_text: PENDING_TEXT.to_string(),
        profile: DEFAULT_PROFILE,
    }
}

fn parse_profile(radar: &str) -> Option<[f64; 5]> {
    let mut profile = [0.0; 5];
    let mut count = 0;
    for piece in radar.split(',') {
        let value: f64 = piece.trim().parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        *profile.get_mut(count)? = value.clamp(0.0, 100.0);
        count += 1;
    }
    (count == profile.len()).then_some(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_or_empty_payload_is_pending() {
        assert_eq!(parse(None), pending());
        assert_eq!(parse(Some("")), pending());
        assert_eq!(parse(Some("")).display_text, "analyzing");
        assert_eq!(parse(None).profile, [50.0, 50.0, 50.0, 50.0, 50.0]);
    }

    #[test]
    fn splits_text_and_profile() {
        let parsed = parse(Some("Text||RADAR:10,20,30,40,50"));
        assert_eq!(parsed.display_text, "Text");
        assert_eq!(parsed.profile, [10.0, 20.0, 30.0, 40.0, 50.0]);
    }

    #[test]
    fn malformed_profile_keeps_text() {
        let parsed = parse(Some("Text||RADAR:x,y,z"));
        assert_eq!(parsed.display_text, "Text");
        assert_eq!(parsed.profile, DEFAULT_PROFILE);

        let short = parse(Some("Text||RADAR:1,2,3"));
        assert_eq!(short.profile, DEFAULT_PROFILE);

        let long = parse(Some("Text||RADAR:1,2,3,4,5,6"));
        assert_eq!(long.profile, DEFAULT_PROFILE);

        let partly = parse(Some("Text||RADAR:1,2,three,4,5"));
        assert_eq!(partly.profile, DEFAULT_PROFILE);

        let empty = parse(Some("Text||RADAR:"));
        assert_eq!(empty.display_text, "Text");
        assert_eq!(empty.profile, DEFAULT_PROFILE);

        let nan = parse(Some("Text||RADAR:NaN,1,2,3,4"));
        assert_eq!(nan.profile, DEFAULT_PROFILE);
    }

    #[test]
    fn payload_without_marker_is_all_text() {
        let parsed = parse(Some("  just words  "));
        assert_eq!(parsed.display_text, "  just words  ");
        assert_eq!(parsed.profile, DEFAULT_PROFILE);
    }

    #[test]
    fn profile_values_are_clamped_and_spaces_tolerated() {
        let parsed = parse(Some("||RADAR: 120, -5, 33.5 ,0,100"));
        assert_eq!(parsed.display_text, "");
        assert_eq!(parsed.profile, [100.0, 0.0, 33.5, 0.0, 100.0]);
    }
}
