use regex::Regex;
use std::sync::OnceLock;

/// Returned by [`parse_duration_seconds`] when the input is not a valid duration.
pub const INVALID_DURATION: i64 = -1;

fn duration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^P(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?$",
        )
        .expect("static duration pattern")
    })
}

/// Parse an ISO 8601 duration (`PT1M1S`, `P1DT2H`, `PT59.5S`) into whole seconds.
///
/// Fractional seconds round up, so `0 < secs <= 61` holds for the result exactly when
/// it holds for the exact value. Anything that is not a week/day/time duration with at
/// least one component yields [`INVALID_DURATION`].
pub fn parse_duration_seconds(duration: &str) -> i64 {
    let duration = duration.trim();
    let Some(caps) = duration_pattern().captures(duration) else {
        return INVALID_DURATION;
    };

    // "P" and "PT" match the pattern with nothing captured.
    if caps.iter().skip(1).all(|group| group.is_none()) || duration.ends_with('T') {
        return INVALID_DURATION;
    }

    let whole = |index: usize, unit: i64| -> Option<i64> {
        match caps.get(index) {
            Some(m) => m.as_str().parse::<i64>().ok()?.checked_mul(unit),
            None => Some(0),
        }
    };

    let seconds = match caps.get(5) {
        Some(m) => match m.as_str().parse::<f64>() {
            Ok(value) => value.ceil() as i64,
            Err(_) => return INVALID_DURATION,
        },
        None => 0,
    };

    let total = [
        whole(1, 7 * 24 * 3600),
        whole(2, 24 * 3600),
        whole(3, 3600),
        whole(4, 60),
        Some(seconds),
    ]
    .into_iter()
    .try_fold(0i64, |acc, part| acc.checked_add(part?));

    total.unwrap_or(INVALID_DURATION)
}
