//! Duration grammar for sanction durations
//!
//! Operator input like `4h30`, `2w`, `90` or `perm`. A group without a unit
//! uses one unit below the previous group's, so `4h30` reads as 4h30m and a
//! bare `30` as 30 seconds.

use crate::error::ModerationError;

const QUALIFIERS: [&[&str]; 8] = [
    &["ms"],
    &["s", "sec", "second", "seconds"],
    &["m", "min", "minute", "minutes"],
    &["h", "hour", "hours"],
    &["d", "D", "day", "days"],
    &["w", "W", "week", "weeks"],
    &["M", "mo", "month", "months"],
    &["y", "Y", "year", "years"],
];

const LENGTHS_MS: [i64; 8] = [
    1,
    1_000,
    60_000,
    3_600_000,
    86_400_000,
    604_800_000,
    2_592_000_000,
    31_536_000_000,
];

/// Parse a duration string into milliseconds, `None` if malformed
#[must_use]
pub fn parse_duration_ms(s: &str) -> Option<i64> {
    let bytes = s.as_bytes();
    let end = bytes.len();
    let mut pos = 0;
    let mut empty = true;
    // pretend the previous qualifier was minutes so a bare leading number
    // selects seconds
    let mut last_qualifier_idx: usize = 2;
    let mut total: i64 = 0;

    while pos < end {
        while pos < end && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= end {
            break;
        }

        // numeric part
        if !bytes[pos].is_ascii_digit() {
            return None;
        }

        let mut accum: i64 = 0;

        while pos < end && bytes[pos].is_ascii_digit() {
            accum = accum
                .checked_mul(10)?
                .checked_add(i64::from(bytes[pos] - b'0'))?;
            pos += 1;
        }

        while pos < end && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        // qualifier part
        let qual_start = pos;

        while pos < end && !bytes[pos].is_ascii_digit() && !bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        let mul = if pos == qual_start {
            // no qualifier, use one unit below the previous one
            LENGTHS_MS[last_qualifier_idx.saturating_sub(1)]
        } else {
            let qual = &s[qual_start..pos];
            let idx = QUALIFIERS.iter().position(|quals| quals.contains(&qual))?;
            last_qualifier_idx = idx;
            LENGTHS_MS[idx]
        };

        empty = false;
        total = total.checked_add(accum.checked_mul(mul)?)?;
    }

    if empty {
        None
    } else {
        Some(total)
    }
}

/// Parse an optional operator-supplied duration for an action.
///
/// `None` yields 0 (no duration), `perm`/`permanent` yields -1, anything
/// else goes through [`parse_duration_ms`]. Duration-bearing action types
/// reject a missing or zero duration.
pub fn parse_action_duration_ms(
    duration: Option<&str>,
    require_duration: bool,
) -> Result<i64, ModerationError> {
    let duration_ms = match duration {
        None => 0,
        Some(s) if s.eq_ignore_ascii_case("perm") || s.eq_ignore_ascii_case("permanent") => -1,
        Some(s) => {
            parse_duration_ms(s).ok_or_else(|| ModerationError::InvalidDuration(s.to_string()))?
        }
    };

    if duration_ms == 0 && require_duration {
        return Err(ModerationError::ZeroDuration);
    }

    Ok(duration_ms)
}

/// Format a millisecond duration back into the compact form, e.g. `1d4h`
#[must_use]
pub fn format_duration(duration_ms: i64) -> String {
    format_duration_parts(duration_ms, usize::MAX)
}

/// Format a millisecond duration keeping at most `max_parts` unit groups
#[must_use]
pub fn format_duration_parts(mut duration_ms: i64, mut max_parts: usize) -> String {
    let mut ret = String::new();

    if duration_ms < 0 {
        ret.push('-');
        duration_ms = -duration_ms;
    }

    while duration_ms > 0 && max_parts > 0 {
        max_parts -= 1;

        let mut idx = 0;
        for i in (1..LENGTHS_MS.len()).rev() {
            if LENGTHS_MS[i] <= duration_ms {
                idx = i;
                break;
            }
        }

        let mul = LENGTHS_MS[idx];
        let count = duration_ms / mul;
        duration_ms -= count * mul;

        ret.push_str(&count.to_string());
        ret.push_str(QUALIFIERS[idx][0]);
    }

    if ret.is_empty() || ret == "-" {
        "0".to_string()
    } else {
        ret
    }
}
