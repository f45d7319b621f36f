use muteme_bot::handlers::MuteCallback;
use muteme_bot::utils::duration::{
    bare_number, classify, parse_duration, DurationInput, DurationUnit, ParsedDuration,
    DEFAULT_MUTE_SECONDS, MAX_MUTE_SECONDS,
};

fn valid(seconds: u64, capped: bool) -> DurationInput {
    DurationInput::Valid(ParsedDuration { seconds, capped })
}

#[test]
fn test_parse_duration_units() {
    assert_eq!(
        parse_duration("45m"),
        Some(ParsedDuration {
            seconds: 2_700,
            capped: false
        })
    );
    assert_eq!(parse_duration("2h").map(|d| d.seconds), Some(7_200));
    assert_eq!(parse_duration("1d").map(|d| d.seconds), Some(MAX_MUTE_SECONDS));
    assert_eq!(parse_duration("24h").map(|d| d.capped), Some(false));
}

#[test]
fn test_parse_duration_is_case_insensitive() {
    assert_eq!(parse_duration("2H").map(|d| d.seconds), Some(7_200));
    assert_eq!(parse_duration("45M").map(|d| d.seconds), Some(2_700));
}

#[test]
fn test_parse_duration_caps_at_one_day() {
    assert_eq!(
        parse_duration("90h"),
        Some(ParsedDuration {
            seconds: MAX_MUTE_SECONDS,
            capped: true
        })
    );
    assert_eq!(parse_duration("2d").map(|d| d.capped), Some(true));
    assert_eq!(parse_duration("1441m").map(|d| d.capped), Some(true));
    // does not overflow
    assert_eq!(
        parse_duration("99999999999999999999999d"),
        Some(ParsedDuration {
            seconds: MAX_MUTE_SECONDS,
            capped: true
        })
    );
}

#[test]
fn test_parse_duration_rejects_garbage() {
    for token in ["", "0m", "0h", "m", "45", "45s", "4 5m", "-5m", "1.5h", "abc", "45mm", "h45", "٥m", "５m", "１２h"] {
        assert_eq!(parse_duration(token), None, "token {:?}", token);
    }
}

#[test]
fn test_bare_number() {
    assert_eq!(bare_number("25"), Some(25));
    assert_eq!(bare_number("0"), None);
    assert_eq!(bare_number("25m"), None);
    assert_eq!(bare_number("-3"), None);
    assert_eq!(bare_number("٥"), None);
    assert_eq!(bare_number("99999999999999999999999"), Some(u64::MAX));
    assert_eq!(bare_number(""), None);
}

#[test]
fn test_classify() {
    assert_eq!(classify(""), DurationInput::Empty);
    assert_eq!(classify("   "), DurationInput::Empty);
    assert_eq!(classify("25"), DurationInput::Ambiguous(25));
    assert_eq!(classify("45m"), valid(2_700, false));
    assert_eq!(classify(" 2h please"), valid(7_200, false));
    assert_eq!(classify("90h"), valid(MAX_MUTE_SECONDS, true));
    assert_eq!(classify("soon"), DurationInput::Invalid);
    assert_eq!(classify("0"), DurationInput::Invalid);
    assert_eq!(classify("0m"), DurationInput::Invalid);
    assert_eq!(classify("５m"), DurationInput::Invalid);
}

#[test]
fn test_default_is_shorter_than_max() {
    assert_eq!(DEFAULT_MUTE_SECONDS, 30 * 60);
    assert!(DEFAULT_MUTE_SECONDS < MAX_MUTE_SECONDS);
}

#[test]
fn test_mute_callback_payload() {
    let payload = MuteCallback::new(42, 30, DurationUnit::Minutes);
    assert_eq!(payload.encode(), "muteme:42:30:m");
    assert_eq!(MuteCallback::parse("muteme:42:30:m"), Some(payload));

    let parsed = MuteCallback::parse("muteme:42:8:h").unwrap();
    assert_eq!(parsed.duration().seconds, 8 * 3_600);
    assert!(!parsed.duration().capped);

    let capped = MuteCallback::parse("muteme:42:25:h").unwrap();
    assert_eq!(capped.duration().seconds, MAX_MUTE_SECONDS);
    assert!(capped.duration().capped);
}

#[test]
fn test_mute_callback_rejects_malformed_payloads() {
    for data in [
        "muteme",
        "muteme:42",
        "muteme:42:30",
        "muteme:abc:30:m",
        "muteme:42:0:m",
        "muteme:42:30:s",
        "muteme:42:30:m:extra",
        "mute:42:30:m",
        "en",
    ] {
        assert_eq!(MuteCallback::parse(data), None, "payload {:?}", data);
    }

    assert!(MuteCallback::is_mute_payload("muteme:42:0:m"));
    assert!(!MuteCallback::is_mute_payload("uk"));
}
