use regex::Regex;
use std::num::IntErrorKind;
use std::sync::LazyLock;

/// longest mute the bot will apply
pub const MAX_MUTE_SECONDS: u64 = 86_400;

/// used when the requested duration can't be parsed
pub const DEFAULT_MUTE_SECONDS: u64 = 1_800;

static DURATION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([0-9]+)([mhd])$").expect("duration regex is valid"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DurationUnit {
    Minutes,
    Hours,
    Days,
}

impl DurationUnit {
    pub fn seconds(&self) -> u64 {
        match self {
            DurationUnit::Minutes => 60,
            DurationUnit::Hours => 3_600,
            DurationUnit::Days => 86_400,
        }
    }

    pub fn suffix(&self) -> char {
        match self {
            DurationUnit::Minutes => 'm',
            DurationUnit::Hours => 'h',
            DurationUnit::Days => 'd',
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.to_ascii_lowercase().as_str() {
            "m" => Some(DurationUnit::Minutes),
            "h" => Some(DurationUnit::Hours),
            "d" => Some(DurationUnit::Days),
            _ => None,
        }
    }

    /// base key of the plural group naming this unit
    pub fn catalog_key(&self) -> &'static str {
        match self {
            DurationUnit::Minutes => "minutes",
            DurationUnit::Hours => "hours",
            DurationUnit::Days => "days",
        }
    }

    /// converts `amount` of this unit to seconds, capped at one day
    pub fn capped_seconds(&self, amount: u64) -> ParsedDuration {
        let requested = amount.saturating_mul(self.seconds());
        ParsedDuration {
            seconds: requested.min(MAX_MUTE_SECONDS),
            capped: requested > MAX_MUTE_SECONDS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParsedDuration {
    pub seconds: u64,
    /// the requested duration exceeded the maximum
    pub capped: bool,
}

/// how a /muteme argument should be handled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DurationInput {
    /// no argument, offer presets
    Empty,
    /// a positive number without a unit, ask minutes or hours
    Ambiguous(u64),
    Valid(ParsedDuration),
    Invalid,
}

/// parses tokens like `45m`, `2h` or `1d`; zero amounts are invalid
pub fn parse_duration(token: &str) -> Option<ParsedDuration> {
    let captures = DURATION_TOKEN.captures(token)?;
    let amount = parse_amount(&captures[1]).filter(|&amount| amount > 0)?;

    let unit = DurationUnit::from_suffix(&captures[2])?;
    Some(unit.capped_seconds(amount))
}

/// recognizes a strictly positive number with no unit
pub fn bare_number(token: &str) -> Option<u64> {
    parse_amount(token).filter(|&amount| amount > 0)
}

// ascii digits only; amounts past u64::MAX saturate
fn parse_amount(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    match digits.parse::<u64>() {
        Ok(amount) => Some(amount),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(u64::MAX),
        Err(_) => None,
    }
}

/// classifies the first whitespace-separated token of a command argument
pub fn classify(arg: &str) -> DurationInput {
    let Some(token) = arg.split_whitespace().next() else {
        return DurationInput::Empty;
    };

    if let Some(amount) = bare_number(token) {
        return DurationInput::Ambiguous(amount);
    }

    match parse_duration(token) {
        Some(parsed) => DurationInput::Valid(parsed),
        None => DurationInput::Invalid,
    }
}
