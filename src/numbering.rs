use thiserror::Error;

/// How a printed page number is written in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Numbering {
    /// Front matter style: i, ii, xiii, ...
    Roman(u32),
    /// Body style: 1, 2, 3, ...
    Decimal(u32),
}

impl Numbering {
    pub fn value(self) -> u32 {
        match self {
            Numbering::Roman(n) | Numbering::Decimal(n) => n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    #[error("empty page number")]
    Empty,

    #[error("page number must be at least 1")]
    Zero,

    #[error("page number {0:?} is too large")]
    TooLarge(String),

    #[error("malformed roman numeral {0:?}")]
    MalformedRoman(String),

    #[error("{0:?} is neither a decimal nor a roman page number")]
    Unrecognized(String),
}

pub const MAX_ROMAN: u32 = 3999;

const ROMAN_VALUES: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Classify a printed page token as decimal or roman.
pub fn classify(token: &str) -> Result<Numbering, ClassificationError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ClassificationError::Empty);
    }

    if token.bytes().all(|b| b.is_ascii_digit()) {
        let value: u32 = token
            .parse()
            .map_err(|_| ClassificationError::TooLarge(token.to_string()))?;
        if value == 0 {
            return Err(ClassificationError::Zero);
        }
        return Ok(Numbering::Decimal(value));
    }

    if token.chars().all(is_roman_char) {
        return parse_roman(token).map(Numbering::Roman);
    }

    Err(ClassificationError::Unrecognized(token.to_string()))
}

fn is_roman_char(c: char) -> bool {
    matches!(
        c.to_ascii_uppercase(),
        'I' | 'V' | 'X' | 'L' | 'C' | 'D' | 'M'
    )
}

fn roman_digit(c: char) -> Option<u32> {
    match c.to_ascii_uppercase() {
        'I' => Some(1),
        'V' => Some(5),
        'X' => Some(10),
        'L' => Some(50),
        'C' => Some(100),
        'D' => Some(500),
        'M' => Some(1000),
        _ => None,
    }
}

/// Parse a roman numeral in canonical form (case-insensitive).
///
/// The additive/subtractive sum is computed first, then re-encoded; a token
/// whose canonical spelling differs (`IIII`, `VX`, `IC`, ...) is rejected.
pub fn parse_roman(token: &str) -> Result<u32, ClassificationError> {
    let malformed = || ClassificationError::MalformedRoman(token.to_string());

    let digits = token
        .chars()
        .map(roman_digit)
        .collect::<Option<Vec<u32>>>()
        .ok_or_else(malformed)?;
    if digits.is_empty() {
        return Err(ClassificationError::Empty);
    }

    let mut total: u32 = 0;
    let mut prev = 0;
    for &value in digits.iter().rev() {
        if value >= prev {
            total = total.checked_add(value).ok_or_else(malformed)?;
        } else {
            total = total.checked_sub(value).ok_or_else(malformed)?;
        }
        prev = value;
    }

    if total > MAX_ROMAN {
        return Err(ClassificationError::TooLarge(token.to_string()));
    }
    if total == 0 || to_roman(total) != token.to_ascii_uppercase() {
        return Err(malformed());
    }
    Ok(total)
}

/// Upper-case roman numeral for `n`. Returns `"0"` for zero.
pub fn to_roman(mut n: u32) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let mut result = String::new();
    for (value, numeral) in ROMAN_VALUES {
        while n >= value {
            result.push_str(numeral);
            n -= value;
        }
    }
    result
}
