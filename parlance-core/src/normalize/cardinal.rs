//! British-English cardinal numbers.
//!
//! ```text
//! 5        → five
//! 34       → thirty-four
//! 105      → one hundred and five
//! 1005     → one thousand and five
//! 1234     → one thousand two hundred and thirty-four
//! ```
//!
//! No commas are emitted; "and" joins a hundred to its remainder and a final
//! sub-hundred group to any larger scale before it.

const ONES: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// Scale words for successive groups of three digits. `u64::MAX` needs seven.
const SCALES: [&str; 7] = [
    "",
    "thousand",
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
];

/// Spoken word for a single decimal digit; `None` for anything else.
pub fn digit_word(c: char) -> Option<&'static str> {
    c.to_digit(10).map(|d| ONES[d as usize])
}

/// Cardinal words for a non-negative integer.
pub fn cardinal(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    let mut groups = Vec::new();
    let mut rest = n;
    while rest > 0 {
        groups.push((rest % 1000) as u16);
        rest /= 1000;
    }

    let mut parts: Vec<String> = Vec::new();
    for (scale, &group) in groups.iter().enumerate().rev() {
        if group == 0 {
            continue;
        }
        let mut words = below_thousand(group);
        if scale == 0 && group < 100 && !parts.is_empty() {
            words = format!("and {words}");
        }
        if scale > 0 {
            words.push(' ');
            words.push_str(SCALES[scale]);
        }
        parts.push(words);
    }
    parts.join(" ")
}

/// Cardinal words for a signed integer; negatives are prefixed with "minus".
pub fn signed_cardinal(n: i64) -> String {
    if n < 0 {
        format!("minus {}", cardinal(n.unsigned_abs()))
    } else {
        cardinal(n as u64)
    }
}

fn below_thousand(n: u16) -> String {
    let hundreds = n / 100;
    let rem = n % 100;
    match (hundreds, rem) {
        (0, r) => below_hundred(r),
        (h, 0) => format!("{} hundred", ONES[h as usize]),
        (h, r) => format!("{} hundred and {}", ONES[h as usize], below_hundred(r)),
    }
}

fn below_hundred(n: u16) -> String {
    if n < 20 {
        return ONES[n as usize].to_string();
    }
    let tens = TENS[(n / 10) as usize];
    match n % 10 {
        0 => tens.to_string(),
        units => format!("{tens}-{}", ONES[units as usize]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_numbers() {
        assert_eq!(cardinal(0), "zero");
        assert_eq!(cardinal(7), "seven");
        assert_eq!(cardinal(13), "thirteen");
        assert_eq!(cardinal(40), "forty");
        assert_eq!(cardinal(99), "ninety-nine");
    }

    #[test]
    fn hundreds_use_and() {
        assert_eq!(cardinal(100), "one hundred");
        assert_eq!(cardinal(105), "one hundred and five");
        assert_eq!(cardinal(123), "one hundred and twenty-three");
    }

    #[test]
    fn larger_scales() {
        assert_eq!(cardinal(1000), "one thousand");
        assert_eq!(cardinal(1005), "one thousand and five");
        assert_eq!(cardinal(1205), "one thousand two hundred and five");
        assert_eq!(cardinal(1234), "one thousand two hundred and thirty-four");
        assert_eq!(cardinal(2_100), "two thousand one hundred");
        assert_eq!(cardinal(1_000_005), "one million and five");
        assert_eq!(
            cardinal(3_020_400),
            "three million twenty thousand four hundred"
        );
    }

    #[test]
    fn u64_max_is_spelled() {
        let words = cardinal(u64::MAX);
        assert!(words.starts_with("eighteen quintillion"), "{words}");
        assert!(words.ends_with("six hundred and fifteen"), "{words}");
    }

    #[test]
    fn negatives_say_minus() {
        assert_eq!(signed_cardinal(-42), "minus forty-two");
        assert_eq!(signed_cardinal(i64::MIN), format!("minus {}", cardinal(1 << 63)));
    }

    #[test]
    fn digit_words() {
        assert_eq!(digit_word('0'), Some("zero"));
        assert_eq!(digit_word('9'), Some("nine"));
        assert_eq!(digit_word('x'), None);
    }
}
