//! Locale-aware price formatting.
//!
//! Covers a fixed table of locales.  Unknown locales fall back first to a
//! known locale of the same language, then to `en-US` conventions.  Spaces
//! between amount and symbol are plain ASCII spaces so output stays stable
//! across platforms.

use serde::{Deserialize, Serialize};

/// Currency and locale used to render prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// ISO 4217 code, e.g. `EUR`.
    pub code: String,
    /// BCP 47 locale, e.g. `de-DE`.
    pub locale: String,
}

impl Default for Currency {
    fn default() -> Self {
        Self::new("USD", "en-US")
    }
}

struct LocaleRule {
    tag: &'static str,
    decimal: char,
    group: char,
    symbol_after: bool,
    spaced: bool,
}

const LOCALES: &[LocaleRule] = &[
    LocaleRule { tag: "en-US", decimal: '.', group: ',', symbol_after: false, spaced: false },
    LocaleRule { tag: "en-GB", decimal: '.', group: ',', symbol_after: false, spaced: false },
    LocaleRule { tag: "ja-JP", decimal: '.', group: ',', symbol_after: false, spaced: false },
    LocaleRule { tag: "ko-KR", decimal: '.', group: ',', symbol_after: false, spaced: false },
    LocaleRule { tag: "de-DE", decimal: ',', group: '.', symbol_after: true, spaced: true },
    LocaleRule { tag: "de-CH", decimal: '.', group: '\'', symbol_after: false, spaced: true },
    LocaleRule { tag: "fr-FR", decimal: ',', group: ' ', symbol_after: true, spaced: true },
    LocaleRule { tag: "es-ES", decimal: ',', group: '.', symbol_after: true, spaced: true },
    LocaleRule { tag: "it-IT", decimal: ',', group: '.', symbol_after: true, spaced: true },
    LocaleRule { tag: "nl-NL", decimal: ',', group: '.', symbol_after: false, spaced: true },
    LocaleRule { tag: "pt-BR", decimal: ',', group: '.', symbol_after: false, spaced: true },
    LocaleRule { tag: "sv-SE", decimal: ',', group: ' ', symbol_after: true, spaced: true },
];

fn rule_for(locale: &str) -> &'static LocaleRule {
    let exact = LOCALES.iter().find(|r| r.tag.eq_ignore_ascii_case(locale));
    let language = locale.split(['-', '_']).next().unwrap_or_default();
    exact
        .or_else(|| {
            LOCALES.iter().find(|r| {
                r.tag
                    .split('-')
                    .next()
                    .is_some_and(|l| l.eq_ignore_ascii_case(language))
            })
        })
        .unwrap_or(&LOCALES[0])
}

fn symbol_for(code: &str) -> &str {
    match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "KRW" => "₩",
        "BRL" => "R$",
        "SEK" => "kr",
        other => other,
    }
}

/// Digits after the decimal separator.
fn minor_units(code: &str) -> u32 {
    match code {
        "JPY" | "KRW" => 0,
        _ => 2,
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

/// Round a non-negative finite value to `digits` decimals, half-up, working
/// on its shortest decimal representation.  Returns the whole and fraction
/// digit strings.
fn round_half_up(value: f64, digits: usize) -> (String, String) {
    // `Display` for f64 never uses exponent notation.
    let repr = value.to_string();
    let (int, frac) = repr.split_once('.').unwrap_or((repr.as_str(), ""));

    let mut kept: Vec<u8> = int
        .bytes()
        .chain(frac.bytes().chain(std::iter::repeat(b'0')).take(digits))
        .collect();
    if frac.as_bytes().get(digits).is_some_and(|d| *d >= b'5') {
        let mut carry = true;
        for d in kept.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, b'1');
        }
    }

    let split = kept.len() - digits;
    let whole: String = kept[..split].iter().map(|&b| char::from(b)).collect();
    let fraction: String = kept[split..].iter().map(|&b| char::from(b)).collect();
    (whole, fraction)
}

impl Currency {
    pub fn new(code: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            code: code.into().to_ascii_uppercase(),
            locale: locale.into(),
        }
    }

    /// Format `amount` with this currency's symbol and locale separators.
    pub fn format(&self, amount: f64) -> String {
        if !amount.is_finite() {
            return amount.to_string();
        }

        let code = self.code.to_ascii_uppercase();
        let rule = rule_for(&self.locale);
        let digits = minor_units(&code) as usize;
        let (whole, fraction) = round_half_up(amount.abs(), digits);
        let is_zero = whole.bytes().chain(fraction.bytes()).all(|b| b == b'0');

        let mut number = group_digits(&whole, rule.group);
        if digits > 0 {
            number.push(rule.decimal);
            number.push_str(&fraction);
        }

        let symbol = symbol_for(&code);
        let space = if rule.spaced { " " } else { "" };
        let body = if rule.symbol_after {
            format!("{number}{space}{symbol}")
        } else {
            format!("{symbol}{space}{number}")
        };

        if amount < 0.0 && !is_zero {
            format!("-{body}")
        } else {
            body
        }
    }
}
