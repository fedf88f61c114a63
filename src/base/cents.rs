/// Integral representation of monetary quantities up to two decimal places.
///
/// On the wire (record store rows, model output) amounts are JSON decimals.
/// They are converted to cents on the way in and back on the way out, so all
/// accumulation happens on integers.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    derive_more::From,
    derive_more::Into,
    derive_more::Neg,
    derive_more::Sum,
    derive_more::Sub,
    derive_more::SubAssign,
)]
pub struct Cents(pub i64);

impl Cents {
    pub const ZERO: Self = Self(0);

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Converts a decimal currency amount, rounding to the nearest cent.
    /// Returns `None` for NaN, infinities and values outside the `i64` range.
    pub fn from_f64(amount: f64) -> Option<Self> {
        let cents = (amount * 100.0).round();
        if cents.is_finite() && cents >= i64::MIN as f64 && cents <= i64::MAX as f64 {
            Some(Self(cents as i64))
        } else {
            None
        }
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Divides by `n`, rounding half away from zero. Dividing by zero yields
    /// zero.
    pub fn div_round(self, n: usize) -> Self {
        if n == 0 {
            return Self::ZERO;
        }
        Self(div_round(self.0 as i128, n as i128) as i64)
    }

    /// Display adapter with thousands separators. Negative quantities are
    /// wrapped in parentheses.
    pub fn grouped(self) -> Grouped {
        Grouped(self)
    }
}

/// Saturates at the bounds of `i64`, so sums and totals never wrap.
impl std::ops::Add for Cents {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl std::ops::AddAssign for Cents {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::fmt::Display for Cents {
    /// Formats with exactly two decimal places and no separators, e.g.
    /// `1234.50` or `-0.07`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt_hundredths(self.0, f)
    }
}

impl std::str::FromStr for Cents {
    type Err = std::num::ParseIntError;

    /// Parses a cents quantity from a human-readable string, which may contain
    /// a leading `$`, comma thousands separators and any number of decimal
    /// places. Decimal places beyond the second round half away from zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut s = s.trim().replace([',', '$'], "");
        let mut round_up = false;
        if !["", "+", "-", ".", "+.", "-."].contains(&s.as_str()) {
            let mut chars = s.chars().collect::<Vec<_>>();
            chars.push('0');
            chars.push('0');
            if let Some(i) = chars.iter().copied().position(|c| c == '.') {
                chars.swap(i, i + 1);
                chars.swap(i + 1, i + 2);
                round_up = chars.get(i + 3).is_some_and(|c| ('5'..='9').contains(c));
                chars.truncate(i + 2);
            };
            s = chars.into_iter().collect::<String>();
        }
        let cents = s.parse::<i64>()?;
        if !round_up {
            return Ok(Self(cents));
        }
        // `-0` parses to zero, so the sign comes from the text.
        let away = if s.starts_with('-') { -1 } else { 1 };
        Ok(Self(cents.saturating_add(away)))
    }
}

impl TryFrom<&str> for Cents {
    type Error = <Self as std::str::FromStr>::Err;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse::<Self>()
    }
}

impl serde::Serialize for Cents {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> serde::Deserialize<'de> for Cents {
    /// Accepts a JSON number or a numeric string.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(x) => Cents::from_f64(x)
                .ok_or_else(|| serde::de::Error::custom(format!("amount out of range: {x}"))),
            Repr::Text(s) => s.parse::<Cents>().map_err(serde::de::Error::custom),
        }
    }
}

/// See [`Cents::grouped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grouped(Cents);

impl std::fmt::Display for Grouped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut cents = self.0.0.unsigned_abs();
        let mut bytes = Vec::<u8>::new();
        macro_rules! pop_digit {
            () => {
                bytes.push(b'0' + (cents % 10) as u8);
                cents /= 10
            };
        }

        pop_digit!();
        pop_digit!();
        bytes.push(b'.');
        pop_digit!();
        let mut i = 1;
        while cents > 0 {
            if i % 3 == 0 {
                bytes.push(b',');
            }
            i += 1;
            pop_digit!();
        }
        bytes.reverse();
        if self.0.0 < 0 {
            bytes.insert(0, b'(');
            bytes.push(b')');
        }
        let s = std::str::from_utf8(&bytes).expect("all chars should be ascii");
        f.pad(s)
    }
}

/// A percentage with two decimal places, stored in hundredths of a percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rate(pub i64);

impl Rate {
    /// Returns `part / whole * 100`, rounded half away from zero to two
    /// decimal places, or `None` if `whole` is zero.
    pub fn of(part: Cents, whole: Cents) -> Option<Self> {
        if whole.0 == 0 {
            return None;
        }
        let n = part.0 as i128 * 10_000;
        Some(Self(div_round(n, whole.0 as i128) as i64))
    }
}

impl std::fmt::Display for Rate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt_hundredths(self.0, f)
    }
}

fn fmt_hundredths(v: i64, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let sign = if v < 0 { "-" } else { "" };
    let abs = v.unsigned_abs();
    let s = format!("{}{}.{:02}", sign, abs / 100, abs % 100);
    f.pad(&s)
}

fn div_round(n: i128, d: i128) -> i128 {
    let q = n / d;
    let r = n % d;
    if 2 * r.abs() >= d.abs() {
        q + n.signum() * d.signum()
    } else {
        q
    }
}
