use crate::base;

/// Interval defined by the inclusive bound of two dates. If `start` is greater
/// than `end`, the interval is considered empty. All empty intervals are
/// equivalent.
#[derive(Debug, Clone, Copy, Eq)]
pub struct Interval {
    pub start: base::Date,
    pub end: base::Date,
}

impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        self.is_empty() && other.is_empty() || self.start == other.start && self.end == other.end
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::MAX
    }
}

impl Interval {
    /// The largest possible interval.
    pub const MAX: Self = Self {
        start: base::Date::MIN,
        end: base::Date::MAX,
    };

    pub const EMPTY: Self = Self {
        start: base::Date::MAX,
        end: base::Date::MIN,
    };

    pub fn is_empty(self) -> bool {
        self.start > self.end
    }

    pub fn contains(self, dt: base::Date) -> bool {
        self.start <= dt && dt <= self.end
    }

    /// Like [`Interval::contains`], but with no lower bound.
    pub fn contains_or_precedes(self, dt: base::Date) -> bool {
        !self.is_empty() && dt <= self.end
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Date(#[from] base::date::ParseError),
    #[error("invalid left side")]
    Left(#[source] base::date::ParseError),
    #[error("invalid right side")]
    Right(#[source] base::date::ParseError),
}

impl std::str::FromStr for Interval {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = match s.split_once(':') {
            Some((left, right)) => (
                if left.is_empty() {
                    base::Date::MIN
                } else {
                    left.parse::<base::Date>().map_err(Self::Err::Left)?
                },
                if right.is_empty() {
                    base::Date::MAX
                } else {
                    right.parse::<base::Date>().map_err(Self::Err::Right)?
                },
            ),
            None => {
                let dt = s.parse::<base::Date>()?;
                let part = match s.as_bytes()[0] as char {
                    'y' | 'Y' => base::Datepart::Year,
                    'm' | 'M' => base::Datepart::Month,
                    _ => base::Datepart::Day,
                };
                (dt.first_of(part), dt.last_of(part))
            }
        };
        Ok(Self { start, end })
    }
}

impl TryFrom<&str> for Interval {
    type Error = <Self as std::str::FromStr>::Err;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse::<Self>()
    }
}
