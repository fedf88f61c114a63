use crate::base;

/// A calendar date without time or timezone information. Values are
/// guaranteed to be between `0000-01-01` and `9999-12-31`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Date(time::Date);

impl Date {
    /// 0000-01-01
    pub const MIN: Self = Self(time::macros::date!(0000 - 01 - 01));

    /// 9999-12-31
    pub const MAX: Self = Self(time::macros::date!(9999 - 12 - 31));

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u8 {
        self.0.month() as u8
    }

    pub fn day(self) -> u8 {
        self.0.day()
    }

    fn new(inner: time::Date) -> Option<Self> {
        let dt = Self(inner);
        if dt >= Self::MIN && dt <= Self::MAX {
            Some(dt)
        } else {
            None
        }
    }

    /// Converts a `time` date, saturating at [`Date::MIN`] and [`Date::MAX`].
    pub(crate) fn clamped(inner: time::Date) -> Self {
        Self(inner).clamp(Self::MIN, Self::MAX)
    }

    pub fn from_ymd(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = time::Month::try_from(month).ok()?;
        time::Date::from_calendar_date(year, month, day)
            .ok()
            .and_then(Self::new)
    }

    /// Returns the local date, falling back to UTC when the local offset
    /// cannot be determined.
    #[cfg(not(test))]
    pub fn today() -> Self {
        let now = time::OffsetDateTime::now_local()
            .unwrap_or_else(|_| time::OffsetDateTime::now_utc());
        Self::clamped(now.date())
    }

    /// Returns the local date.
    #[cfg(test)]
    pub fn today() -> Self {
        Self(time::macros::date!(2026 - 03 - 30))
    }

    pub fn first_of(self, part: base::Datepart) -> Self {
        match part {
            base::Datepart::Day => self,
            base::Datepart::Year => Self::from_ymd(self.year(), 1, 1)
                .expect("first day of a valid year should be a valid date"),
            base::Datepart::Month => Self::from_ymd(self.year(), self.month(), 1)
                .expect("first day of a valid month should be a valid date"),
        }
    }

    pub fn last_of(self, part: base::Datepart) -> Self {
        match part {
            base::Datepart::Day => self,
            base::Datepart::Year => Self::from_ymd(self.year(), 12, 31)
                .expect("final day of a valid year should be a valid date"),
            base::Datepart::Month => Self::from_ymd(
                self.year(),
                self.month(),
                if (self.month() == 2)
                    && (self.year() % 4 == 0)
                    && ((self.year() % 100 != 0) || (self.year() % 400 == 0))
                {
                    29
                } else {
                    [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31][self.month() as usize]
                },
            )
            .expect("final day of month should be computed correctly"),
        }
    }

    /// Offsets the date by the given datepart, returning `None` if the
    /// resultant date is out of bounds.
    ///
    /// When shifting by years or months, clamps the resultant date's day to the
    /// resultant month's last-day-of-month. For example, if the original date
    /// is a Feb 29, shifting by 1 year will yield the next year's Feb 28.
    pub fn shift(self, part: base::Datepart, offset: i32) -> Option<Self> {
        let (y, m) = match part {
            base::Datepart::Day => {
                return self
                    .0
                    .checked_add(time::Duration::days(offset as i64))
                    .and_then(Self::new);
            }
            base::Datepart::Year => (self.year().checked_add(offset)?, self.month()),
            base::Datepart::Month => {
                let mut y = self.year();
                let mut m = (self.month() as i32).checked_add(offset)?;
                if m > 12 {
                    y = y.checked_add((m - 1) / 12)?;
                    m = (m - 1) % 12 + 1;
                } else if m < 1 {
                    y = y.checked_add((m - 12) / 12)?;
                    m = (m % 12 + 11) % 12 + 1;
                }
                (y, m as u8)
            }
        };
        let last = Self::from_ymd(y, m, 1)?.last_of(base::Datepart::Month);
        Self::from_ymd(y, m, last.day().min(self.day()))
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = format!("{:04}-{:02}-{:02}", self.year(), self.month(), self.day());
        f.pad(&s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("input is empty")]
    Empty,
    #[error(transparent)]
    BadFormat(#[from] time::error::Parse),
    #[error("date is before 0000-01-01 or after 9999-12-31")]
    OutOfRange,
    #[error("first character is not one of {{y, Y, m, M, d, D}}")]
    InvalidFirstChar,
    #[error(transparent)]
    InvalidOffset(#[from] std::num::ParseIntError),
}

impl std::str::FromStr for Date {
    type Err = ParseError;

    /// Parses a string to a date. Inputs must be in one of the following formats:
    /// - `yyyy-mm-dd`
    /// - `xn` where `x` is one of `{y, Y, m, M, d, D}` and `n` is an integer
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Self::Err::Empty);
        }
        if s.as_bytes()[0].is_ascii_digit() {
            let fmt = time::macros::format_description!("[year]-[month]-[day]");
            return time::Date::parse(s, fmt)
                .map_err(Self::Err::BadFormat)
                .and_then(|x| Self::new(x).ok_or(Self::Err::OutOfRange));
        }

        let bytes = s.as_bytes();
        let offset: i32 = if bytes.len() == 1 {
            0
        } else {
            std::str::from_utf8(&bytes[1..])
                .map_err(|_| Self::Err::InvalidFirstChar)?
                .parse::<i32>()?
        };
        let today = Self::today();
        match bytes[0] as char {
            'd' | 'D' => today.shift(base::Datepart::Day, offset),
            'y' => today
                .first_of(base::Datepart::Year)
                .shift(base::Datepart::Year, offset),
            'Y' => today
                .last_of(base::Datepart::Year)
                .shift(base::Datepart::Year, offset),
            'm' => today
                .first_of(base::Datepart::Month)
                .shift(base::Datepart::Month, offset),
            'M' => today
                .shift(base::Datepart::Month, offset)
                .map(|dt| dt.last_of(base::Datepart::Month)),
            _ => None,
        }
        .ok_or(Self::Err::InvalidFirstChar)
    }
}

impl TryFrom<&str> for Date {
    type Error = <Self as std::str::FromStr>::Err;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse::<Self>()
    }
}
