use crate::base;

/// A point in time, always held in UTC.
///
/// Parsing is lenient about what the extraction model and the record store
/// hand back: RFC 3339 with any offset, a naive date-time (assumed UTC) or a
/// bare date (midnight UTC).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(time::OffsetDateTime);

impl Timestamp {
    /// Returns the current time, truncated to whole seconds.
    #[cfg(not(test))]
    pub fn now() -> Self {
        let now = time::OffsetDateTime::now_utc();
        Self(now.replace_nanosecond(0).unwrap_or(now))
    }

    /// Returns the current time.
    #[cfg(test)]
    pub fn now() -> Self {
        Self(time::macros::datetime!(2026-03-30 12:00 UTC))
    }

    pub fn date(self) -> base::Date {
        base::Date::clamped(self.0.date())
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u8 {
        self.0.month() as u8
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .0
            .format(&time::format_description::well_known::Rfc3339)
            .map_err(|_| std::fmt::Error)?;
        f.pad(&s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized timestamp '{0}'")]
pub struct ParseError(String);

impl std::str::FromStr for Timestamp {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(odt) =
            time::OffsetDateTime::parse(trimmed, &time::format_description::well_known::Rfc3339)
        {
            // RFC 3339 output only covers four-digit years.
            return odt
                .checked_to_offset(time::UtcOffset::UTC)
                .filter(|utc| (0..=9999).contains(&utc.year()))
                .map(Self)
                .ok_or_else(|| ParseError(s.to_string()));
        }

        let naive = if trimmed.len() > 10 && trimmed.as_bytes()[10] == b' ' {
            format!("{}T{}", &trimmed[..10], &trimmed[11..])
        } else {
            trimmed.to_string()
        };
        let fmt = time::macros::format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
        );
        if let Ok(pdt) = time::PrimitiveDateTime::parse(&naive, fmt) {
            return Ok(Self(pdt.assume_utc()));
        }

        let fmt = time::macros::format_description!("[year]-[month]-[day]");
        time::Date::parse(trimmed, fmt)
            .map(|d| Self(d.midnight().assume_utc()))
            .map_err(|_| ParseError(s.to_string()))
    }
}

impl TryFrom<&str> for Timestamp {
    type Error = <Self as std::str::FromStr>::Err;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse::<Self>()
    }
}

impl TryFrom<String> for Timestamp {
    type Error = <Self as std::str::FromStr>::Err;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse::<Self>()
    }
}

impl From<Timestamp> for String {
    fn from(value: Timestamp) -> Self {
        value.to_string()
    }
}
