/// Calendar unit an interval snaps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Datepart {
    Year,
    Month,
    Day,
}
