use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::{
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueRef},
    Decode, Postgres, Type, ValueRef,
};
use std::fmt;
use time::{macros::format_description, Date, Month};

static WIRE_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(0[1-9]|1[0-2])-([0-9]{4})$").expect("Failed to compile MM-YYYY pattern")
});

/// Calendar month of a given year.
///
/// Travels over the wire as `MM-YYYY` and is stored as a `DATE` pinned to the
/// first day of the month, so two values built from different sources compare
/// equal whenever they name the same month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthYear(Date);

/// A month as it comes back from the database.
#[derive(Debug)]
pub enum StoredDate<'a> {
    Native(Date),
    Text(&'a str),
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum MonthYearError {
    #[error("invalid date format (expected MM-YYYY): `{0}`")]
    Format(String),
    #[error("cannot read `{0}` as a stored month")]
    TypeMismatch(String),
}

impl MonthYear {
    pub fn new(year: i32, month: Month) -> Result<Self, MonthYearError> {
        Date::from_calendar_date(year, month, 1)
            .map(Self)
            .map_err(|e| MonthYearError::Format(e.to_string()))
    }

    pub fn parse_wire(s: &str) -> Result<Self, MonthYearError> {
        let format_error = || MonthYearError::Format(s.to_owned());
        let captures = WIRE_FORMAT.captures(s).ok_or_else(format_error)?;

        let month = captures[1]
            .parse::<u8>()
            .ok()
            .and_then(|month| Month::try_from(month).ok())
            .ok_or_else(format_error)?;
        let year = captures[2].parse::<i32>().map_err(|_| format_error())?;

        Self::new(year, month)
    }

    pub fn to_wire(&self) -> String {
        format!("{:02}-{:04}", u8::from(self.0.month()), self.0.year())
    }

    pub fn from_storage(value: StoredDate<'_>) -> Result<Self, MonthYearError> {
        let date = match value {
            StoredDate::Native(date) => date,
            StoredDate::Text(s) => Date::parse(s, format_description!("[year]-[month]-[day]"))
                .map_err(|_| MonthYearError::TypeMismatch(s.to_owned()))?,
        };

        Self::new(date.year(), date.month())
            .map_err(|e| MonthYearError::TypeMismatch(e.to_string()))
    }

    pub fn to_storage(&self) -> Date {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> Month {
        self.0.month()
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl Serialize for MonthYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire())
    }
}

impl<'de> Deserialize<'de> for MonthYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_wire(&s).map_err(de::Error::custom)
    }
}

impl Type<Postgres> for MonthYear {
    fn type_info() -> PgTypeInfo {
        <Date as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <Date as Type<Postgres>>::compatible(ty) || <&str as Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for MonthYear {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let type_info = value.type_info().into_owned();

        let stored = if <Date as Type<Postgres>>::compatible(&type_info) {
            StoredDate::Native(<Date as Decode<Postgres>>::decode(value)?)
        } else if <&str as Type<Postgres>>::compatible(&type_info) {
            StoredDate::Text(<&str as Decode<Postgres>>::decode(value)?)
        } else {
            return Err(MonthYearError::TypeMismatch(type_info.to_string()).into());
        };

        Self::from_storage(stored).map_err(|e| e.into())
    }
}
