//! `serde` support.
//!
//! Identifiers and fragments are written as digit strings, dates as
//! `{ "year", "month", "day" }` objects and decoded records in the shape
//! callers render:
//!
//! ```json
//! { "identifier": "44051401458", "date": { "year": 1944, "month": 5, "day": 14 }, "sex": "male" }
//! ```
//!
//! Deserialisation re-validates everything, so a document can never produce a
//! value the constructors would reject.

use crate::{CalendarDate, DecodedPesel, Fragment, Pesel, Sex};
use core::{fmt, marker::PhantomData, str::FromStr};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

struct DigitsVisitor<T>(PhantomData<T>);

impl<T> de::Visitor<'_> for DigitsVisitor<T>
where
    T: FromStr<Err = crate::Error>,
{
    type Value = T;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a fixed-width string of decimal digits")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        v.parse().map_err(de::Error::custom)
    }
}

impl Serialize for Pesel {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pesel {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        d.deserialize_str(DigitsVisitor(PhantomData))
    }
}

impl Serialize for Fragment {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fragment {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        d.deserialize_str(DigitsVisitor(PhantomData))
    }
}

impl Serialize for Sex {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Sex {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        match raw.as_str() {
            "female" => Ok(Self::Female),
            "male" => Ok(Self::Male),
            other => Err(de::Error::unknown_variant(other, &["female", "male"])),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct DateWire {
    year: u16,
    month: u8,
    day: u8,
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        DateWire {
            year: self.year(),
            month: self.month(),
            day: self.day(),
        }
        .serialize(s)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let DateWire { year, month, day } = DateWire::deserialize(d)?;
        Self::new(year, month, day).map_err(de::Error::custom)
    }
}

#[derive(Serialize, Deserialize)]
struct DecodedWire {
    identifier: Pesel,
    date: CalendarDate,
    sex: Sex,
}

impl Serialize for DecodedPesel {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        DecodedWire {
            identifier: self.pesel,
            date: self.date,
            sex: self.sex,
        }
        .serialize(s)
    }
}

impl<'de> Deserialize<'de> for DecodedPesel {
    /// Decodes `identifier` and requires `date` and `sex` to agree with it.
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let wire = DecodedWire::deserialize(d)?;
        let decoded = wire.identifier.decode().map_err(de::Error::custom)?;
        if decoded.date != wire.date {
            return Err(de::Error::custom(format_args!(
                "date {} does not match identifier {}",
                wire.date, wire.identifier
            )));
        }
        if decoded.sex != wire.sex {
            return Err(de::Error::custom(format_args!(
                "sex {} does not match identifier {}",
                wire.sex, wire.identifier
            )));
        }
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoded_record_wire_shape() {
        let decoded = crate::validate("44051401458").unwrap();
        let json = serde_json::to_string(&decoded).unwrap();
        assert_eq!(
            json,
            r#"{"identifier":"44051401458","date":{"year":1944,"month":5,"day":14},"sex":"male"}"#
        );
        let back: DecodedPesel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, decoded);
    }

    #[test]
    fn rejects_inconsistent_record() {
        let json = r#"{"identifier":"44051401458","date":{"year":1944,"month":5,"day":15},"sex":"male"}"#;
        assert!(serde_json::from_str::<DecodedPesel>(json).is_err());
        let json = r#"{"identifier":"44051401458","date":{"year":1944,"month":5,"day":14},"sex":"female"}"#;
        assert!(serde_json::from_str::<DecodedPesel>(json).is_err());
    }

    #[test]
    fn rejects_invalid_scalars() {
        assert!(serde_json::from_str::<Pesel>(r#""4405140145""#).is_err());
        assert!(serde_json::from_str::<Fragment>(r#""0145x""#).is_err());
        assert!(serde_json::from_str::<Sex>(r#""other""#).is_err());
        assert!(
            serde_json::from_str::<CalendarDate>(r#"{"year":1900,"month":2,"day":29}"#).is_err()
        );
        assert_eq!(
            serde_json::from_str::<Fragment>(r#""01458""#).unwrap(),
            "01458".parse::<Fragment>().unwrap()
        );
    }
}
