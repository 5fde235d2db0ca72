use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

const NANOS_PER_SECOND: f64 = 1e9;
const FRACTION_DIGITS: usize = 9;

/// Offset from the start of a video, as reported by the service.
///
/// Mirrors `google.protobuf.Duration`: `seconds` and `nanos` share a sign.
/// On the wire it is a JSON string such as `"3.500s"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeOffset {
    pub seconds: i64,
    pub nanos: i32,
}

impl TimeOffset {
    pub fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.seconds as f64 + self.nanos as f64 / NANOS_PER_SECOND
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTimeOffsetError(String);

impl fmt::Display for ParseTimeOffsetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid duration '{}'", self.0)
    }
}

impl std::error::Error for ParseTimeOffsetError {}

impl FromStr for TimeOffset {
    type Err = ParseTimeOffsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseTimeOffsetError(s.to_string());
        let body = s.strip_suffix('s').ok_or_else(invalid)?;
        let (negative, body) = match body.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, body),
        };
        let (whole, fraction) = body.split_once('.').unwrap_or((body, ""));
        if whole.is_empty()
            || fraction.len() > FRACTION_DIGITS
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let seconds: i64 = whole.parse().map_err(|_| invalid())?;
        let nanos: i32 = if fraction.is_empty() {
            0
        } else {
            format!("{fraction:0<FRACTION_DIGITS$}")
                .parse()
                .map_err(|_| invalid())?
        };

        if negative {
            Ok(Self::new(-seconds, -nanos))
        } else {
            Ok(Self::new(seconds, nanos))
        }
    }
}

impl fmt::Display for TimeOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.seconds < 0 || self.nanos < 0 { "-" } else { "" };
        let seconds = self.seconds.unsigned_abs();
        let nanos = self.nanos.unsigned_abs();
        if nanos == 0 {
            write!(f, "{sign}{seconds}s")
        } else {
            let fraction = format!("{nanos:09}");
            write!(f, "{sign}{seconds}.{}s", fraction.trim_end_matches('0'))
        }
    }
}

impl Serialize for TimeOffset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOffset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OffsetVisitor;

        impl Visitor<'_> for OffsetVisitor {
            type Value = TimeOffset;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a duration string such as \"3.5s\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<TimeOffset, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(OffsetVisitor)
    }
}
