use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CoreError;

/// Time-ordered identifiers rendered as `<prefix>-<uuid>`.
macro_rules! prefixed_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), &self.0.to_string()[..8])
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s
                    .strip_prefix($prefix)
                    .and_then(|rest| rest.strip_prefix('-'))
                    .ok_or_else(|| {
                        CoreError::InvalidData(format!("{} missing `{}-` prefix: {s}", stringify!($name), $prefix))
                    })?;
                let uuid = Uuid::parse_str(raw)
                    .map_err(|e| CoreError::InvalidData(format!("{}: {e}", stringify!($name))))?;
                Ok(Self(uuid))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

prefixed_id!(OrderId, "order");
prefixed_id!(NotificationId, "toast");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_display_parse() {
        let id = OrderId::new();
        let rendered = id.to_string();
        assert!(rendered.starts_with("order-"));
        let parsed: OrderId = rendered.parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn wrong_prefix_rejected() {
        let id = NotificationId::new();
        let err = id.to_string().replace("toast-", "order-").parse::<NotificationId>();
        assert!(err.is_err());
        assert!("order-not-a-uuid".parse::<OrderId>().is_err());
    }
}
