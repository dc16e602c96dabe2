use crate::entities::OrderStatus;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// Filter for the order list: member-name substring and/or status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSearch {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub member_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub order_status: Option<OrderStatus>,
}

impl OrderSearch {
    pub fn member_name(&self) -> Option<&str> {
        self.member_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// HTML forms submit unselected options as empty strings.
fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_mean_no_filter() {
        let search: OrderSearch =
            serde_json::from_str(r#"{"memberName":"  ","orderStatus":""}"#).unwrap();
        assert_eq!(search.member_name(), None);
        assert_eq!(search.order_status, None);
    }

    #[test]
    fn status_is_parsed_from_its_wire_name() {
        let search: OrderSearch =
            serde_json::from_str(r#"{"memberName":"user","orderStatus":"CANCEL"}"#).unwrap();
        assert_eq!(search.member_name(), Some("user"));
        assert_eq!(search.order_status, Some(OrderStatus::Cancel));
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<OrderSearch>(r#"{"orderStatus":"SHIPPED"}"#).is_err());
    }
}
