use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Postal address value. Immutable once built; members and deliveries embed
/// it as `city`/`street`/`zipcode` columns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Address {
    pub city: String,
    pub street: String,
    pub zipcode: String,
}

impl Address {
    pub fn new(
        city: impl Into<String>,
        street: impl Into<String>,
        zipcode: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            street: street.into(),
            zipcode: zipcode.into(),
        }
    }

    /// `None` when every column is null.
    pub fn from_columns(
        city: Option<&str>,
        street: Option<&str>,
        zipcode: Option<&str>,
    ) -> Option<Self> {
        if city.is_none() && street.is_none() && zipcode.is_none() {
            return None;
        }
        Some(Self::new(
            city.unwrap_or_default(),
            street.unwrap_or_default(),
            zipcode.unwrap_or_default(),
        ))
    }

    pub fn into_columns(address: Option<Self>) -> (Option<String>, Option<String>, Option<String>) {
        match address {
            Some(Self {
                city,
                street,
                zipcode,
            }) => (Some(city), Some(street), Some(zipcode)),
            None => (None, None, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_columns_still_form_an_address() {
        let address = Address::from_columns(Some("Seoul"), None, Some("1111")).unwrap();
        assert_eq!(address, Address::new("Seoul", "", "1111"));
    }

    #[test]
    fn all_null_columns_mean_no_address() {
        assert_eq!(Address::from_columns(None, None, None), None);
        assert_eq!(Address::into_columns(None), (None, None, None));
    }
}
