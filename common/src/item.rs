use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: u64,
    pub item_name: String,
    pub price: Option<i32>,
    pub quantity: Option<i32>,
}

impl Item {
    pub fn new(item_name: impl Into<String>, price: i32, quantity: i32) -> Self {
        Self {
            id: 0,
            item_name: item_name.into(),
            price: Some(price),
            quantity: Some(quantity),
        }
    }

    /// `price * quantity`, widened so large inputs cannot overflow.
    pub fn total_price(&self) -> Option<i64> {
        match (self.price, self.quantity) {
            (Some(price), Some(quantity)) => Some(i64::from(price) * i64::from(quantity)),
            _ => None,
        }
    }
}

/// Payload accepted by the item registration API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSaveForm {
    #[serde(default)]
    pub item_name: String,
    pub price: Option<i32>,
    pub quantity: Option<i32>,
}

impl From<ItemSaveForm> for Item {
    fn from(form: ItemSaveForm) -> Self {
        Item {
            id: 0,
            item_name: form.item_name,
            price: form.price,
            quantity: form.quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_price() {
        assert_eq!(Item::new("itemA", 10_000, 10).total_price(), Some(100_000));

        let partial = Item {
            price: Some(1000),
            ..Default::default()
        };
        assert_eq!(partial.total_price(), None);
    }

    #[test]
    fn test_total_price_does_not_overflow() {
        let item = Item::new("big", i32::MAX, i32::MAX);
        assert_eq!(
            item.total_price(),
            Some(i64::from(i32::MAX) * i64::from(i32::MAX))
        );
    }

    #[test]
    fn test_save_form_uses_camel_case() {
        let form: ItemSaveForm =
            serde_json::from_str(r#"{"itemName":"hello","price":1000,"quantity":10}"#).unwrap();
        let item = Item::from(form);

        assert_eq!(item.item_name, "hello");
        assert_eq!(item.price, Some(1000));
        assert_eq!(item.quantity, Some(10));
    }
}
