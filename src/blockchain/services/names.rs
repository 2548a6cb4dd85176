use anyhow::Result;
use serde_json::{json, Value};

use crate::blockchain::client::{BackendRouter, Capability};

/// A SuiNS lookup in either direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameQuery {
    /// `example.sui` to its target address.
    Forward(String),
    /// An address to the names pointing at it.
    Reverse(String),
}

impl NameQuery {
    /// `name` wins when both are given; blank values count as absent.
    pub fn from_args(name: Option<String>, address: Option<String>) -> Option<Self> {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        present(name)
            .map(NameQuery::Forward)
            .or_else(|| present(address).map(NameQuery::Reverse))
    }
}

pub async fn resolve(router: &BackendRouter, query: &NameQuery) -> Result<Value> {
    let backend = router.backend(Capability::NameService);
    match query {
        NameQuery::Forward(name) => {
            let address = backend.resolve_name_address(name).await?;
            Ok(json!({ "name": name, "address": address }))
        }
        NameQuery::Reverse(address) => {
            let page = backend.resolve_address_names(address).await?;
            let names = match page.get("data") {
                Some(Value::Array(names)) => Value::Array(names.clone()),
                _ => json!([]),
            };
            Ok(json!({ "address": address, "names": names }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_direction_from_arguments() {
        assert_eq!(
            NameQuery::from_args(Some("demo.sui".into()), Some("0x1".into())),
            Some(NameQuery::Forward("demo.sui".into()))
        );
        assert_eq!(
            NameQuery::from_args(Some("  ".into()), Some("0x1".into())),
            Some(NameQuery::Reverse("0x1".into()))
        );
        assert_eq!(NameQuery::from_args(None, None), None);
    }
}
