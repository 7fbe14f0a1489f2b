// src/odata.rs
use crate::error::QueryError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Upper bound Microsoft Graph accepts for `$top`.
pub const MAX_PAGE_SIZE: u32 = 999;

/// OData query refinements understood by Microsoft Graph. Every field is
/// optional; absent fields contribute nothing to the outbound request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ODataQuery {
    /// Comma-separated field selection, e.g. "subject,start".
    #[serde(rename = "$select", default, skip_serializing_if = "Option::is_none")]
    pub select: Option<String>,
    /// Boolean filter expression, e.g. "isRead eq false".
    #[serde(rename = "$filter", default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Related entities to expand inline.
    #[serde(rename = "$expand", default, skip_serializing_if = "Option::is_none")]
    pub expand: Option<String>,
    /// Sort order, e.g. "receivedDateTime desc".
    #[serde(rename = "$orderby", default, skip_serializing_if = "Option::is_none")]
    pub orderby: Option<String>,
    /// Page size, 1 through 999.
    #[serde(rename = "$top", default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1, max = 999))]
    pub top: Option<u32>,
    /// Page offset.
    #[serde(rename = "$skip", default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    /// Free-text search expression.
    #[serde(rename = "$search", default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Whether to include a total count in collection responses.
    #[serde(rename = "$count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<bool>,
}

impl ODataQuery {
    pub fn validate(&self) -> Result<(), QueryError> {
        if let Some(top) = self.top {
            if top == 0 || top > MAX_PAGE_SIZE {
                return Err(QueryError::TopOutOfRange { max: MAX_PAGE_SIZE });
            }
        }
        Ok(())
    }

    /// Present fields as protocol query pairs. `$count` becomes the string
    /// literal "true"/"false"; numbers are rendered in decimal.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(v) = &self.select {
            pairs.push(("$select", v.clone()));
        }
        if let Some(v) = &self.filter {
            pairs.push(("$filter", v.clone()));
        }
        if let Some(v) = &self.expand {
            pairs.push(("$expand", v.clone()));
        }
        if let Some(v) = &self.orderby {
            pairs.push(("$orderby", v.clone()));
        }
        if let Some(v) = self.top {
            pairs.push(("$top", v.to_string()));
        }
        if let Some(v) = self.skip {
            pairs.push(("$skip", v.to_string()));
        }
        if let Some(v) = &self.search {
            pairs.push(("$search", v.clone()));
        }
        if let Some(v) = self.count {
            pairs.push(("$count", if v { "true" } else { "false" }.to_string()));
        }
        pairs
    }

    /// Encoded query string, or None when no field is present. Keys are the
    /// literal `$`-prefixed protocol names; values are percent-encoded.
    pub fn to_query_string(&self) -> Option<String> {
        let pairs = self.to_pairs();
        if pairs.is_empty() {
            return None;
        }
        let mut qs = String::new();
        for (key, value) in pairs {
            if !qs.is_empty() {
                qs.push('&');
            }
            qs.push_str(key);
            qs.push('=');
            qs.push_str(&urlencoding::encode(&value));
        }
        Some(qs)
    }
}

/// Per-request refinements a caller may attach to an operation: OData query
/// directives plus custom headers (which override the defaults by key).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GraphQueryOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<ODataQuery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
}

impl GraphQueryOptions {
    pub fn validate(&self) -> Result<(), QueryError> {
        match &self.query {
            Some(query) => query.validate(),
            None => Ok(()),
        }
    }

    /// Strict decode for a request body carrying query options. Unknown
    /// fields and out-of-range paging values are rejected; a null or absent
    /// body yields None. Host frameworks map the error to their own 400.
    pub fn from_json(body: Option<&serde_json::Value>) -> Result<Option<Self>, QueryError> {
        let Some(body) = body else {
            return Ok(None);
        };
        if body.is_null() {
            return Ok(None);
        }
        let options: Self = serde_json::from_value(body.clone())
            .map_err(|e| QueryError::Malformed(e.to_string()))?;
        options.validate()?;
        Ok(Some(options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_fields_contribute_nothing() {
        let query = ODataQuery::default();
        assert!(query.to_pairs().is_empty());
        assert_eq!(query.to_query_string(), None);
    }

    #[test]
    fn query_string_keeps_dollar_keys_and_encodes_values() {
        let query = ODataQuery {
            select: Some("subject,start".into()),
            top: Some(10),
            ..Default::default()
        };
        assert_eq!(
            query.to_query_string().unwrap(),
            "$select=subject%2Cstart&$top=10"
        );
    }

    #[test]
    fn count_renders_as_string_literal() {
        let query = ODataQuery {
            count: Some(true),
            ..Default::default()
        };
        assert_eq!(query.to_query_string().unwrap(), "$count=true");

        let query = ODataQuery {
            count: Some(false),
            ..Default::default()
        };
        assert_eq!(query.to_query_string().unwrap(), "$count=false");
    }

    #[test]
    fn top_bounds_are_enforced() {
        let ok = ODataQuery {
            top: Some(999),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        for bad in [0, 1000] {
            let query = ODataQuery {
                top: Some(bad),
                ..Default::default()
            };
            assert_eq!(
                query.validate(),
                Err(QueryError::TopOutOfRange { max: MAX_PAGE_SIZE })
            );
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let body = json!({ "query": { "$limit": 5 } });
        assert!(GraphQueryOptions::from_json(Some(&body)).is_err());

        let body = json!({ "pagination": {} });
        assert!(GraphQueryOptions::from_json(Some(&body)).is_err());
    }

    #[test]
    fn from_json_accepts_null_and_valid_bodies() {
        assert_eq!(GraphQueryOptions::from_json(None).unwrap(), None);
        assert_eq!(
            GraphQueryOptions::from_json(Some(&serde_json::Value::Null)).unwrap(),
            None
        );

        let body = json!({ "query": { "$top": 10, "$select": "subject" } });
        let options = GraphQueryOptions::from_json(Some(&body)).unwrap().unwrap();
        let query = options.query.unwrap();
        assert_eq!(query.top, Some(10));
        assert_eq!(query.select.as_deref(), Some("subject"));
    }

    #[test]
    fn from_json_rejects_out_of_range_top() {
        let body = json!({ "query": { "$top": 1000 } });
        assert!(GraphQueryOptions::from_json(Some(&body)).is_err());
    }
}
