//! Common test utilities for query and response tests

#![allow(dead_code)]

use endeca_client_rs::{ClientConfig, EndecaClient};
use serde_json::Value;

/// A small search response with one record and one dimension
pub const SEARCH_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Response>
  <RecordsSet>
    <TotalRecordCount>1</TotalRecordCount>
    <Record>
      <RecordId>1001</RecordId>
      <Name>Trail boot</Name>
    </Record>
  </RecordsSet>
  <Dimensions>
    <Dimension id="4000">
      <DimensionName>Color</DimensionName>
      <DimensionValues>
        <DimensionValue><Name>Brown</Name><Count>1</Count></DimensionValue>
      </DimensionValues>
    </Dimension>
  </Dimensions>
</Response>"#;

/// Client pointing at `api` with the given default query options
pub fn create_test_client(api: &str, defaults: Value) -> EndecaClient {
    let config = ClientConfig::new(api)
        .with_user_agent("endeca-client-tests")
        .with_default_query_options(defaults);
    EndecaClient::new(config).expect("Failed to create test client")
}

/// Ordered names of the root's child elements of a rendered document
pub fn root_children(document: &str) -> Vec<String> {
    let document = endeca_client_rs::XmlDocument::parse(document.as_bytes())
        .unwrap_or_else(|e| panic!("Rendered document is not well-formed: {e}\n{document}"));
    document
        .root()
        .children()
        .map(|child| child.name().to_string())
        .collect()
}
