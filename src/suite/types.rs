use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const DEFAULT_METHOD: &str = "GET";
const DEFAULT_STATUS_CODE: u16 = 200;

fn default_method() -> String {
    DEFAULT_METHOD.to_owned()
}

const fn default_status_code() -> u16 {
    DEFAULT_STATUS_CODE
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Suite {
    #[serde(default)]
    pub name: String,
    /// Initial data context shared by every case of the suite.
    #[serde(default)]
    pub vars: Map<String, Value>,
    #[serde(default, alias = "cases")]
    pub items: Vec<TestCase>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub name: String,
    #[serde(default)]
    pub request: Request,
    #[serde(default)]
    pub expect: Expect,
    #[serde(default)]
    pub prepare: Prepare,
    #[serde(default)]
    pub clean: Clean,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(default = "default_method")]
    pub method: String,
    /// URL template.
    pub api: String,
    #[serde(default, alias = "headers")]
    pub header: BTreeMap<String, String>,
    #[serde(default)]
    pub body: String,
    #[serde(default, alias = "body_from_file", skip_serializing_if = "Option::is_none")]
    pub body_from_file: Option<PathBuf>,
    #[serde(default)]
    pub form: BTreeMap<String, String>,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            method: default_method(),
            api: String::new(),
            header: BTreeMap::new(),
            body: String::new(),
            body_from_file: None,
            form: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expect {
    #[serde(default = "default_status_code", alias = "status_code", alias = "status")]
    pub status_code: u16,
    #[serde(default, alias = "headers")]
    pub header: BTreeMap<String, String>,
    #[serde(default)]
    pub body: String,
    /// Slash-delimited field paths mapped to the expected scalar value.
    #[serde(default, alias = "body_fields_expect")]
    pub body_fields_expect: BTreeMap<String, Value>,
    #[serde(default)]
    pub verify: Vec<String>,
}

impl Default for Expect {
    fn default() -> Self {
        Self {
            status_code: DEFAULT_STATUS_CODE,
            header: BTreeMap::new(),
            body: String::new(),
            body_fields_expect: BTreeMap::new(),
            verify: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Prepare {
    /// Manifests applied in order before the run.
    #[serde(default)]
    pub kubernetes: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Clean {
    #[serde(default, alias = "clean_prepare")]
    pub clean_prepare: bool,
}

impl TestCase {
    #[must_use]
    pub fn needs_cleanup(&self) -> bool {
        self.clean.clean_prepare && !self.prepare.kubernetes.is_empty()
    }
}
