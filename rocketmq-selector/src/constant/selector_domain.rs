// Copyright 2023 The RocketMQ Rust Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// The selector language a selector string was written in.
///
/// The domain picks the parser used to turn selector text into a tree and is
/// recorded on every identifier so a binding knows how to look the field up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SelectorDomain {
    /// JMS message selectors over header fields and properties.
    #[default]
    #[serde(alias = "JMS")]
    Jms,
    /// Selectors over the full message, including system fields.
    #[serde(alias = "SIMESSAGE")]
    SiMessage,
    /// XPath 1.0 predicates over a message body.
    #[serde(alias = "XPATH1")]
    XPath1,
}

impl SelectorDomain {
    pub fn name(self) -> &'static str {
        match self {
            SelectorDomain::Jms => "JMS",
            SelectorDomain::SiMessage => "SIMESSAGE",
            SelectorDomain::XPath1 => "XPATH1",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn get_by_name(name: &str) -> Option<Self> {
        [SelectorDomain::Jms, SelectorDomain::SiMessage, SelectorDomain::XPath1]
            .into_iter()
            .find(|domain| domain.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for SelectorDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_by_name_is_case_insensitive() {
        assert_eq!(SelectorDomain::get_by_name("jms"), Some(SelectorDomain::Jms));
        assert_eq!(SelectorDomain::get_by_name("XPath1"), Some(SelectorDomain::XPath1));
        assert_eq!(SelectorDomain::get_by_name("SQL92"), None);
    }

    #[test]
    fn test_default_domain_is_jms() {
        assert_eq!(SelectorDomain::default(), SelectorDomain::Jms);
        assert_eq!(SelectorDomain::SiMessage.to_string(), "SIMESSAGE");
    }

    #[test]
    fn test_serde_accepts_upper_case_alias() {
        let domain: SelectorDomain = serde_json::from_str("\"XPATH1\"").unwrap();
        assert_eq!(domain, SelectorDomain::XPath1);
        let domain: SelectorDomain = serde_json::from_str("\"SiMessage\"").unwrap();
        assert_eq!(domain, SelectorDomain::SiMessage);
    }
}
