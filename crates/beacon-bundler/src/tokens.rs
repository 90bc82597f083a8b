//! Template tokens shared by the shell generator and whatever renders the shell.
//!
//! The four markers below are a frozen contract with the backend's template
//! engine. They are emitted verbatim into `index.html` and replaced by naive
//! string substitution at request time. Adding a marker here without a
//! matching rule in the backend is an integration error.

use std::fmt;

/// Placeholder embedded in the HTML shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateToken {
    /// Display name of the server.
    Name,
    /// Per-request CSP nonce.
    Nonce,
    /// Serialized public server configuration.
    ServerConfigJson,
    /// Serialized live status.
    StatusJson,
}

impl TemplateToken {
    /// Every token, in the order they appear in the shell.
    pub const ALL: [TemplateToken; 4] = [
        TemplateToken::Name,
        TemplateToken::Nonce,
        TemplateToken::ServerConfigJson,
        TemplateToken::StatusJson,
    ];

    /// Literal marker written into the shell.
    pub const fn literal(self) -> &'static str {
        match self {
            TemplateToken::Name => "{{.Name}}",
            TemplateToken::Nonce => "{{.Nonce}}",
            TemplateToken::ServerConfigJson => "{{.ServerConfigJSON}}",
            TemplateToken::StatusJson => "{{.StatusJSON}}",
        }
    }
}

impl fmt::Display for TemplateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

/// One value per token.
///
/// Substitution only happens through this type, so every token in the shell
/// has exactly one rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenValues {
    pub name: String,
    pub nonce: String,
    pub server_config_json: String,
    pub status_json: String,
}

impl TokenValues {
    /// Value bound to `token`.
    pub fn get(&self, token: TemplateToken) -> &str {
        match token {
            TemplateToken::Name => &self.name,
            TemplateToken::Nonce => &self.nonce,
            TemplateToken::ServerConfigJson => &self.server_config_json,
            TemplateToken::StatusJson => &self.status_json,
        }
    }

    /// Replace every token marker in `template` with its value.
    ///
    /// Markers are located in the original template only, so a value that
    /// itself contains a marker is never expanded a second time.
    pub fn apply(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len() + 256);
        let mut rest = template;

        while let Some((pos, token)) = next_token(rest) {
            out.push_str(&rest[..pos]);
            out.push_str(self.get(token));
            rest = &rest[pos + token.literal().len()..];
        }

        out.push_str(rest);
        out
    }
}

/// Earliest token marker in `haystack`.
fn next_token(haystack: &str) -> Option<(usize, TemplateToken)> {
    TemplateToken::ALL
        .iter()
        .filter_map(|token| haystack.find(token.literal()).map(|pos| (pos, *token)))
        .min_by_key(|(pos, _)| *pos)
}

/// Count how often `token` occurs in `html`.
pub fn occurrences(html: &str, token: TemplateToken) -> usize {
    html.matches(token.literal()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> TokenValues {
        TokenValues {
            name: "Test Stream".into(),
            nonce: "n0nce".into(),
            server_config_json: r#"{"name":"Test Stream"}"#.into(),
            status_json: r#"{"online":false}"#.into(),
        }
    }

    #[test]
    fn test_literals_are_frozen() {
        assert_eq!(TemplateToken::Name.literal(), "{{.Name}}");
        assert_eq!(TemplateToken::Nonce.literal(), "{{.Nonce}}");
        assert_eq!(
            TemplateToken::ServerConfigJson.literal(),
            "{{.ServerConfigJSON}}"
        );
        assert_eq!(TemplateToken::StatusJson.literal(), "{{.StatusJSON}}");
    }

    #[test]
    fn test_apply_replaces_all_tokens() {
        let template = "<title>{{.Name}}</title><script nonce=\"{{.Nonce}}\">a={{.ServerConfigJSON}};b={{.StatusJSON}}</script>";
        let html = values().apply(template);
        assert_eq!(
            html,
            "<title>Test Stream</title><script nonce=\"n0nce\">a={\"name\":\"Test Stream\"};b={\"online\":false}</script>"
        );
    }

    #[test]
    fn test_apply_does_not_touch_partial_markers() {
        let template = "{{.Nam}} {{ .Name }} {{.NameX}}";
        let html = values().apply(template);
        assert_eq!(html, template);
    }

    #[test]
    fn test_apply_does_not_expand_values() {
        let mut values = values();
        values.name = "{{.Nonce}}".into();
        let html = values.apply("{{.Name}}|{{.Nonce}}");
        assert_eq!(html, "{{.Nonce}}|n0nce");
    }

    #[test]
    fn test_apply_without_tokens_is_identity() {
        let template = "<html><body>{{ not a token }}</body></html>";
        assert_eq!(values().apply(template), template);
    }

    #[test]
    fn test_occurrences() {
        assert_eq!(occurrences("{{.Name}}{{.Name}}", TemplateToken::Name), 2);
        assert_eq!(occurrences("", TemplateToken::StatusJson), 0);
    }
}
