use regex::Regex;
use std::sync::LazyLock;

/// A compiled secret detection pattern.
///
/// Each pattern is a `LazyLock<Option<Regex>>` so a malformed regex fails
/// once at first use rather than at startup. Covers provider API keys,
/// generic `key=value` secrets, bearer tokens, and passwords. PII and
/// connection-string categories are out of scope for this component.
pub struct SecretPattern {
    pub name: &'static str,
    pub regex: &'static LazyLock<Option<Regex>>,
    pub placeholder: &'static str,
}

macro_rules! secret_pattern {
    ($name:ident, $regex_str:expr) => {
        static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

secret_pattern!(RE_AWS_ACCESS_KEY, r"\bAKIA[0-9A-Z]{16}\b");
secret_pattern!(
    RE_AWS_SECRET_KEY,
    r#"(?i)(?:aws_secret_access_key|aws_secret)\s*[=:]\s*['"]?([A-Za-z0-9/+=]{40})['"]?"#
);
secret_pattern!(
    RE_JWT,
    r"\beyJ[A-Za-z0-9_-]{10,}\.[A-Za-z0-9_-]{10,}\.[A-Za-z0-9_-]{10,}\b"
);
secret_pattern!(
    RE_PRIVATE_KEY,
    r"-----BEGIN (?:RSA |EC |DSA |OPENSSH )?PRIVATE KEY-----"
);
secret_pattern!(
    RE_PASSWORD_ASSIGN,
    r#"(?i)(?:password|passwd|pwd)\s*[=:]\s*['"][^'"]{4,}['"]"#
);
secret_pattern!(
    RE_GENERIC_API_KEY,
    r#"(?i)(?:api[_-]?key|apikey)\s*[=:]\s*['"]?[A-Za-z0-9_\-]{16,}['"]?"#
);
secret_pattern!(
    RE_GENERIC_SECRET,
    r#"(?i)(?:secret|token|auth_token|access_token)\s*[=:]\s*['"]?[A-Za-z0-9_\-]{16,}['"]?"#
);
secret_pattern!(
    RE_BEARER_TOKEN,
    r"(?i)\bbearer\s+[A-Za-z0-9_\-\.=]{16,}\b"
);
secret_pattern!(RE_GITHUB_PAT, r"\bghp_[A-Za-z0-9]{36}\b");
secret_pattern!(RE_GITHUB_OAUTH, r"\bgho_[A-Za-z0-9]{36}\b");
secret_pattern!(RE_SLACK_BOT, r"\bxox[bp]-[0-9]{10,}-[0-9]{10,}-[A-Za-z0-9]{24}\b");
secret_pattern!(
    RE_STRIPE_SECRET,
    r"\bsk_(?:live|test)_[A-Za-z0-9]{24,}\b"
);
secret_pattern!(RE_GCP_API_KEY, r"\bAIza[0-9A-Za-z_-]{35}\b");
secret_pattern!(RE_NPM_TOKEN, r"\bnpm_[A-Za-z0-9]{36}\b");

/// All secret patterns in detection order, longest/most-specific first so
/// overlap resolution prefers the more specific match.
pub fn default_patterns() -> Vec<SecretPattern> {
    vec![
        SecretPattern { name: "private_key", regex: &RE_PRIVATE_KEY, placeholder: "[PRIVATE_KEY]" },
        SecretPattern { name: "aws_access_key", regex: &RE_AWS_ACCESS_KEY, placeholder: "[AWS_KEY]" },
        SecretPattern { name: "aws_secret_key", regex: &RE_AWS_SECRET_KEY, placeholder: "[AWS_SECRET]" },
        SecretPattern { name: "jwt", regex: &RE_JWT, placeholder: "[JWT]" },
        SecretPattern { name: "github_pat", regex: &RE_GITHUB_PAT, placeholder: "[GITHUB_TOKEN]" },
        SecretPattern { name: "github_oauth", regex: &RE_GITHUB_OAUTH, placeholder: "[GITHUB_TOKEN]" },
        SecretPattern { name: "slack_token", regex: &RE_SLACK_BOT, placeholder: "[SLACK_TOKEN]" },
        SecretPattern { name: "stripe_secret", regex: &RE_STRIPE_SECRET, placeholder: "[STRIPE_KEY]" },
        SecretPattern { name: "gcp_api_key", regex: &RE_GCP_API_KEY, placeholder: "[GCP_KEY]" },
        SecretPattern { name: "npm_token", regex: &RE_NPM_TOKEN, placeholder: "[NPM_TOKEN]" },
        SecretPattern { name: "bearer_token", regex: &RE_BEARER_TOKEN, placeholder: "[BEARER_TOKEN]" },
        SecretPattern { name: "password_assign", regex: &RE_PASSWORD_ASSIGN, placeholder: "[PASSWORD]" },
        SecretPattern { name: "generic_api_key", regex: &RE_GENERIC_API_KEY, placeholder: "[API_KEY]" },
        SecretPattern { name: "generic_secret", regex: &RE_GENERIC_SECRET, placeholder: "[SECRET]" },
    ]
}
