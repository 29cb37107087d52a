/// Substrings marking a command as likely to carry a credential
///
/// Matching is a case-insensitive substring test. This is a heuristic: it
/// catches `export API_KEY=...` and `mysql --password=...`, not every secret.
pub const DEFAULT_SENSITIVE_TERMS: &[&str] = &[
    "password",
    "passwd",
    "secret",
    "token",
    "api_key",
    "apikey",
    "api-key",
    "access_key",
    "private_key",
    "credential",
    "bearer ",
    "authorization:",
];

/// Denylist of credential-like substrings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensitiveFilter {
    /// Lowercased terms
    terms: Vec<String>,
}

impl Default for SensitiveFilter {
    fn default() -> Self {
        Self { terms: DEFAULT_SENSITIVE_TERMS.iter().map(|t| t.to_string()).collect() }
    }
}

impl SensitiveFilter {
    /// Extend the denylist with extra terms (blank terms are ignored)
    pub fn with_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for term in terms {
            let term = term.as_ref().trim().to_lowercase();
            if !term.is_empty() && !self.terms.contains(&term) {
                self.terms.push(term);
            }
        }
        self
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_sensitive(&self, command: &str) -> bool {
        let lowered = command.to_lowercase();
        self.terms.iter().any(|term| lowered.contains(term.as_str()))
    }
}

/// Check a command against [`DEFAULT_SENSITIVE_TERMS`]
pub fn is_sensitive(command: &str) -> bool {
    let lowered = command.to_lowercase();
    DEFAULT_SENSITIVE_TERMS.iter().any(|term| lowered.contains(term))
}
