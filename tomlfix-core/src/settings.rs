//! Clap-free settings for a transform pass.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Settings for [`Transformer`](crate::Transformer).
#[derive(Debug, Clone)]
pub struct TransformSettings {
    /// Worker threads. `0` lets rayon pick (one per core).
    pub jobs: usize,

    /// Compute everything, write nothing.
    pub dry_run: bool,

    // Policy: glob patterns (`*`, `?`) over rule ids.
    pub allow: Vec<String>,
    pub deny: Vec<String>,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            jobs: 0,
            dry_run: true,
            allow: Vec::new(),
            deny: Vec::new(),
        }
    }
}

impl TransformSettings {
    /// `true` when `rule_id` passes the allow/deny policy. Deny wins; an empty allow list allows
    /// everything.
    pub fn permits(&self, rule_id: &str) -> bool {
        if self.deny.iter().any(|pat| glob_match(pat, rule_id)) {
            return false;
        }
        self.allow.is_empty() || self.allow.iter().any(|pat| glob_match(pat, rule_id))
    }
}

/// Cooperative cancellation, observed between documents.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

fn glob_match(pat: &str, text: &str) -> bool {
    let p = pat.as_bytes();
    let t = text.as_bytes();
    let mut dp = vec![vec![false; t.len() + 1]; p.len() + 1];
    dp[0][0] = true;

    for i in 1..=p.len() {
        if p[i - 1] == b'*' {
            dp[i][0] = dp[i - 1][0];
        }
    }

    for i in 1..=p.len() {
        for j in 1..=t.len() {
            dp[i][j] = match p[i - 1] {
                b'*' => dp[i - 1][j] || dp[i][j - 1],
                b'?' => dp[i - 1][j - 1],
                c => dp[i - 1][j - 1] && c == t[j - 1],
            };
        }
    }

    dp[p.len()][t.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_match_handles_star_and_question() {
        assert!(glob_match("toml.*", "toml.truthy"));
        assert!(glob_match("*", "cargo.edition"));
        assert!(!glob_match("toml.?", "toml.truthy"));
        assert!(glob_match("cargo.editio?", "cargo.edition"));
        assert!(!glob_match("cargo.*", "toml.key-case"));
    }

    #[test]
    fn deny_beats_allow() {
        let settings = TransformSettings {
            allow: vec!["toml.*".into()],
            deny: vec!["toml.sorted-keys".into()],
            ..TransformSettings::default()
        };
        assert!(settings.permits("toml.truthy"));
        assert!(!settings.permits("toml.sorted-keys"));
        assert!(!settings.permits("cargo.edition"));
    }

    #[test]
    fn empty_policy_permits_everything() {
        assert!(TransformSettings::default().permits("anything.at-all"));
    }

    #[test]
    fn cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
