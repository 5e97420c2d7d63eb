use super::builtin::OTHER;
use super::rules::{KEYWORD_RULES, KeywordRule};

/// Keyword-driven automatic categorization of applications
#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    rules: &'static [KeywordRule],
}

impl Default for Classifier {
    fn default() -> Self {
        Self::with_rules(KEYWORD_RULES)
    }
}

impl Classifier {
    pub fn with_rules(rules: &'static [KeywordRule]) -> Self {
        Self { rules }
    }

    /// Return the category key for an application.
    ///
    /// Rules are evaluated in table order and the first match wins, so an app
    /// matching several groups lands in the earliest one. Falls back to
    /// `"other"` when nothing matches.
    pub fn classify(&self, name: &str, path: &str) -> &'static str {
        let name = name.to_lowercase();
        let path = path.to_lowercase();

        self.rules
            .iter()
            .find(|rule| rule.matches(&name, &path))
            .map(|rule| rule.key)
            .unwrap_or(OTHER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(name: &str, path: &str) -> &'static str {
        Classifier::default().classify(name, path)
    }

    #[test]
    fn test_browsers_win_over_productivity() {
        assert_eq!(classify("Safari", "/Applications/Safari.app"), "browsers");
        assert_eq!(
            classify("Google Chrome", "/Applications/Google Chrome.app"),
            "browsers"
        );
        // "notes" is a productivity keyword, but browsers are checked first
        assert_eq!(classify("Firefox Notes", "/Applications/Firefox Notes.app"), "browsers");
    }

    #[test]
    fn test_design_wins_over_development() {
        assert_eq!(classify("Figma", "/Applications/Figma.app"), "design");
        assert_eq!(
            classify("Figma Code Connect", "/Applications/Figma Code Connect.app"),
            "design"
        );
    }

    #[test]
    fn test_common_apps() {
        assert_eq!(classify("Xcode", "/Applications/Xcode.app"), "development");
        assert_eq!(
            classify("Visual Studio Code", "/Applications/Visual Studio Code.app"),
            "development"
        );
        assert_eq!(classify("Spotify", "/Applications/Spotify.app"), "media");
        assert_eq!(classify("Slack", "/Applications/Slack.app"), "social");
        assert_eq!(classify("Anki", "/Applications/Anki.app"), "education");
        assert_eq!(classify("Notion", "/Applications/Notion.app"), "productivity");
        assert_eq!(classify("Steam", "/Applications/Steam.app"), "games");
    }

    #[test]
    fn test_path_rules() {
        assert_eq!(
            classify("Grapher", "/System/Applications/Utilities/Grapher.app"),
            "utilities"
        );
        assert_eq!(
            classify("Solitaire", "/Applications/Games/Solitaire.app"),
            "games"
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("XCODE", "/Applications/XCODE.app"), "development");
        assert_eq!(classify("sPoTiFy", "/Applications/x.app"), "media");
    }

    #[test]
    fn test_fallback_is_other() {
        assert_eq!(classify("Zzz", "/Applications/Zzz.app"), "other");
        assert_eq!(classify("", ""), "other");
    }

    #[test]
    fn test_custom_rules() {
        static RULES: &[KeywordRule] = &[KeywordRule {
            key: "custom",
            name_keywords: &["zzz"],
            path_keywords: &[],
        }];
        let classifier = Classifier::with_rules(RULES);
        assert_eq!(classifier.classify("Zzz", "/x"), "custom");
        assert_eq!(classifier.classify("Safari", "/x"), "other");
    }
}
