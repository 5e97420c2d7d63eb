//! Keyword rules used for automatic categorization.
//!
//! The table is ordered by priority: the first rule with a matching keyword
//! wins. Browsers come before productivity so "Safari" and "Chrome" never end
//! up there, and design comes before development so "Figma" is not caught by
//! "code"-like keywords.

use super::builtin::{
    BROWSERS, DESIGN, DEVELOPMENT, EDUCATION, GAMES, MEDIA, PRODUCTIVITY, SOCIAL, UTILITIES,
};

/// One classification rule. Keywords are lower-case substrings.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub key: &'static str,
    /// Matched against the lower-cased application name
    pub name_keywords: &'static [&'static str],
    /// Matched against the lower-cased application path
    pub path_keywords: &'static [&'static str],
}

impl KeywordRule {
    /// Both arguments must already be lower-cased
    pub fn matches(&self, name: &str, path: &str) -> bool {
        self.name_keywords.iter().any(|kw| name.contains(kw))
            || self.path_keywords.iter().any(|kw| path.contains(kw))
    }
}

pub const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        key: BROWSERS,
        name_keywords: &[
            "safari", "chrome", "firefox", "edge", "brave", "arc", "opera", "vivaldi",
            "tor browser", "orion", "chromium",
        ],
        path_keywords: &[],
    },
    KeywordRule {
        key: DESIGN,
        name_keywords: &[
            "figma", "sketch", "photoshop", "illustrator", "affinity", "pixelmator", "gimp",
            "inkscape", "canva", "blender", "lightroom", "capture one", "acorn", "paintcode",
            "principle", "framer", "zeplin", "krita", "vectornator", "linearity",
            "colorsnapper", "cinema 4d", "maya",
        ],
        path_keywords: &[],
    },
    KeywordRule {
        key: DEVELOPMENT,
        name_keywords: &[
            "xcode", "code", "terminal", "git", "docker", "sublime", "visual studio",
            "intellij", "android", "pycharm", "webstorm", "phpstorm", "rider", "clion",
            "goland", "datagrip", "rubymine", "fleet", "cursor", "nova", "bbedit", "iterm",
            "warp", "kitty", "alacritty", "hyper", "postman", "insomnia", "charles",
            "proxyman", "tableplus", "sequel pro", "dbeaver", "tower", "fork", "sourcetree",
            "dash", "rapidapi", "httpie",
        ],
        path_keywords: &[],
    },
    KeywordRule {
        key: MEDIA,
        name_keywords: &[
            "music", "photo", "video", "spotify", "vlc", "imovie", "final cut", "garageband",
            "quicktime", "netflix", "youtube", "plex", "infuse", "iina", "mpv", "obs",
            "screenflow", "podcast", "apple tv", "shazam", "audacity", "handbrake", "davinci",
            "resolve", "premiere", "after effects", "logic pro", "ableton", "fl studio",
            "pro tools", "audition", "permute", "downie", "movist", "elmedia", "vox", "tidal",
            "deezer",
        ],
        path_keywords: &[],
    },
    KeywordRule {
        key: SOCIAL,
        name_keywords: &[
            "message", "mail", "slack", "discord", "telegram", "whatsapp", "zoom", "teams",
            "facetime", "line", "wechat", "skype", "signal", "viber", "lark", "feishu",
            "dingtalk", "webex", "thunderbird", "spark", "airmail", "mimestream",
        ],
        path_keywords: &[],
    },
    KeywordRule {
        key: EDUCATION,
        name_keywords: &[
            "dictionary", "books", "classroom", "anki", "duolingo", "rosetta", "quizlet",
            "swift playground", "playground", "translate", "coursera", "udemy",
        ],
        path_keywords: &[],
    },
    KeywordRule {
        key: PRODUCTIVITY,
        name_keywords: &[
            "word", "excel", "pages", "numbers", "keynote", "notion", "notes", "reminder",
            "calendar", "obsidian", "logseq", "craft", "bear", "ulysses", "scrivener",
            "trello", "asana", "todoist", "things", "omnifocus", "evernote", "onenote",
            "powerpoint", "airtable", "linear", "jira", "fantastical", "pdf", "preview",
            "acrobat", "alfred", "raycast",
        ],
        path_keywords: &[],
    },
    KeywordRule {
        key: UTILITIES,
        name_keywords: &[
            "system", "disk", "activity", "console", "finder", "setting", "preference", "vpn",
            "password", "1password", "lastpass", "bitwarden", "keychain", "time machine",
            "screenshot", "unarchiver", "keka", "betterzip", "appcleaner", "cleanmymac",
            "istat", "bartender", "magnet", "rectangle", "karabiner", "automator", "shortcut",
            "migration",
        ],
        path_keywords: &["utilities"],
    },
    KeywordRule {
        key: GAMES,
        name_keywords: &[
            "game", "steam", "chess", "epic games", "battle.net", "blizzard", "minecraft",
            "roblox", "gog", "playcover",
        ],
        path_keywords: &["games"],
    },
];
