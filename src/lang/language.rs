use std::path::Path;
use std::str::FromStr;

/// Language tag selecting an executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Pilot,
    Basic,
    Logo,
    Pascal,
    Prolog,
    Forth,
    Perl,
    Python,
    JavaScript,
}

impl Language {
    pub const BUILT_IN: [Language; 6] = [
        Language::Pilot,
        Language::Basic,
        Language::Logo,
        Language::Pascal,
        Language::Prolog,
        Language::Forth,
    ];

    /// Perl, Python and JavaScript need a real interpreter installed on the
    /// host; the core only recognizes their tags.
    pub fn is_external(self) -> bool {
        matches!(self, Language::Perl | Language::Python | Language::JavaScript)
    }

    pub fn name(self) -> &'static str {
        use Language::*;
        match self {
            Pilot => "PILOT",
            Basic => "BASIC",
            Logo => "Logo",
            Pascal => "Pascal",
            Prolog => "Prolog",
            Forth => "Forth",
            Perl => "Perl",
            Python => "Python",
            JavaScript => "JavaScript",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Language> {
        use Language::*;
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pilot" | "pil" => Some(Pilot),
            "bas" | "basic" => Some(Basic),
            "logo" | "lgo" => Some(Logo),
            "pas" | "pascal" => Some(Pascal),
            "pro" | "prolog" => Some(Prolog),
            "fth" | "fs" | "4th" | "forth" => Some(Forth),
            "pl" | "pm" => Some(Perl),
            "py" => Some(Python),
            "js" | "mjs" => Some(JavaScript),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Language> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Language::from_extension)
    }

    /// Best guess from program text. Used when neither a tag nor a file
    /// extension is available.
    pub fn detect(source: &str) -> Option<Language> {
        let lines: Vec<&str> = source
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let first = lines.first()?;
        let count = |pred: &dyn Fn(&str) -> bool| lines.iter().filter(|l| pred(**l)).count();
        let half = (lines.len() + 1) / 2;

        let numbered = count(&|l| l.chars().next().map_or(false, |c| c.is_ascii_digit()));
        if numbered >= half {
            return Some(Language::Basic);
        }
        let pilot = count(&|l| {
            let b = l.as_bytes();
            l.starts_with('*')
                || (b.len() >= 2 && b[0].is_ascii_alphabetic() && b[1] == b':')
                || (b.len() >= 3 && b[0].is_ascii_alphabetic() && b[2] == b':')
        });
        if pilot >= half {
            return Some(Language::Pilot);
        }
        let upper = first.to_ascii_uppercase();
        if upper.starts_with("PROGRAM ") || upper == "BEGIN" {
            return Some(Language::Pascal);
        }
        if lines.iter().any(|l| l.contains(":-") || l.starts_with("?-")) {
            return Some(Language::Prolog);
        }
        if first.starts_with(": ") || lines.iter().any(|l| l.ends_with(" ;")) {
            return Some(Language::Forth);
        }
        const LOGO_WORDS: [&str; 8] = [
            "FORWARD", "FD", "REPEAT", "RIGHT", "RT", "LEFT", "TO", "PENUP",
        ];
        let logo = count(&|l| {
            let word = l.split_whitespace().next().unwrap_or("").to_ascii_uppercase();
            LOGO_WORDS.contains(&word.as_str())
        });
        if logo > 0 {
            return Some(Language::Logo);
        }
        None
    }
}

impl FromStr for Language {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Language::*;
        match s.trim().to_ascii_lowercase().as_str() {
            "pilot" => Ok(Pilot),
            "basic" => Ok(Basic),
            "logo" => Ok(Logo),
            "pascal" => Ok(Pascal),
            "prolog" => Ok(Prolog),
            "forth" => Ok(Forth),
            "perl" => Ok(Perl),
            "python" => Ok(Python),
            "javascript" | "js" => Ok(JavaScript),
            other => Language::from_extension(other).ok_or(()),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        assert_eq!("BASIC".parse(), Ok(Language::Basic));
        assert_eq!("js".parse(), Ok(Language::JavaScript));
        assert_eq!(".fth".parse(), Ok(Language::Forth));
        assert_eq!("cobol".parse::<Language>(), Err(()));
    }

    #[test]
    fn test_detect() {
        assert_eq!(Language::detect("10 PRINT 1\n20 END"), Some(Language::Basic));
        assert_eq!(Language::detect("T:Hello\nA:NAME"), Some(Language::Pilot));
        assert_eq!(Language::detect("REPEAT 4 [FD 10 RT 90]"), Some(Language::Logo));
        assert_eq!(Language::detect("parent(a, b).\n?- parent(a, X)."), Some(Language::Prolog));
        assert_eq!(Language::detect(""), None);
    }
}
