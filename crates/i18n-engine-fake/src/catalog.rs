//! Text catalog model
//!
//! Line format:
//!
//! ```text
//! # comment
//! @locale = de-DE
//! @fallback = en
//! @note = reviewed
//! @plural = slavic            # default | slavic | arabic | <code>
//! greeting = Hallo %0!
//! apples{one} = ein Apfel
//! apples{other} = %0 Äpfel
//! ```
//!
//! Lenient loading skips lines it cannot parse; strict loading rejects them.

use std::collections::BTreeMap;
use thiserror::Error;

/// Why a catalog was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("line {line}: expected 'token = text'")]
    Malformed { line: usize },

    #[error("line {line}: duplicate token '{token}'")]
    Duplicate { line: usize, token: String },

    #[error("line {line}: unknown directive '@{name}'")]
    UnknownDirective { line: usize, name: String },

    #[error("line {line}: invalid plural rule '{value}'")]
    InvalidPluralRule { line: usize, value: String },
}

/// A parsed catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub entries: BTreeMap<String, String>,
    pub locale: String,
    pub fallback: String,
    pub note: String,
    pub plural_code: i32,
}

impl Catalog {
    pub fn parse(source: &str, strict: bool) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();

        for (index, raw) in source.lines().enumerate() {
            let line = index + 1;
            let text = raw.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }

            let Some((key, value)) = text.split_once('=') else {
                if strict {
                    return Err(CatalogError::Malformed { line });
                }
                continue;
            };
            let key = key.trim();
            let value = unescape(value.trim());

            if let Some(name) = key.strip_prefix('@') {
                match catalog.apply_directive(line, name, value) {
                    Ok(()) => {}
                    Err(err) if strict => return Err(err),
                    Err(_) => {}
                }
                continue;
            }

            if key.is_empty() || key.contains(char::is_whitespace) {
                if strict {
                    return Err(CatalogError::Malformed { line });
                }
                continue;
            }

            if catalog.entries.contains_key(key) && strict {
                return Err(CatalogError::Duplicate {
                    line,
                    token: key.to_string(),
                });
            }
            catalog.entries.insert(key.to_string(), value);
        }

        Ok(catalog)
    }

    fn apply_directive(
        &mut self,
        line: usize,
        name: &str,
        value: String,
    ) -> Result<(), CatalogError> {
        match name {
            "locale" => self.locale = value,
            "fallback" => self.fallback = value,
            "note" => self.note = value,
            "plural" => {
                self.plural_code = match value.as_str() {
                    "default" => 0,
                    "slavic" => 1,
                    "arabic" => 2,
                    other => other.parse().map_err(|_| CatalogError::InvalidPluralRule {
                        line,
                        value: other.to_string(),
                    })?,
                }
            }
            other => {
                return Err(CatalogError::UnknownDirective {
                    line,
                    name: other.to_string(),
                })
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn translate(&self, token: &str, args: &[String]) -> Option<String> {
        self.entries.get(token).map(|text| substitute(text, args))
    }

    pub fn translate_plural(&self, token: &str, count: i32, args: &[String]) -> Option<String> {
        let wanted = format!("{}{{{}}}", token, variant_for(self.plural_code, count));
        let other = format!("{}{{other}}", token);
        let prefix = format!("{}{{", token);

        let text = self
            .entries
            .get(&wanted)
            .or_else(|| self.entries.get(&other))
            .or_else(|| {
                self.entries
                    .range(prefix.clone()..)
                    .next()
                    .filter(|(key, _)| key.starts_with(&prefix))
                    .map(|(_, text)| text)
            })
            .or_else(|| self.entries.get(token))?;
        Some(substitute(text, args))
    }

    pub fn dump(&self) -> String {
        let mut out = String::from("Token                | Text\n");
        out.push_str("------------------------------------------------------------\n");
        for (token, text) in &self.entries {
            out.push_str(&format!("{:<20} | {}\n", token, text));
        }
        out
    }

    pub fn find(&self, query: &str) -> String {
        let needle = query.to_lowercase();
        let mut out = String::new();
        for (token, text) in &self.entries {
            if token.to_lowercase().contains(&needle) || text.to_lowercase().contains(&needle) {
                out.push_str(&format!("{}: {}\n", token, text));
            }
        }
        out
    }

    /// Self-check: returns (status, report) with 0 ok, 1 warnings, 2 failed
    pub fn check(&self) -> (i32, String) {
        if self.is_empty() {
            return (2, "CHECK: FAIL\nno catalog loaded\n".to_string());
        }

        let mut warnings = 0;
        let mut errors = 0;
        let mut report = String::from("CHECK: REPORT\n------------------------------\n");

        for (token, text) in &self.entries {
            if text.is_empty() {
                errors += 1;
                report.push_str(&format!("ERROR {}: empty text\n", token));
                continue;
            }
            let indices = placeholders(text);
            if indices.iter().enumerate().any(|(expected, &found)| expected != found) {
                warnings += 1;
                let found: Vec<String> = indices.iter().map(|i| format!("%{}", i)).collect();
                report.push_str(&format!(
                    "WARN {}: placeholder gap, found {}\n",
                    token,
                    found.join(", ")
                ));
            }
        }

        report.push_str(&format!("warnings: {}, errors: {}\n", warnings, errors));
        let status = if errors > 0 {
            2
        } else if warnings > 0 {
            1
        } else {
            0
        };
        (status, report)
    }
}

/// Plural variant name for `count` under the given rule code
pub fn variant_for(rule: i32, count: i32) -> &'static str {
    if count < 0 {
        return "other";
    }
    match rule {
        0 => match count {
            0 => "zero",
            1 => "one",
            _ => "other",
        },
        1 => {
            let (mod10, mod100) = (count % 10, count % 100);
            if mod10 == 1 && mod100 != 11 {
                "one"
            } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
                "few"
            } else {
                "many"
            }
        }
        2 => {
            let mod100 = count % 100;
            match count {
                0 => "zero",
                1 => "one",
                2 => "two",
                _ if (3..=10).contains(&mod100) => "few",
                _ if (11..=99).contains(&mod100) => "many",
                _ => "other",
            }
        }
        _ => "other",
    }
}

fn unescape(value: &str) -> String {
    value.replace("\\n", "\n").replace("\\t", "\t")
}

/// Replace `%N` with the N-th argument; unknown indices stay literal
fn substitute(text: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        match after[..digits].parse::<usize>().ok().and_then(|i| args.get(i)) {
            Some(arg) => out.push_str(arg),
            None => out.push_str(&rest[pos..pos + 1 + digits]),
        }
        rest = &after[digits..];
    }

    out.push_str(rest);
    out
}

fn placeholders(text: &str) -> Vec<usize> {
    let mut found: Vec<usize> = text
        .split('%')
        .skip(1)
        .filter_map(|part| {
            let digits = part.bytes().take_while(u8::is_ascii_digit).count();
            part[..digits].parse().ok()
        })
        .collect();
    found.sort_unstable();
    found.dedup();
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "\
# sample
@locale = pl-PL
@fallback = en
@plural = slavic
greeting = Cześć %0!
apples{one} = %0 jabłko
apples{few} = %0 jabłka
apples{many} = %0 jabłek
";

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_directives_and_entries() {
        let catalog = Catalog::parse(SAMPLE, true).unwrap();
        assert_eq!(catalog.locale, "pl-PL");
        assert_eq!(catalog.fallback, "en");
        assert_eq!(catalog.plural_code, 1);
        assert_eq!(catalog.entries.len(), 4);
    }

    #[test]
    fn test_substitution() {
        let catalog = Catalog::parse(SAMPLE, true).unwrap();
        assert_eq!(
            catalog.translate("greeting", &args(&["Ada"])).unwrap(),
            "Cześć Ada!"
        );
        assert_eq!(catalog.translate("greeting", &[]).unwrap(), "Cześć %0!");
        assert_eq!(substitute("100% sure", &[]), "100% sure");
    }

    #[test]
    fn test_plural_selection() {
        let catalog = Catalog::parse(SAMPLE, true).unwrap();
        let n = |count: i32| {
            catalog
                .translate_plural("apples", count, &args(&[&count.to_string()]))
                .unwrap()
        };
        assert_eq!(n(1), "1 jabłko");
        assert_eq!(n(3), "3 jabłka");
        assert_eq!(n(12), "12 jabłek");
        // no {other}: first variant in token order wins
        assert_eq!(n(-1), "-1 jabłka");
    }

    #[test]
    fn test_strict_and_lenient() {
        let source = "a = 1\nnot a line\na = 2\n";
        assert_eq!(
            Catalog::parse(source, true),
            Err(CatalogError::Malformed { line: 2 })
        );
        let lenient = Catalog::parse(source, false).unwrap();
        assert_eq!(lenient.entries["a"], "2");

        assert_eq!(
            Catalog::parse("a = 1\na = 2\n", true),
            Err(CatalogError::Duplicate {
                line: 2,
                token: "a".to_string()
            })
        );
    }

    #[test]
    fn test_numeric_plural_code() {
        let catalog = Catalog::parse("@plural = 99\nx = y\n", true).unwrap();
        assert_eq!(catalog.plural_code, 99);
        assert!(Catalog::parse("@plural = celtic\n", true).is_err());
    }

    #[test]
    fn test_check_report() {
        let (status, report) = Catalog::default().check();
        assert_eq!(status, 2);
        assert!(report.starts_with("CHECK: FAIL"));

        let (status, report) = Catalog::parse("a = %0 and %2\nb = fine\n", true)
            .unwrap()
            .check();
        assert_eq!(status, 1);
        assert!(report.contains("WARN a: placeholder gap, found %0, %2"));
    }
}
